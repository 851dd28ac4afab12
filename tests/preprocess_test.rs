//! 图像预处理单元测试

use hotel_image_detection::detection::preprocess::{
    tensor_from_image, transform_image, IMAGENET_MEAN, IMAGENET_STD,
};
use image::{DynamicImage, Rgb, RgbImage};

fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

#[test]
fn test_output_shape_fixed_for_any_resolution() {
    // 任意分辨率和纵横比都必须得到固定形状 (1,3,224,224)
    let sizes = [
        (640, 480),
        (480, 640),
        (224, 224),
        (256, 256),
        (1024, 768),
        (331, 977),
        (100, 60),
    ];
    for (width, height) in sizes {
        let tensor = tensor_from_image(&solid_image(width, height, [50, 100, 150]));
        assert_eq!(
            tensor.size(),
            vec![1, 3, 224, 224],
            "unexpected shape for input {}x{}",
            width,
            height
        );
    }
    println!("✓ {} 种分辨率输出形状一致", sizes.len());
}

#[test]
fn test_normalization_statistics_applied() {
    // 纯色图像经过缩放裁剪仍为纯色，可直接验证归一化公式
    let tensor = tensor_from_image(&solid_image(320, 320, [128, 128, 128]));
    for channel in 0..3 {
        let expected =
            ((128.0 / 255.0) - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel];
        let actual = tensor.double_value(&[0, channel as i64, 112, 112]) as f32;
        assert!(
            (actual - expected).abs() < 1e-4,
            "channel {}: expected {}, got {}",
            channel,
            expected,
            actual
        );
    }
}

#[test]
fn test_transform_is_deterministic() {
    let image = solid_image(300, 200, [10, 200, 90]);
    let first = tensor_from_image(&image);
    let second = tensor_from_image(&image);

    let first: Vec<f32> = Vec::try_from(&first.view([-1])).expect("Failed to read tensor");
    let second: Vec<f32> = Vec::try_from(&second.view([-1])).expect("Failed to read tensor");
    assert_eq!(first, second);
}

#[test]
fn test_transform_image_from_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("input.png");
    solid_image(400, 300, [200, 40, 10])
        .save(&path)
        .expect("Failed to write test image");

    let (tensor, transform_ms) = transform_image(&path).expect("Transform failed");
    assert_eq!(tensor.size(), vec![1, 3, 224, 224]);
    assert!(transform_ms >= 0.0);
}

#[test]
fn test_decode_error_on_invalid_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.jpg");
    std::fs::write(&path, b"definitely not an image").expect("Failed to write file");

    let result = transform_image(&path);
    assert!(result.is_err());
    println!("⚠️  非法图像按预期返回解码错误: {}", result.unwrap_err());
}

#[test]
fn test_missing_file_errors() {
    let result = transform_image(std::path::Path::new("/no/such/image.png"));
    assert!(result.is_err());
}
