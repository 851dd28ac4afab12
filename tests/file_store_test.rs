//! 上传文件存储单元测试

use hotel_image_detection::FileStore;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

fn test_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 24, Rgb([120, 80, 40])))
}

#[test]
fn test_new_creates_service_directory() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path()).expect("Failed to create file store");
    assert!(dir.path().join("FileManagementService").is_dir());
    assert!(store.base_dir().is_absolute());
}

#[test]
fn test_save_twice_produces_distinct_readable_files() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path()).expect("Failed to create file store");
    let image = test_image();

    let first = store.save(&image, ImageFormat::WebP).expect("First save failed");
    let second = store.save(&image, ImageFormat::WebP).expect("Second save failed");

    // 同一图像保存两次必须产生两个不同的文件
    assert_ne!(first, second);
    assert!(first.exists());
    assert!(second.exists());

    // 两个文件都能按保存的格式读回
    for path in [&first, &second] {
        let format = image::ImageReader::open(path)
            .expect("Failed to open saved file")
            .with_guessed_format()
            .expect("Failed to probe saved file")
            .format();
        assert_eq!(format, Some(ImageFormat::WebP));

        let loaded = image::open(path).expect("Saved file is not a valid image");
        assert_eq!(loaded.width(), 32);
        assert_eq!(loaded.height(), 24);
    }
    println!("✓ 保存了两个独立文件: {:?} / {:?}", first, second);
}

#[test]
fn test_saved_path_is_absolute_with_format_extension() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path()).expect("Failed to create file store");

    let path = store.save(&test_image(), ImageFormat::WebP).expect("Save failed");
    assert!(path.is_absolute());
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("webp"));
}

#[test]
fn test_save_png_format() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path()).expect("Failed to create file store");

    let path = store.save(&test_image(), ImageFormat::Png).expect("Save failed");
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
    let loaded = image::open(&path).expect("Saved PNG is not readable");
    assert_eq!((loaded.width(), loaded.height()), (32, 24));
}
