//! 图像预处理：解码 -> RGB -> 短边缩放 256 -> 中心裁剪 224 -> 归一化

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tch::Tensor;

/// ResNet-18 预训练权重对应的逐通道归一化统计量
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// 缩放后短边的长度
const RESIZE_SHORTER_SIDE: u32 = 256;
/// 中心裁剪后的边长（模型输入分辨率）
const CROP_SIZE: u32 = 224;

/// 从图像文件构建模型输入张量
///
/// 返回形状为 `1×3×224×224` 的张量以及变换耗时（毫秒）。
/// 文件不是合法图像时返回解码错误。
pub fn transform_image(path: &Path) -> Result<(Tensor, f64)> {
    let start = Instant::now();

    let image = image::open(path)
        .with_context(|| format!("Failed to decode image file: {}", path.display()))?;
    let tensor = tensor_from_image(&image);

    let transform_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok((tensor, transform_ms))
}

/// 对已解码图像应用固定的预处理流水线
pub fn tensor_from_image(image: &DynamicImage) -> Tensor {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let (new_width, new_height) = resize_dimensions(width, height);
    let resized = imageops::resize(&rgb, new_width, new_height, FilterType::Triangle);

    let left = (new_width - CROP_SIZE) / 2;
    let top = (new_height - CROP_SIZE) / 2;
    let cropped = imageops::crop_imm(&resized, left, top, CROP_SIZE, CROP_SIZE).to_image();

    // 按 CHW 排列，像素缩放到 [0,1] 后做逐通道标准化
    let area = (CROP_SIZE * CROP_SIZE) as usize;
    let mut data = vec![0f32; 3 * area];
    for (x, y, pixel) in cropped.enumerate_pixels() {
        let offset = (y * CROP_SIZE + x) as usize;
        for channel in 0..3 {
            let value = pixel[channel] as f32 / 255.0;
            data[channel * area + offset] =
                (value - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel];
        }
    }

    Tensor::from_slice(&data).view([1, 3, CROP_SIZE as i64, CROP_SIZE as i64])
}

/// 保持纵横比，把短边缩放到 256
fn resize_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= height {
        let new_height =
            ((height as f64) * f64::from(RESIZE_SHORTER_SIDE) / (width as f64)).round() as u32;
        (RESIZE_SHORTER_SIDE, new_height.max(RESIZE_SHORTER_SIDE))
    } else {
        let new_width =
            ((width as f64) * f64::from(RESIZE_SHORTER_SIDE) / (height as f64)).round() as u32;
        (new_width.max(RESIZE_SHORTER_SIDE), RESIZE_SHORTER_SIDE)
    }
}
