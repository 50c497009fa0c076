//! # 缩放器
//!
//! ## 设计思路
//!
//! 水印通常会被大幅缩小，最近邻或双线性会出现锯齿与块状，因此固定使用
//! Lanczos-3 窗口 sinc 滤镜。目标高度按源图宽高比推导，纯函数、无共享状态。
//!
//! ## 实现思路
//!
//! 1. 推导目标高度：`round(target_width * src_height / src_width)`，至少为 1
//! 2. 目标尺寸与源图一致时直接复制，保证重复缩放结果不变
//! 3. 源图四周复制边缘像素扩出一圈，再用 `fast_image_resize` 对原图区域（crop）做卷积
//!
//! 扩边宽度覆盖整个 Lanczos 窗口，越界的采样点读到的就是被钳制到边界的像素，
//! 边缘不回绕、不补透明像素，也不截断窗口。

use fast_image_resize as fr;

use super::codec;
use super::source::{EncodedBlob, RasterImage};
use super::{ImageError, ImageRole};

/// 按源图宽高比计算目标高度。
pub fn target_height_for(
    source_width: u32,
    source_height: u32,
    target_width: u32,
) -> Result<u32, ImageError> {
    if source_width == 0 || source_height == 0 {
        return Err(ImageError::decode(
            ImageRole::Source,
            format!("源图尺寸无效：{}x{}", source_width, source_height),
        ));
    }

    let height = (target_width as f64 * source_height as f64 / source_width as f64).round();
    Ok((height as u32).max(1))
}

/// 将图片等比缩放到指定宽度。
pub fn resize_to_width(source: &RasterImage, target_width: u32) -> Result<RasterImage, ImageError> {
    if target_width == 0 {
        return Err(ImageError::InvalidDimensions("目标宽度不能为 0".to_string()));
    }

    let (source_width, source_height) = source.dimensions();
    let target_height = target_height_for(source_width, source_height, target_width)?;

    if (target_width, target_height) == (source_width, source_height) {
        return Ok(source.clone());
    }

    log::debug!(
        "🧩 Lanczos3 缩放：{}x{} -> {}x{}",
        source_width,
        source_height,
        target_width,
        target_height
    );

    resize_with_fast_image_resize(source, target_width, target_height)
}

/// 字节到字节的缩放：解码 PNG → 缩放 → 重新编码。
pub fn resize_encoded(bytes: &[u8], target_width: u32) -> Result<EncodedBlob, ImageError> {
    let source = codec::decode_png(bytes, ImageRole::Source)?;
    let resized = resize_to_width(&source, target_width)?;
    codec::encode_png(&resized)
}

/// Lanczos-3 半径（以源图像素计）对应的扩边宽度。
///
/// 缩小时滤镜按缩放比例拉宽，放大时保持 3 个像素。
fn edge_padding(source_len: u32, target_len: u32) -> u32 {
    let scale = (source_len as f64 / target_len as f64).max(1.0);
    (3.0 * scale).ceil() as u32 + 1
}

/// 四周复制边缘像素，等价于把采样坐标钳制到源图范围内。
fn pad_with_edge_pixels(source: &RasterImage, pad_x: u32, pad_y: u32) -> RasterImage {
    let (width, height) = source.dimensions();
    RasterImage::from_fn(width + pad_x * 2, height + pad_y * 2, |x, y| {
        let sx = x.saturating_sub(pad_x).min(width - 1);
        let sy = y.saturating_sub(pad_y).min(height - 1);
        *source.get_pixel(sx, sy)
    })
}

fn resize_with_fast_image_resize(
    source: &RasterImage,
    target_width: u32,
    target_height: u32,
) -> Result<RasterImage, ImageError> {
    let (src_width, src_height) = source.dimensions();
    let pad_x = edge_padding(src_width, target_width);
    let pad_y = edge_padding(src_height, target_height);
    let padded = pad_with_edge_pixels(source, pad_x, pad_y);

    let src_image = fr::images::Image::from_vec_u8(
        padded.width(),
        padded.height(),
        padded.into_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ImageError::InvalidDimensions(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3))
        .crop(pad_x as f64, pad_y as f64, src_width as f64, src_height as f64);

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::InvalidDimensions(format!("fast_image_resize 执行失败：{}", e)))?;

    RasterImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Encode("fast_image_resize 输出缓冲长度异常".to_string()))
}
