//! # 编解码与格式嗅探
//!
//! 固定使用 PNG（无损、带 alpha）作为唯一的图片交换格式。
//! 格式嗅探只看原始字节的文件签名（magic bytes），不依赖解码成功。

use image::{GrayImage, ImageFormat};
use std::io::Cursor;

use super::source::{EncodedBlob, RasterImage};
use super::{ImageError, ImageRole};

/// 唯一支持的图片 MIME 类型。
pub const SUPPORTED_MIME: &str = "image/png";

/// 无法识别签名时返回的类型。
const UNKNOWN_MIME: &str = "application/octet-stream";

/// 通过文件签名猜测 MIME 类型。
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(UNKNOWN_MIME)
}

/// 校验水印原始字节是否为受支持的格式。
pub fn ensure_supported_overlay(bytes: &[u8]) -> Result<(), ImageError> {
    let detected = sniff_mime(bytes);
    if detected != SUPPORTED_MIME {
        return Err(ImageError::UnsupportedFormat {
            detected: detected.to_string(),
        });
    }
    Ok(())
}

/// 将 PNG 字节解码为 RGBA 位图。
pub fn decode_png(bytes: &[u8], role: ImageRole) -> Result<RasterImage, ImageError> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| ImageError::decode(role, format!("图片解码失败：{}", e)))?;
    Ok(decoded.to_rgba8())
}

/// 将 RGBA 位图编码为 PNG。
pub fn encode_png(image: &RasterImage) -> Result<EncodedBlob, ImageError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;
    Ok(EncodedBlob::from(cursor.into_inner()))
}

/// 将灰度位图编码为 PNG（二维码原图使用）。
pub fn encode_gray_png(image: &GrayImage) -> Result<EncodedBlob, ImageError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;
    Ok(EncodedBlob::from(cursor.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RasterImage {
        RasterImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn png_round_trip_is_pixel_identical() {
        let original = gradient(37, 19);
        let blob = encode_png(&original).expect("encode failed");

        let decoded = decode_png(blob.as_bytes(), ImageRole::Source).expect("decode failed");

        assert_eq!(decoded, original);
    }

    #[test]
    fn sniff_recognizes_png_and_jpeg_signatures() {
        let png = encode_png(&gradient(2, 2)).expect("encode failed");
        let jpeg_signature = [0xFF_u8, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

        assert_eq!(sniff_mime(png.as_bytes()), "image/png");
        assert_eq!(sniff_mime(&jpeg_signature), "image/jpeg");
        assert_eq!(sniff_mime(b"plain text"), UNKNOWN_MIME);
    }

    #[test]
    fn ensure_supported_overlay_rejects_empty_and_jpeg() {
        let jpeg_signature = [0xFF_u8, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

        assert!(matches!(
            ensure_supported_overlay(&jpeg_signature),
            Err(ImageError::UnsupportedFormat { ref detected }) if detected == "image/jpeg"
        ));
        assert!(matches!(
            ensure_supported_overlay(&[]),
            Err(ImageError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn decode_rejects_truncated_png() {
        let blob = encode_png(&gradient(16, 16)).expect("encode failed");
        let truncated = &blob.as_bytes()[..blob.len() / 2];

        let result = decode_png(truncated, ImageRole::Overlay);

        assert!(matches!(
            result,
            Err(ImageError::Decode { role: ImageRole::Overlay, .. })
        ));
    }
}
