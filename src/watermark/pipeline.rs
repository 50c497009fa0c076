//! # 解码与资源限制
//!
//! ## 设计思路
//!
//! 将“字节 → 位图”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先读取 header 尺寸做检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 读取 PNG header 尺寸
//! 2. 按像素上限与内存上限快速拒绝
//! 3. 完整解码为 RGBA
//! 4. 以真实尺寸再次校验

use image::ImageFormat;
use std::io::Cursor;

use super::codec;
use super::source::RasterImage;
use super::{ImageError, ImageRole, WatermarkConfig, WatermarkHandler};

impl WatermarkHandler {
    /// 在像素与内存上限内解码 PNG。
    pub(crate) fn decode_with_limits(
        &self,
        bytes: &[u8],
        role: ImageRole,
    ) -> Result<RasterImage, ImageError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(bytes, role)?;
        Self::validate_pixel_limits(&self.config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(&self.config, header_width, header_height)?;

        let decoded = codec::decode_png(bytes, role)?;

        let (width, height) = decoded.dimensions();
        Self::validate_pixel_limits(&self.config, width, height)?;
        Self::validate_decoded_memory_limits(&self.config, width, height)?;

        log::debug!("🖼️ 解码完成 - {}: {}x{}", role, width, height);

        Ok(decoded)
    }

    /// 上传体积检查，在嗅探之前执行。
    pub(crate) fn validate_upload_size(&self, bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.len() as u64 > self.config.max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "水印文件过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                self.config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Ok(())
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(
        bytes: &[u8],
        role: ImageRole,
    ) -> Result<(u32, u32), ImageError> {
        let reader = image::ImageReader::with_format(Cursor::new(bytes), ImageFormat::Png);

        reader
            .into_dimensions()
            .map_err(|e| ImageError::decode(role, format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(
        config: &WatermarkConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &WatermarkConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}
