//! # 二维码编码
//!
//! ## 设计思路
//!
//! 二维码编码对合成链路来说是外部能力，因此以 `BarcodeEncoder` trait 的形式注入服务层，
//! 测试可以替换为固定输出的实现。
//!
//! ## 实现思路
//!
//! `QrBarcodeEncoder` 基于 `qrcode` 生成模块矩阵，保留 4 个模块宽的静区，
//! 以整数倍放大后居中绘制到边长为 `size` 的白色画布上。
//! 请求尺寸放不下所有模块时，画布按 1 倍模块尺寸自动放大。

use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::watermark::codec;
use crate::watermark::{EncodedBlob, ImageError};

/// 二维码内容的最大字节数（40 版本、数字模式的理论上限）。
pub const MAX_CONTENT_LEN: usize = 7089;

/// 静区宽度（模块数）。
const QUIET_ZONE_MODULES: u32 = 4;

/// 纠错级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// 二维码生成参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeSpec {
    pub content: String,
    /// 期望的图片边长（像素）。
    pub size: u32,
    pub error_correction: ErrorCorrection,
}

impl BarcodeSpec {
    /// 使用固定的 Medium 纠错级别，水印面积上限以此为前提。
    pub fn new(content: impl Into<String>, size: u32) -> Self {
        Self {
            content: content.into(),
            size,
            error_correction: ErrorCorrection::Medium,
        }
    }
}

/// 二维码编码能力。
pub trait BarcodeEncoder: Send + Sync {
    fn encode(&self, spec: &BarcodeSpec) -> Result<EncodedBlob, ImageError>;
}

/// 基于 `qrcode` 的默认编码器，输出灰度 PNG。
#[derive(Debug, Default, Clone, Copy)]
pub struct QrBarcodeEncoder;

impl BarcodeEncoder for QrBarcodeEncoder {
    fn encode(&self, spec: &BarcodeSpec) -> Result<EncodedBlob, ImageError> {
        if spec.size == 0 {
            return Err(ImageError::UpstreamEncode("二维码尺寸必须大于 0".to_string()));
        }

        let code = QrCode::with_error_correction_level(spec.content.as_bytes(), spec.error_correction.into())
            .map_err(|e| ImageError::UpstreamEncode(e.to_string()))?;

        let image = render_symbol(&code, spec.size);
        log::debug!(
            "🔳 二维码已生成 - 模块: {} 请求尺寸: {} 输出尺寸: {}",
            code.width(),
            spec.size,
            image.width()
        );

        codec::encode_gray_png(&image)
    }
}

fn render_symbol(code: &QrCode, size: u32) -> GrayImage {
    let modules = code.width() as u32;
    let total_modules = modules + QUIET_ZONE_MODULES * 2;
    let scale = (size / total_modules).max(1);
    let side = size.max(total_modules * scale);
    let origin = (side - modules * scale) / 2;

    let mut image = GrayImage::from_pixel(side, side, Luma([255u8]));

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = (i as u32) % modules;
        let my = (i as u32) / modules;
        for dy in 0..scale {
            for dx in 0..scale {
                image.put_pixel(origin + mx * scale + dx, origin + my * scale + dy, Luma([0u8]));
            }
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watermark::ImageRole;

    fn encode(content: &str, size: u32) -> Result<EncodedBlob, ImageError> {
        QrBarcodeEncoder.encode(&BarcodeSpec::new(content, size))
    }

    #[test]
    fn spec_defaults_to_medium_error_correction() {
        let spec = BarcodeSpec::new("hello", 256);

        assert_eq!(spec.error_correction, ErrorCorrection::Medium);
        assert_eq!(EcLevel::from(spec.error_correction), EcLevel::M);
    }

    #[test]
    fn encodes_a_square_image_of_requested_size() {
        let blob = encode("https://example.com", 256).expect("encode failed");
        let image = codec::decode_png(blob.as_bytes(), ImageRole::Base).expect("decode failed");

        assert_eq!(image.dimensions(), (256, 256));
        // 静区保持白色
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert!(image.pixels().any(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn tiny_size_grows_to_fit_all_modules() {
        let blob = encode("hello", 5).expect("encode failed");
        let image = codec::decode_png(blob.as_bytes(), ImageRole::Base).expect("decode failed");

        // 版本 1 为 21 个模块，加上两侧静区共 29
        assert_eq!(image.dimensions(), (29, 29));
    }

    #[test]
    fn oversized_content_is_an_upstream_error() {
        let content = "x".repeat(MAX_CONTENT_LEN + 1);

        assert!(matches!(encode(&content, 256), Err(ImageError::UpstreamEncode(_))));
    }

    #[test]
    fn zero_size_is_an_upstream_error() {
        assert!(matches!(encode("hello", 0), Err(ImageError::UpstreamEncode(_))));
    }
}
