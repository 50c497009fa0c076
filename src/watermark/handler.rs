//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `WatermarkHandler` 只负责流程编排，不与 HTTP 绑定。处理链路固定为：
//! 1. 嗅探水印原始字节（不解码）
//! 2. 解码底图
//! 3. 解码水印
//! 4. 将水印缩放到底图宽度的四分之一
//! 5. 计算居中偏移并混合到底图副本
//! 6. 重新编码为 PNG
//!
//! ## 实现思路
//!
//! - 任何一步失败都直接返回，不做重试，也不产生部分输出。
//! - 底图解码失败时不会再去解码水印；水印格式不受支持时不会解码底图。
//! - 记录 `sniff/decode/resize/blend/encode/total` 阶段耗时，便于性能诊断。

use std::time::Instant;

use super::compositor;
use super::resampler;
use super::source::EncodedBlob;
use super::{ImageError, ImageRole, WatermarkConfig, codec};

/// 水印合成处理器。
///
/// 内部只持有只读配置，可在任意多个线程间并发使用。
#[derive(Debug, Clone)]
pub struct WatermarkHandler {
    pub(super) config: WatermarkConfig,
}

impl WatermarkHandler {
    /// 根据配置创建处理器。
    ///
    /// # 示例
    /// ```rust
    /// use qr_watermark::watermark::{WatermarkConfig, WatermarkHandler};
    ///
    /// let handler = WatermarkHandler::new(WatermarkConfig::default());
    /// assert!(!handler.config().legacy_square_centering);
    /// ```
    pub fn new(config: WatermarkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// 将水印合成到二维码中心。
    ///
    /// `base` 为二维码 PNG，`overlay` 为上传的原始字节。
    pub fn blend(&self, base: &[u8], overlay: &[u8]) -> Result<EncodedBlob, ImageError> {
        let total_start = Instant::now();

        let sniff_start = Instant::now();
        self.validate_upload_size(overlay)?;
        codec::ensure_supported_overlay(overlay)?;
        let sniff_elapsed = sniff_start.elapsed();

        let decode_start = Instant::now();
        let base_image = self.decode_with_limits(base, ImageRole::Base)?;
        let overlay_image = self.decode_with_limits(overlay, ImageRole::Overlay)?;
        let decode_elapsed = decode_start.elapsed();

        let resize_start = Instant::now();
        let target_width = compositor::overlay_target_width(base_image.width());
        let resized = resampler::resize_to_width(&overlay_image, target_width)?;
        let resize_elapsed = resize_start.elapsed();

        let blend_start = Instant::now();
        let placement = compositor::centered_placement(
            base_image.dimensions(),
            resized.dimensions(),
            self.config.legacy_square_centering,
        );
        let canvas = compositor::blend(&base_image, &resized, placement);
        let blend_elapsed = blend_start.elapsed();

        let encode_start = Instant::now();
        let blob = codec::encode_png(&canvas)?;
        let encode_elapsed = encode_start.elapsed();

        log::info!(
            "✅ 水印合成完成 - 底图: {}x{} 水印: {}x{} -> {}x{} 偏移: ({}, {}) sniff={}ms decode={}ms resize={}ms blend={}ms encode={}ms total={}ms",
            base_image.width(),
            base_image.height(),
            overlay_image.width(),
            overlay_image.height(),
            resized.width(),
            resized.height(),
            placement.x,
            placement.y,
            sniff_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            resize_elapsed.as_millis(),
            blend_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(blob)
    }
}
