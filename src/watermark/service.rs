//! # 服务层
//!
//! ## 设计思路
//!
//! 使用 `WatermarkService` 作为 HTTP 层共享状态，替代全局单例函数。
//! 它只持有只读配置与编码器，每个请求的数据完全私有，并发请求之间无需加锁。
//!
//! ## 实现思路
//!
//! 对外仅暴露 `generate`：先生成二维码，再按需合成水印。

use std::sync::Arc;

use crate::barcode::{BarcodeEncoder, QrBarcodeEncoder};

use super::source::{EncodedBlob, GenerateRequest};
use super::{ImageError, WatermarkConfig, WatermarkHandler};

/// 二维码 + 水印生成服务。
#[derive(Clone)]
pub struct WatermarkService {
    handler: WatermarkHandler,
    encoder: Arc<dyn BarcodeEncoder>,
}

impl WatermarkService {
    /// 使用默认配置与 `qrcode` 编码器创建服务。
    pub fn new() -> Self {
        Self::with_config(WatermarkConfig::default())
    }

    pub fn with_config(config: WatermarkConfig) -> Self {
        Self::with_encoder(config, Arc::new(QrBarcodeEncoder))
    }

    /// 注入自定义编码器，主要用于测试。
    pub fn with_encoder(config: WatermarkConfig, encoder: Arc<dyn BarcodeEncoder>) -> Self {
        Self {
            handler: WatermarkHandler::new(config),
            encoder,
        }
    }

    /// 执行完整流程：生成二维码 → （可选）合成水印。
    ///
    /// # 示例
    /// ```rust
    /// use qr_watermark::barcode::BarcodeSpec;
    /// use qr_watermark::watermark::{GenerateRequest, WatermarkService};
    ///
    /// let service = WatermarkService::new();
    /// let png = service.generate(GenerateRequest {
    ///     spec: BarcodeSpec::new("hello", 128),
    ///     watermark: None,
    /// })?;
    /// assert!(!png.is_empty());
    /// # Ok::<(), qr_watermark::watermark::ImageError>(())
    /// ```
    pub fn generate(&self, request: GenerateRequest) -> Result<EncodedBlob, ImageError> {
        let code = self.encoder.encode(&request.spec)?;

        match request.watermark {
            Some(watermark) => self.handler.blend(code.as_bytes(), &watermark),
            None => {
                log::info!(
                    "✅ 二维码生成完成（无水印）- 尺寸: {} 字节: {}",
                    request.spec.size,
                    code.len()
                );
                Ok(code)
            }
        }
    }
}

impl Default for WatermarkService {
    fn default() -> Self {
        Self::new()
    }
}
