//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `WatermarkConfig`，保证运行时行为可观测、可调整、可测试。
//! 水印宽度比例与缩放滤镜是固定值，不开放配置：比例决定二维码被遮挡的面积上限，
//! 与 Medium 纠错级别绑定。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - `validate` 在服务启动时做区间校验，避免错误配置带入运行期。

use serde::{Deserialize, Serialize};

use super::ImageError;

/// 水印宽度占底图宽度的比例。
pub const OVERLAY_WIDTH_RATIO: f64 = 0.25;

/// 水印合成配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// 上传水印原始字节的体积上限（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 是否按“底图为正方形”的旧算法计算纵向偏移。
    ///
    /// 开启后纵向偏移同样取底图宽度的一半，非正方形底图会纵向偏离中心。
    pub legacy_square_centering: bool,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            legacy_square_centering: false,
        }
    }
}

impl WatermarkConfig {
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.max_file_size == 0 {
            return Err(ImageError::ResourceLimit("max_file_size 必须大于 0".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(ImageError::ResourceLimit("max_decoded_pixels 必须大于 0".to_string()));
        }
        if self.max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(ImageError::ResourceLimit("max_decoded_bytes 不能小于 8MB".to_string()));
        }
        Ok(())
    }
}
