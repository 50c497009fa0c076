//! # 水印合成模块（watermark）
//!
//! ## 设计思路
//!
//! 该模块将“格式嗅探 → 解码校验 → 缩放 → 居中混合 → 重新编码”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：HTTP 层共享的服务入口（`WatermarkService`）
//! - `handler`：编排整条合成流水线
//! - `pipeline`：解码前后的像素与内存限制
//! - `codec`：PNG 编解码与文件签名嗅探
//! - `resampler`：Lanczos-3 等比缩放
//! - `compositor`：居中偏移计算与 alpha 混合
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! server::handler（表单校验）
//!    ↓
//! service.rs（生成二维码）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ codec.rs（嗅探水印格式）
//!    ├─ pipeline.rs（底图解码 → 水印解码）
//!    ├─ resampler.rs（缩放到底图宽度的 1/4）
//!    ├─ compositor.rs（居中 + over 混合）
//!    └─ codec.rs（编码 PNG）
//!    ↓
//! 返回 ImageError 给 HTTP 层
//! ```
//!
//! 所有函数都只操作请求私有的数据，没有共享可变状态。

pub mod codec;
pub mod compositor;
mod config;
mod error;
mod handler;
mod pipeline;
pub mod resampler;
mod service;
mod source;

pub use config::{OVERLAY_WIDTH_RATIO, WatermarkConfig};
pub use error::{ImageError, ImageRole};
pub use handler::WatermarkHandler;
pub use service::WatermarkService;
pub use source::{EncodedBlob, GenerateRequest, Placement, RasterImage};
