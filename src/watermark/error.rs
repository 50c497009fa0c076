//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载合成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! 链路中任何一步失败都直接终止本次请求，不做重试也不返回半成品。

use std::fmt;

/// 出错图片在链路中的角色，用于定位是哪一张图解码失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// 二维码底图。
    Base,
    /// 用户上传的水印图。
    Overlay,
    /// 独立调用缩放器时的输入图。
    Source,
}

impl ImageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Overlay => "overlay",
            Self::Source => "source",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 图片合成统一错误类型。
///
/// 该类型会在 HTTP 层被上转为 `AppError`，最终以 400 + JSON 返回给调用方。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("解码错误（{role}）：{reason}")]
    Decode { role: ImageRole, reason: String },

    #[error("水印图片格式不受支持：检测到 {detected}，仅支持 image/png")]
    UnsupportedFormat { detected: String },

    #[error("二维码生成失败：{0}")]
    UpstreamEncode(String),

    #[error("尺寸参数无效：{0}")]
    InvalidDimensions(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("编码错误：{0}")]
    Encode(String),
}

impl ImageError {
    pub(crate) fn decode(role: ImageRole, reason: impl Into<String>) -> Self {
        Self::Decode {
            role,
            reason: reason.into(),
        }
    }

    /// 稳定的错误码，供日志检索使用。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode_failed",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::UpstreamEncode(_) => "barcode_encode_failed",
            Self::InvalidDimensions(_) => "invalid_dimensions",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Encode(_) => "encode_failed",
        }
    }

    /// 出错阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decode { role, .. } => match role {
                ImageRole::Base => "decode_base",
                ImageRole::Overlay => "decode_overlay",
                ImageRole::Source => "decode_source",
            },
            Self::UnsupportedFormat { .. } => "sniff",
            Self::UpstreamEncode(_) => "barcode",
            Self::InvalidDimensions(_) => "resize",
            Self::ResourceLimit(_) => "limits",
            Self::Encode(_) => "encode",
        }
    }
}
