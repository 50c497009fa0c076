//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! HTTP 处理函数统一返回 `Result<T, AppError>`，调用方收到结构化的 JSON 错误：
//! `{"error": "<可读信息>"}`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 提供 `From` 转换，无需手动 map。
//! - 实现 `IntoResponse`：输入类错误一律 400，服务端自身故障 500。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::watermark::ImageError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 请求参数缺失或无法解析
    #[error("{0}")]
    Validation(String),

    /// 上传文件读取失败
    #[error("无法读取上传的水印图片：{0}")]
    Upload(String),

    /// 合成流水线错误（编码 / 解码 / 缩放）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件不可用
    #[error("配置错误: {0}")]
    Settings(String),

    /// 后台任务异常退出
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Upload(_) | Self::Image(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Settings(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Image(err) => log::warn!(
                "❌ 请求失败 - code={} stage={} {}",
                err.code(),
                err.stage(),
                err
            ),
            _ if status.is_server_error() => log::error!("❌ 请求失败 - {}", self),
            _ => log::warn!("❌ 请求被拒绝 - {}", self),
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
