//! # 表单提取与参数校验
//!
//! ## 设计思路
//!
//! 文件提取的结果用封闭枚举 `UploadedFile` 表示（存在 / 缺失 / 损坏），
//! 调用方按分支处理，不需要再去判断具体错误类型。
//! 参数校验全部在进入合成链路之前完成，核心流水线看不到非法参数。

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::barcode::{BarcodeSpec, MAX_CONTENT_LEN};
use crate::error::AppError;
use crate::watermark::GenerateRequest;

pub const SIZE_FIELD: &str = "size";
pub const CONTENT_FIELD: &str = "content";
pub const WATERMARK_FIELD: &str = "watermark";

/// 上传文件字段的提取结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadedFile {
    Present(Bytes),
    #[default]
    Absent,
    Malformed(String),
}

/// `/generate` 请求的原始表单值。
#[derive(Debug, Clone, Default)]
pub struct GenerateForm {
    pub size: Option<String>,
    pub content: Option<String>,
    pub watermark: UploadedFile,
}

impl GenerateForm {
    /// 读取 multipart 请求体。同名字段只取第一个。
    ///
    /// 只有带文件名的 `watermark` 部分才视为上传文件。
    pub async fn from_multipart(mut multipart: Multipart) -> Self {
        let mut form = Self::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(err) => {
                    log::warn!("⚠️ multipart 请求体解析中断: {}", err);
                    if form.watermark == UploadedFile::Absent {
                        form.watermark = UploadedFile::Malformed(err.to_string());
                    }
                    break;
                }
            };

            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                SIZE_FIELD if form.size.is_none() => form.size = field.text().await.ok(),
                CONTENT_FIELD if form.content.is_none() => form.content = field.text().await.ok(),
                WATERMARK_FIELD
                    if field.file_name().is_some() && form.watermark == UploadedFile::Absent =>
                {
                    form.watermark = match field.bytes().await {
                        Ok(bytes) => UploadedFile::Present(bytes),
                        Err(err) => UploadedFile::Malformed(err.to_string()),
                    };
                }
                _ => {}
            }
        }

        form
    }

    /// 读取 urlencoded 请求体。这种请求体无法携带文件，水印始终视为缺失。
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self {
            size: fields.get(SIZE_FIELD).cloned(),
            content: fields.get(CONTENT_FIELD).cloned(),
            watermark: UploadedFile::Absent,
        }
    }

    /// 请求体中缺失的 `size` / `content` 从查询参数补齐。
    pub fn with_query_fallback(mut self, query: &HashMap<String, String>) -> Self {
        if self.size.is_none() {
            self.size = query.get(SIZE_FIELD).cloned();
        }
        if self.content.is_none() {
            self.content = query.get(CONTENT_FIELD).cloned();
        }
        self
    }

    /// 校验表单并转换为生成请求。先校验内容，再校验尺寸，最后处理上传文件。
    pub fn into_request(self, max_barcode_size: u32) -> Result<GenerateRequest, AppError> {
        let content = match self.content {
            Some(content) if !content.is_empty() => content,
            _ => return Err(AppError::Validation("无法确定二维码内容。".to_string())),
        };
        if content.len() > MAX_CONTENT_LEN {
            return Err(AppError::Validation(format!(
                "二维码内容过长：{} 字节（限制：{} 字节）。",
                content.len(),
                MAX_CONTENT_LEN
            )));
        }

        let size = self
            .size
            .as_deref()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .ok_or_else(|| AppError::Validation("无法确定二维码尺寸。".to_string()))?;
        if size > max_barcode_size {
            return Err(AppError::Validation(format!(
                "二维码尺寸过大：{}（限制：{}）。",
                size, max_barcode_size
            )));
        }

        let watermark = match self.watermark {
            UploadedFile::Present(bytes) => Some(bytes),
            UploadedFile::Absent => None,
            UploadedFile::Malformed(reason) => return Err(AppError::Upload(reason)),
        };

        Ok(GenerateRequest {
            spec: BarcodeSpec::new(content, size),
            watermark,
        })
    }
}
