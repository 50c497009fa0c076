//! `/generate` 请求处理：参数适配 + 后台线程执行合成。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Form, FromRequest, Multipart, Query, Request, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::form::{GenerateForm, UploadedFile};
use crate::error::AppError;
use crate::watermark::codec::SUPPORTED_MIME;

/// 生成二维码（可选水印），成功时直接返回 PNG 字节。
pub async fn generate(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    request: Request,
) -> Result<Response, AppError> {
    let start = Instant::now();

    let form = read_body(&state, request).await;
    let request = form
        .with_query_fallback(&query)
        .into_request(state.max_barcode_size)?;

    let has_watermark = request.watermark.is_some();
    let service = Arc::clone(&state.service);
    let blob = tokio::task::spawn_blocking(move || service.generate(request))
        .await
        .map_err(|e| AppError::Internal(format!("生成任务异常退出: {}", e)))??;

    log::info!(
        "📤 /generate 完成 - watermark={} bytes={} elapsed={}ms",
        has_watermark,
        blob.len(),
        start.elapsed().as_millis()
    );

    Ok(([(header::CONTENT_TYPE, SUPPORTED_MIME)], blob.into_bytes()).into_response())
}

/// 按 `Content-Type` 选择请求体的解析方式。其他类型的请求体忽略，参数只看查询串。
async fn read_body(state: &AppState, request: Request) -> GenerateForm {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        match Multipart::from_request(request, state).await {
            Ok(multipart) => GenerateForm::from_multipart(multipart).await,
            Err(rejection) => {
                log::warn!("⚠️ multipart 请求头无效: {}", rejection);
                GenerateForm {
                    watermark: UploadedFile::Malformed(rejection.to_string()),
                    ..GenerateForm::default()
                }
            }
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        match Form::<HashMap<String, String>>::from_request(request, state).await {
            Ok(Form(fields)) => GenerateForm::from_fields(&fields),
            Err(rejection) => {
                log::warn!("⚠️ urlencoded 请求体解析失败: {}", rejection);
                GenerateForm::default()
            }
        }
    } else {
        GenerateForm::default()
    }
}
