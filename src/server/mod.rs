//! # HTTP 层
//!
//! ## 设计思路
//!
//! 路由层仅做参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `WatermarkService`，保持处理函数薄、稳定、易测试。
//!
//! - `form`：multipart / 查询参数提取与校验
//! - `handler`：`/generate` 处理函数

pub mod form;
mod handler;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;

use crate::error::AppError;
use crate::settings::ServerSettings;
use crate::watermark::WatermarkService;

pub use handler::generate;

/// 路由共享状态。
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WatermarkService>,
    pub max_barcode_size: u32,
}

/// 按配置构建完整路由。
pub fn app(settings: &ServerSettings) -> Router {
    let service = Arc::new(WatermarkService::with_config(settings.watermark.clone()));
    router(service, settings)
}

/// 使用给定服务构建路由，便于测试注入。
pub fn router(service: Arc<WatermarkService>, settings: &ServerSettings) -> Router {
    let state = AppState {
        service,
        max_barcode_size: settings.max_barcode_size,
    };

    Router::new()
        .route("/generate", get(generate).post(generate))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .with_state(state)
}

/// 在已绑定的监听器上运行服务，收到 Ctrl-C 后优雅退出。
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("🚀 服务已启动: http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("收到退出信号，正在停止服务"),
        Err(err) => {
            log::warn!("注册退出信号失败，服务将持续运行: {err}");
            std::future::pending::<()>().await;
        }
    }
}
