//! # 二维码水印服务 — 应用入口
//!
//! 本文件仅负责日志、配置与监听器初始化。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use qr_watermark::{server, settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match settings::load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("startup: 配置加载失败: {err}");
            std::process::exit(1);
        }
    };
    log::info!(
        "startup: bind={} max_upload={}B max_size={}px",
        settings.bind_addr,
        settings.max_upload_bytes,
        settings.max_barcode_size
    );

    let listener = match TcpListener::bind(&settings.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            log::error!("startup: 监听 {} 失败: {err}", settings.bind_addr);
            std::process::exit(1);
        }
    };

    if let Err(err) = server::serve(listener, server::app(&settings)).await {
        log::error!("服务异常退出: {err}");
        std::process::exit(1);
    }
}
