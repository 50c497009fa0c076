//! # 二维码水印服务 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 HTTP 客户端 (multipart)                   │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ POST /generate  size / content / watermark
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            服务端 (Rust)                          │
//! │                                                          │
//! │  ┌─ server ────── axum 路由 + 表单校验                     │
//! │  │                                                       │
//! │  ├─ error ─────── AppError (统一错误类型 → 400 JSON)       │
//! │  │                                                       │
//! │  ├─ barcode ───── 二维码编码 (qrcode, Medium 纠错)         │
//! │  │                                                       │
//! │  ├─ watermark ─── 嗅探·解码·缩放·居中混合·编码             │
//! │  └─ settings ──── JSON 配置 + 环境变量覆盖                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，HTTP 处理函数的错误返回类型 |
//! | [`barcode`] | 生成二维码原图 |
//! | [`watermark`] | 将上传的 PNG 缩放到二维码宽度的 1/4 并居中合成 |
//! | [`server`] | 路由、multipart 提取、参数校验、后台线程调度 |
//! | [`settings`] | 服务配置加载与校验 |

pub mod barcode;
pub mod error;
pub mod server;
pub mod settings;
pub mod watermark;
