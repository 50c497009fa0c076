//! # 数据模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `EncodedBlob` 表示固定格式（PNG）的编码字节
//! - `RasterImage` 表示解码后的 RGBA 位图
//! - `Placement` 表示水印左上角在底图上的偏移
//! - `GenerateRequest` 表示一次生成请求的全部输入

use bytes::Bytes;
use image::RgbaImage;

use crate::barcode::BarcodeSpec;

/// 解码后的 RGBA 位图，每通道 8 位。
pub type RasterImage = RgbaImage;

/// PNG 编码后的图片字节。
///
/// 内部使用 `Bytes`，在 HTTP 响应中可零拷贝传递。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob(Bytes);

impl EncodedBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for EncodedBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

/// 水印左上角在底图上的整数偏移，可为负（越界部分会被裁剪）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
}

/// 一次生成请求：二维码参数 + 可选的水印原始字节。
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub spec: BarcodeSpec,
    pub watermark: Option<Bytes>,
}
