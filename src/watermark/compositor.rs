//! # 合成器
//!
//! ## 设计思路
//!
//! 合成过程是显式的纯函数 `blend(base, overlay, at) -> 新画布`：
//! 先复制底图得到独立画布，再把水印按 "over" 规则逐像素混合上去，
//! 输入与输出之间没有别名关系。
//!
//! ## 实现思路
//!
//! - 只遍历水印与画布的相交区域，越界像素直接丢弃
//! - alpha = 0 的像素保持底图不变，alpha = 255 的像素直接替换
//! - 其余像素按 `fg * a + bg * (1 - a)` 逐通道混合（四舍五入）

use image::Rgba;

use super::config::OVERLAY_WIDTH_RATIO;
use super::source::{Placement, RasterImage};

/// 根据底图宽度计算水印的目标宽度：`floor(base_width * 0.25)`。
pub fn overlay_target_width(base_width: u32) -> u32 {
    (base_width as f64 * OVERLAY_WIDTH_RATIO).floor() as u32
}

/// 计算水印居中放置时的左上角偏移。
///
/// `legacy_square_centering` 为真时纵向偏移也取底图宽度，只对正方形底图准确。
pub fn centered_placement(
    base: (u32, u32),
    overlay: (u32, u32),
    legacy_square_centering: bool,
) -> Placement {
    let (base_width, base_height) = base;
    let (overlay_width, overlay_height) = overlay;

    let x = (base_width / 2) as i64 - (overlay_width / 2) as i64;
    let y = if legacy_square_centering {
        x
    } else {
        (base_height / 2) as i64 - (overlay_height / 2) as i64
    };

    Placement { x, y }
}

/// 将水印混合到底图副本上并返回新画布。
pub fn blend(base: &RasterImage, overlay: &RasterImage, at: Placement) -> RasterImage {
    let mut canvas = base.clone();

    let (columns, rows) = match (
        visible_span(at.x, overlay.width(), canvas.width()),
        visible_span(at.y, overlay.height(), canvas.height()),
    ) {
        (Some(columns), Some(rows)) => (columns, rows),
        _ => return canvas,
    };

    for oy in rows.0..rows.1 {
        let ty = (at.y + oy as i64) as u32;
        for ox in columns.0..columns.1 {
            let tx = (at.x + ox as i64) as u32;
            let fg = overlay.get_pixel(ox, oy);
            match fg[3] {
                0 => {}
                255 => canvas.put_pixel(tx, ty, *fg),
                _ => {
                    let bg = canvas.get_pixel(tx, ty);
                    let blended = blend_pixel(bg, fg);
                    canvas.put_pixel(tx, ty, blended);
                }
            }
        }
    }

    canvas
}

/// 水印坐标系中落在画布内的半开区间 `[start, end)`。
fn visible_span(offset: i64, overlay_len: u32, canvas_len: u32) -> Option<(u32, u32)> {
    let start = (-offset).clamp(0, overlay_len as i64);
    let end = (canvas_len as i64 - offset).clamp(0, overlay_len as i64);
    (start < end).then_some((start as u32, end as u32))
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let alpha = fg[3] as f32 / 255.0;
    let inv = 1.0 - alpha;
    let channel = |c: usize| (fg[c] as f32 * alpha + bg[c] as f32 * inv).round().clamp(0.0, 255.0) as u8;
    let out_alpha = ((alpha + bg[3] as f32 / 255.0 * inv) * 255.0).round().clamp(0.0, 255.0) as u8;

    Rgba([channel(0), channel(1), channel(2), out_alpha])
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: [u8; 4] = [128, 128, 128, 255];

    fn gray_base(width: u32, height: u32) -> RasterImage {
        RasterImage::from_pixel(width, height, Rgba(GRAY))
    }

    #[test]
    fn overlay_width_is_a_floored_quarter() {
        assert_eq!(overlay_target_width(256), 64);
        assert_eq!(overlay_target_width(255), 63);
        assert_eq!(overlay_target_width(3), 0);
    }

    #[test]
    fn placement_centers_on_square_base() {
        let at = centered_placement((256, 256), (64, 64), false);

        assert_eq!(at, Placement { x: 96, y: 96 });
    }

    #[test]
    fn placement_uses_base_height_for_vertical_offset() {
        let corrected = centered_placement((400, 200), (100, 50), false);
        let legacy = centered_placement((400, 200), (100, 50), true);

        assert_eq!(corrected, Placement { x: 150, y: 75 });
        assert_eq!(legacy, Placement { x: 150, y: 150 });
    }

    #[test]
    fn opaque_overlay_replaces_destination() {
        let base = gray_base(8, 8);
        let overlay = RasterImage::from_pixel(2, 2, Rgba([10, 200, 30, 255]));

        let out = blend(&base, &overlay, Placement { x: 3, y: 3 });

        assert_eq!(out.get_pixel(3, 3), &Rgba([10, 200, 30, 255]));
        assert_eq!(out.get_pixel(4, 4), &Rgba([10, 200, 30, 255]));
        assert_eq!(out.get_pixel(2, 2), &Rgba(GRAY));
        assert_eq!(out.get_pixel(5, 5), &Rgba(GRAY));
    }

    #[test]
    fn transparent_overlay_is_a_no_op() {
        let base = RasterImage::from_fn(6, 6, |x, y| Rgba([x as u8 * 40, y as u8 * 40, 9, 255]));
        let overlay = RasterImage::from_pixel(6, 6, Rgba([255, 0, 0, 0]));

        let out = blend(&base, &overlay, Placement { x: 0, y: 0 });

        assert_eq!(out, base);
    }

    #[test]
    fn half_alpha_mixes_channels() {
        let base = RasterImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let overlay = RasterImage::from_pixel(1, 1, Rgba([255, 100, 0, 128]));

        let out = blend(&base, &overlay, Placement { x: 0, y: 0 });
        let pixel = out.get_pixel(0, 0);

        // 128 / 255 ≈ 0.502
        assert_eq!(pixel, &Rgba([128, 50, 0, 255]));
    }

    #[test]
    fn semi_transparent_overlay_on_transparent_base_accumulates_alpha() {
        let base = RasterImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let overlay = RasterImage::from_pixel(1, 1, Rgba([200, 200, 200, 51]));

        let out = blend(&base, &overlay, Placement { x: 0, y: 0 });

        assert_eq!(out.get_pixel(0, 0)[3], 51);
    }

    #[test]
    fn overlay_past_the_edges_is_clipped() {
        let base = gray_base(10, 10);
        let overlay = RasterImage::from_pixel(6, 6, Rgba([0, 0, 255, 255]));

        let bottom_right = blend(&base, &overlay, Placement { x: 7, y: 8 });
        let top_left = blend(&base, &overlay, Placement { x: -4, y: -5 });
        let outside = blend(&base, &overlay, Placement { x: 50, y: -50 });

        assert_eq!(bottom_right.get_pixel(9, 9), &Rgba([0, 0, 255, 255]));
        assert_eq!(bottom_right.get_pixel(6, 9), &Rgba(GRAY));
        assert_eq!(top_left.get_pixel(1, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(top_left.get_pixel(2, 0), &Rgba(GRAY));
        assert_eq!(top_left.get_pixel(0, 1), &Rgba(GRAY));
        assert_eq!(outside, base);
    }

    #[test]
    fn blend_leaves_input_untouched() {
        let base = gray_base(4, 4);
        let overlay = RasterImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));

        let out = blend(&base, &overlay, Placement { x: 0, y: 0 });

        assert_eq!(base, gray_base(4, 4));
        assert_ne!(out, base);
    }
}
