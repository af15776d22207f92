use image::imageops::{self, FilterType};

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// Source-space window `(x, y, width, height)` that cover-fit keeps.
///
/// Height is matched first; if that leaves the width short of the canvas, width is matched
/// instead. The window has the canvas aspect (rounded to whole pixels, at least 1) and is
/// centered in the source.
pub fn cover_crop_rect(
    src_width: u32,
    src_height: u32,
    canvas: Canvas,
) -> ReelResult<(u32, u32, u32, u32)> {
    if src_width == 0 || src_height == 0 {
        return Err(ReelError::composition("background image has zero size"));
    }
    if canvas.width == 0 || canvas.height == 0 {
        return Err(ReelError::composition("canvas has zero size"));
    }
    let (w, h) = (u64::from(src_width), u64::from(src_height));
    let (cw, ch) = (u64::from(canvas.width), u64::from(canvas.height));

    let (crop_w, crop_h) = if w * ch >= cw * h {
        let cw_src = ((cw * h) as f64 / ch as f64).round() as u32;
        (cw_src.clamp(1, src_width), src_height)
    } else {
        let ch_src = ((ch * w) as f64 / cw as f64).round() as u32;
        (src_width, ch_src.clamp(1, src_height))
    };
    Ok((
        (src_width - crop_w) / 2,
        (src_height - crop_h) / 2,
        crop_w,
        crop_h,
    ))
}

/// Crop `img` to its centered canvas-aspect window and scale it to exactly the canvas size.
pub fn cover_fit(img: &image::DynamicImage, canvas: Canvas) -> ReelResult<image::RgbaImage> {
    let (x, y, w, h) = cover_crop_rect(img.width(), img.height(), canvas)?;
    let window = img.crop_imm(x, y, w, h).to_rgba8();
    if window.dimensions() == (canvas.width, canvas.height) {
        return Ok(window);
    }
    Ok(imageops::resize(
        &window,
        canvas.width,
        canvas.height,
        FilterType::Lanczos3,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/visual/cover.rs"]
mod tests;
