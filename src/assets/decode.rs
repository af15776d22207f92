use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

#[derive(Clone, Debug)]
/// Raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode an image file from disk.
pub fn load_image(path: &Path) -> ReelResult<image::DynamicImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        ReelError::composition(format!("failed to read image '{}': {e}", path.display()))
    })?;
    image::load_from_memory(&bytes).map_err(|e| {
        ReelError::composition(format!("failed to decode image '{}': {e}", path.display()))
    })
}

/// Premultiply a straight-alpha RGBA8 buffer.
pub fn prepare_rgba8(rgba: image::RgbaImage) -> PreparedImage {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
