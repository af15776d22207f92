//! Caption styling and overlay rasterization.
//!
//! A scene's caption is chosen once (punchline or plain), laid out with Parley inside a fixed
//! box and rasterized into a premultiplied layer that the frame renderer composites over every
//! frame of that scene.

pub(crate) mod layout;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::decode::PreparedImage;
use crate::caption::layout::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::model::ComedyMeta;

/// Caption box width in pixels.
pub const CAPTION_BOX_WIDTH: u32 = 850;
/// Caption box height in pixels.
pub const CAPTION_BOX_HEIGHT: u32 = 450;
/// Top edge of the caption box on the output canvas.
pub const CAPTION_BOX_TOP: u32 = 1300;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Visual treatment of caption text.
pub struct CaptionStyle {
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Straight-alpha RGBA8 fill color.
    pub fill: [u8; 4],
    /// Straight-alpha RGBA8 outline color.
    pub stroke: [u8; 4],
    /// Outline width in pixels, measured outward from the glyph edge.
    pub stroke_width_px: f32,
}

impl CaptionStyle {
    /// White 48 px text with a 2 px black outline.
    pub const PLAIN: Self = Self {
        font_size_px: 48.0,
        fill: [255, 255, 255, 255],
        stroke: [0, 0, 0, 255],
        stroke_width_px: 2.0,
    };

    /// Yellow 55 px text with a 2 px black outline.
    pub const PUNCHLINE: Self = Self {
        font_size_px: 55.0,
        fill: [255, 255, 0, 255],
        stroke: [0, 0, 0, 255],
        stroke_width_px: 2.0,
    };
}

#[derive(Clone, Debug, PartialEq)]
/// Caption text plus the style it is drawn with.
pub struct CaptionSpec {
    /// Text as it will be drawn.
    pub text: String,
    /// Drawing style.
    pub style: CaptionStyle,
    /// Whether the highlight word matched and the punchline treatment applies.
    pub is_punchline: bool,
}

/// Choose caption text and style for a scene.
///
/// The highlight word is matched case-insensitively as a substring of the caption. A match
/// upper-cases the whole caption and applies [`CaptionStyle::PUNCHLINE`]; otherwise the caption
/// is kept verbatim in [`CaptionStyle::PLAIN`]. An empty highlight never matches.
pub fn select_caption(caption: &str, meta: &ComedyMeta) -> CaptionSpec {
    let highlight = meta
        .highlight_word
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_default();
    let upper = caption.to_uppercase();
    if !highlight.is_empty() && upper.contains(&highlight) {
        CaptionSpec {
            text: upper,
            style: CaptionStyle::PUNCHLINE,
            is_punchline: true,
        }
    } else {
        CaptionSpec {
            text: caption.to_owned(),
            style: CaptionStyle::PLAIN,
            is_punchline: false,
        }
    }
}

#[derive(Clone, Debug)]
/// Rasterized caption box positioned on the output canvas.
pub struct CaptionLayer {
    /// Left edge on the canvas.
    pub left: u32,
    /// Top edge on the canvas.
    pub top: u32,
    /// Premultiplied pixels of the caption box.
    pub image: PreparedImage,
}

impl CaptionLayer {
    /// Source-over composite this layer onto a premultiplied canvas buffer, clipping at the
    /// canvas edges.
    pub fn composite_onto(&self, dst: &mut [u8], canvas: Canvas) {
        let cw = canvas.width as usize;
        let ch = canvas.height as usize;
        let left = self.left as usize;
        let top = self.top as usize;
        if left >= cw || top >= ch {
            return;
        }
        let lw = self.image.width as usize;
        let visible_w = lw.min(cw - left);
        let visible_h = (self.image.height as usize).min(ch - top);

        for row in 0..visible_h {
            let src_start = row * lw * 4;
            let src = &self.image.rgba8_premul[src_start..src_start + visible_w * 4];
            let dst_start = ((top + row) * cw + left) * 4;
            let Some(dst_row) = dst.get_mut(dst_start..dst_start + visible_w * 4) else {
                return;
            };
            crate::foundation::math::premul_over_in_place(dst_row, src);
        }
    }
}

/// Lays out and rasterizes captions with a single font.
pub struct CaptionRenderer {
    font_bytes: Arc<Vec<u8>>,
    engine: TextLayoutEngine,
}

impl CaptionRenderer {
    /// Build a renderer from raw TTF/OTF bytes.
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> ReelResult<Self> {
        let engine = TextLayoutEngine::new(&font_bytes)?;
        Ok(Self {
            font_bytes: Arc::new(font_bytes),
            engine,
        })
    }

    /// Read a font file and build a renderer from it.
    pub fn from_font_path(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read caption font '{}'", path.display()))?;
        Self::from_font_bytes(bytes)
    }

    /// Lay out `spec` inside the caption box and rasterize it.
    ///
    /// Text is wrapped to the box width, centered per line, and the block is centered
    /// vertically; anything taller than the box is clipped at its bottom edge.
    #[tracing::instrument(level = "debug", skip(self, spec), fields(punchline = spec.is_punchline))]
    pub fn render(&mut self, spec: &CaptionSpec, canvas: Canvas) -> ReelResult<CaptionLayer> {
        if canvas.width < CAPTION_BOX_WIDTH {
            return Err(ReelError::composition(format!(
                "canvas width {} is narrower than the caption box",
                canvas.width
            )));
        }
        let layout = self.engine.layout_centered(
            &spec.text,
            spec.style.font_size_px,
            TextBrushRgba8::from(spec.style.fill),
            CAPTION_BOX_WIDTH as f32,
        )?;
        let offset_y = ((CAPTION_BOX_HEIGHT as f32 - layout.height()) / 2.0).max(0.0);

        let image = crate::render::cpu::rasterize_text_box(
            &layout,
            self.font_bytes.clone(),
            &spec.style,
            offset_y,
            CAPTION_BOX_WIDTH,
            CAPTION_BOX_HEIGHT,
        )?;

        Ok(CaptionLayer {
            left: (canvas.width - CAPTION_BOX_WIDTH) / 2,
            top: CAPTION_BOX_TOP,
            image,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/mod.rs"]
mod tests;
