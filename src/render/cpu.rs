use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::caption::CaptionLayer;
use crate::caption::CaptionStyle;
use crate::caption::layout::TextBrushRgba8;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{ReelError, ReelResult};

/// A rendered frame in RGBA8 format.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag is included to make this
/// explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

#[derive(Clone)]
/// Background image ready to be used as a vello_cpu paint.
pub struct BackgroundPaint {
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
}

impl BackgroundPaint {
    /// Wrap an already premultiplied image.
    pub fn from_prepared(img: &PreparedImage) -> ReelResult<Self> {
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width: img.width,
            height: img.height,
        })
    }

    /// Paint size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Per-worker frame rasterizer.
///
/// Holds a reusable render context and target pixmap sized to the output canvas, so a worker
/// thread allocates them once and renders many frames.
pub struct FrameRenderer {
    canvas: Canvas,
    ctx: Option<vello_cpu::RenderContext>,
    target: vello_cpu::Pixmap,
}

impl FrameRenderer {
    /// Create a renderer for `canvas`.
    pub fn new(canvas: Canvas) -> ReelResult<Self> {
        let (w, h) = canvas_dims_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: None,
            target: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Canvas this renderer targets.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render one frame.
    ///
    /// Draws `background` under `transform`, composites the caption layer (which does not
    /// zoom), then scales the result by `fade` in `[0, 1]`. Uncovered pixels stay transparent,
    /// which the encoder flattens to black.
    pub fn render(
        &mut self,
        background: &BackgroundPaint,
        transform: Affine,
        caption: Option<&CaptionLayer>,
        fade: f32,
    ) -> ReelResult<FrameRGBA> {
        let (w, h) = canvas_dims_u16(self.canvas)?;
        self.target.data_as_u8_slice_mut().fill(0);

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(background.paint.clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(background.width),
            f64::from(background.height),
        ));
        ctx.flush();
        ctx.render_to_pixmap(&mut self.target);
        self.ctx = Some(ctx);

        let mut data = self.target.data_as_u8_slice().to_vec();
        if let Some(layer) = caption {
            layer.composite_onto(&mut data, self.canvas);
        }
        crate::foundation::math::scale_premul_rgba8_in_place(&mut data, fade);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }
}

/// Rasterize a Parley layout into a transparent `width`x`height` premultiplied box.
///
/// Each glyph run is outlined first and then filled, so the visible outline extends
/// `stroke_width_px` outward from the glyph edge.
pub(crate) fn rasterize_text_box(
    layout: &parley::Layout<TextBrushRgba8>,
    font_bytes: Arc<Vec<u8>>,
    style: &CaptionStyle,
    offset_y: f32,
    width: u32,
    height: u32,
) -> ReelResult<PreparedImage> {
    let (w, h) = dims_u16(width, height)?;
    let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(font_bytes), 0);
    let [sr, sg, sb, sa] = style.stroke;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((0.0, f64::from(offset_y))));
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(
        f64::from(style.stroke_width_px) * 2.0,
    ));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let font_size = run.run().font_size();
            let glyphs: Vec<vello_cpu::Glyph> = run
                .positioned_glyphs()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                })
                .collect();

            if style.stroke_width_px > 0.0 {
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(sr, sg, sb, sa));
                ctx.glyph_run(&font)
                    .font_size(font_size)
                    .stroke_glyphs(glyphs.iter().cloned());
            }

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            ctx.glyph_run(&font)
                .font_size(font_size)
                .fill_glyphs(glyphs.into_iter());
        }
    }

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data_as_u8_slice().to_vec()),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn canvas_dims_u16(canvas: Canvas) -> ReelResult<(u16, u16)> {
    dims_u16(canvas.width, canvas.height)
}

fn dims_u16(width: u32, height: u32) -> ReelResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::composition("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::composition("pixmap height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ReelError::composition("pixmap dimensions must be non-zero"));
    }
    Ok((w, h))
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> ReelResult<vello_cpu::Pixmap> {
    let (w, h) = dims_u16(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::composition("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
