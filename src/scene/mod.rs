//! Scene assembly: one script scene plus its acquired media becomes a self-contained,
//! renderable unit whose duration is its audio timeline's total duration.

use std::path::Path;

use crate::assets::decode::{load_image, prepare_rgba8};
use crate::assets::media::AudioAsset;
use crate::audio::timeline::{AuxAudioSource, Timeline, compose_timeline};
use crate::caption::{CaptionLayer, CaptionRenderer, CaptionSpec, select_caption};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::ReelResult;
use crate::render::cpu::{BackgroundPaint, FrameRGBA, FrameRenderer};
use crate::script::model::Scene;
use crate::visual::cover::cover_fit;
use crate::visual::zoom::ZoomCurve;

/// Fade-from-black duration at the start of every scene.
pub const FADE_IN_SECS: f64 = 0.3;

/// A composed scene, ready to render any of its frames.
pub struct SceneUnit {
    index: usize,
    timeline: Timeline,
    zoom: ZoomCurve,
    background: BackgroundPaint,
    caption: CaptionLayer,
    caption_spec: CaptionSpec,
    canvas: Canvas,
}

impl std::fmt::Debug for SceneUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneUnit")
            .field("index", &self.index)
            .field("duration", &self.timeline.total_duration())
            .field("zoom", &self.zoom)
            .field("caption", &self.caption_spec)
            .finish_non_exhaustive()
    }
}

impl SceneUnit {
    /// Position of the scene in the script.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Audio timeline; its total duration is the scene duration.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Scene duration in seconds.
    pub fn duration(&self) -> f64 {
        self.timeline.total_duration()
    }

    /// Zoom curve applied to the background.
    pub fn zoom(&self) -> &ZoomCurve {
        &self.zoom
    }

    /// Caption text and style chosen for the scene.
    pub fn caption_spec(&self) -> &CaptionSpec {
        &self.caption_spec
    }

    /// Frames needed to cover the scene duration at `fps`.
    pub fn frame_count(&self, fps: Fps) -> u64 {
        fps.secs_to_frames_ceil(self.duration())
    }

    /// Render local frame `local_frame` (0-based within the scene).
    pub fn render_frame(
        &self,
        local_frame: u64,
        fps: Fps,
        renderer: &mut FrameRenderer,
    ) -> ReelResult<FrameRGBA> {
        let t = fps.frames_to_secs(local_frame);
        renderer.render(
            &self.background,
            self.zoom.transform_at(t, self.canvas),
            Some(&self.caption),
            fade_in_factor(t),
        )
    }
}

/// Opacity multiplier of the fade from black at scene-local time `t`.
pub fn fade_in_factor(t: f64) -> f32 {
    (t / FADE_IN_SECS).clamp(0.0, 1.0) as f32
}

/// Assemble one scene from its script entry and acquired media.
///
/// The background is cover-fitted once; the caption is laid out and rasterized once. Stingers
/// that `aux` cannot resolve are skipped.
#[tracing::instrument(level = "debug", skip_all, fields(scene = scene.index))]
pub fn assemble_scene(
    scene: &Scene,
    voice: AudioAsset,
    image_path: &Path,
    aux: &dyn AuxAudioSource,
    captions: &mut CaptionRenderer,
    canvas: Canvas,
) -> ReelResult<SceneUnit> {
    let timeline = compose_timeline(voice, &scene.meta, aux)?;
    let zoom = ZoomCurve::new(
        scene.meta.zoom_style,
        timeline.voice_duration(),
        timeline.total_duration(),
    )?;

    let source = load_image(image_path)?;
    let background = BackgroundPaint::from_prepared(&prepare_rgba8(cover_fit(&source, canvas)?))?;

    let caption_spec = select_caption(&scene.caption, &scene.meta);
    let caption = captions.render(&caption_spec, canvas)?;

    tracing::debug!(
        duration = timeline.total_duration(),
        tracks = timeline.placements().len(),
        punchline = caption_spec.is_punchline,
        "scene assembled"
    );

    Ok(SceneUnit {
        index: scene.index,
        timeline,
        zoom,
        background,
        caption,
        caption_spec,
        canvas,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mod.rs"]
mod tests;
