//! Sequencer: assembles scenes (optionally in parallel), concatenates them strictly in script
//! order, mixes the soundtrack and streams frames into a [`FrameSink`].

use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::media::{AudioAsset, MIX_SAMPLE_RATE};
use crate::audio::manifest::{AudioManifest, AudioManifestBuilder, FfmpegPcmDecoder, PcmDecoder};
use crate::audio::mix::{frame_to_sample, mix_manifest, write_mix_to_f32le_file};
use crate::audio::timeline::AuxAudioSource;
use crate::caption::CaptionRenderer;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, OUTPUT_CANVAS, OUTPUT_FPS};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::cpu::{FrameRGBA, FrameRenderer};
use crate::scene::{SceneUnit, assemble_scene};
use crate::script::model::Script;

/// Render settings shared by every scene of a reel.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Worker threads for assembly and rendering; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Frames rendered per parallel batch.
    pub chunk_size: u64,
    /// Soundtrack sample rate.
    pub sample_rate: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: OUTPUT_CANVAS,
            fps: OUTPUT_FPS,
            threads: None,
            chunk_size: 32,
            sample_rate: MIX_SAMPLE_RATE,
        }
    }
}

/// Media acquired for one scene.
#[derive(Clone, Debug)]
pub struct SceneMedia {
    /// Synthesized voice line.
    pub voice: AudioAsset,
    /// Generated background image.
    pub image_path: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Counters reported after a reel has been rendered.
pub struct RenderSummary {
    /// Number of scenes.
    pub scenes: usize,
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Reel duration in seconds (frame count / fps).
    pub duration_secs: f64,
    /// Scheduled audio segments in the soundtrack.
    pub audio_segments: usize,
}

/// Drives assembly, mixing and frame output for a whole reel.
pub struct Sequencer<'a> {
    config: RenderConfig,
    aux: &'a dyn AuxAudioSource,
    font_bytes: Arc<Vec<u8>>,
    decoder: Box<dyn PcmDecoder + 'a>,
}

impl<'a> Sequencer<'a> {
    /// Create a sequencer; `font_bytes` is the caption font (TTF/OTF).
    ///
    /// The font is parsed once here so a bad font fails before any scene work starts.
    pub fn new(
        config: RenderConfig,
        aux: &'a dyn AuxAudioSource,
        font_bytes: Vec<u8>,
    ) -> ReelResult<Self> {
        if config.threads == Some(0) {
            return Err(ReelError::validation("threads must be >= 1 when set"));
        }
        if config.chunk_size == 0 {
            return Err(ReelError::validation("chunk_size must be >= 1"));
        }
        if config.sample_rate == 0 {
            return Err(ReelError::validation("sample_rate must be > 0"));
        }
        CaptionRenderer::from_font_bytes(font_bytes.clone())?;
        Ok(Self {
            config,
            aux,
            font_bytes: Arc::new(font_bytes),
            decoder: Box::new(FfmpegPcmDecoder),
        })
    }

    pub(crate) fn with_decoder(mut self, decoder: Box<dyn PcmDecoder + 'a>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Assemble every scene of `script` from its acquired media.
    ///
    /// Scenes are assembled on the worker pool; the result keeps script order. When several
    /// scenes fail, the lowest index is reported.
    #[tracing::instrument(level = "info", skip_all, fields(scenes = script.scenes.len()))]
    pub fn assemble(&self, script: &Script, media: &[SceneMedia]) -> ReelResult<Vec<SceneUnit>> {
        if script.scenes.len() != media.len() {
            return Err(ReelError::validation(format!(
                "got media for {} scenes, script has {}",
                media.len(),
                script.scenes.len()
            )));
        }

        let pool = build_thread_pool(self.config.threads)?;
        let canvas = self.config.canvas;
        let results: Vec<ReelResult<SceneUnit>> = pool.install(|| {
            script
                .scenes
                .par_iter()
                .zip(media.par_iter())
                .map_init(
                    || CaptionRenderer::from_font_bytes(self.font_bytes.as_ref().clone()),
                    |captions, (scene, m)| {
                        let captions = captions
                            .as_mut()
                            .map_err(|e| ReelError::composition(e.to_string()))
                            .map_err(|e| e.in_scene(scene.index))?;
                        assemble_scene(
                            scene,
                            m.voice.clone(),
                            &m.image_path,
                            self.aux,
                            captions,
                            canvas,
                        )
                        .map_err(|e| e.in_scene(scene.index))
                    },
                )
                .collect()
        });

        let mut units = Vec::with_capacity(results.len());
        for result in results {
            units.push(result?);
        }
        Ok(units)
    }

    /// Stream `units` to `sink` in order, with the mixed soundtrack attached.
    #[tracing::instrument(level = "info", skip_all, fields(scenes = units.len()))]
    pub fn render(
        &self,
        units: &[SceneUnit],
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderSummary> {
        if units.is_empty() {
            return Err(ReelError::validation("cannot render a reel without scenes"));
        }
        let fps = self.config.fps;
        let spans = scene_spans(units, fps);
        let total_frames = spans.last().map_or(0, |r| r.end.0);

        let manifest = build_audio_manifest(
            units,
            &spans,
            fps,
            self.config.sample_rate,
            self.decoder.as_ref(),
        )?;
        let mut audio_tmp = TempFileGuard(None);
        let audio = if manifest.segments.is_empty() {
            tracing::warn!("soundtrack has no audible segments; encoding without audio");
            None
        } else {
            let mixed = mix_manifest(&manifest);
            let path = std::env::temp_dir().join(format!(
                "reelsmith_mix_{}_{}.f32le",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or(0)
            ));
            write_mix_to_f32le_file(&mixed, &path)?;
            audio_tmp.0 = Some(path.clone());
            Some(AudioInputConfig {
                path,
                sample_rate: manifest.sample_rate,
                channels: manifest.channels,
            })
        };

        sink.begin(SinkConfig {
            width: self.config.canvas.width,
            height: self.config.canvas.height,
            fps,
            audio,
        })?;

        let pool = build_thread_pool(self.config.threads)?;
        for (unit, span) in units.iter().zip(&spans) {
            tracing::debug!(
                scene = unit.index(),
                start = span.start.0,
                frames = span.len_frames(),
                "rendering scene"
            );
            self.render_scene(unit, *span, &pool, sink)
                .map_err(|e| e.in_scene(unit.index()))?;
        }
        sink.end()?;

        let summary = RenderSummary {
            scenes: units.len(),
            frames: total_frames,
            duration_secs: fps.frames_to_secs(total_frames),
            audio_segments: manifest.segments.len(),
        };
        tracing::info!(
            frames = summary.frames,
            duration = summary.duration_secs,
            "reel rendered"
        );
        Ok(summary)
    }

    /// Assemble then render.
    pub fn run(
        &self,
        script: &Script,
        media: &[SceneMedia],
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderSummary> {
        let units = self.assemble(script, media)?;
        self.render(&units, sink)
    }

    fn render_scene(
        &self,
        unit: &SceneUnit,
        span: FrameRange,
        pool: &rayon::ThreadPool,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<()> {
        let fps = self.config.fps;
        let canvas = self.config.canvas;
        let local = FrameRange::new(FrameIndex(0), FrameIndex(span.len_frames()))?;

        for chunk in local.chunks(self.config.chunk_size) {
            let frames: Vec<ReelResult<FrameRGBA>> = pool.install(|| {
                (chunk.start.0..chunk.end.0)
                    .into_par_iter()
                    .map_init(
                        || FrameRenderer::new(canvas),
                        |renderer, f| match renderer {
                            Ok(r) => unit.render_frame(f, fps, r),
                            Err(e) => Err(ReelError::composition(e.to_string())),
                        },
                    )
                    .collect()
            });
            for (offset, frame) in (chunk.start.0..).zip(frames) {
                sink.push_frame(FrameIndex(span.start.0 + offset), &frame?)?;
            }
        }
        Ok(())
    }
}

/// Global frame span of every scene, back to back from frame 0.
pub(crate) fn scene_spans(units: &[SceneUnit], fps: Fps) -> Vec<FrameRange> {
    let mut start = 0u64;
    units
        .iter()
        .map(|u| {
            let end = start + u.frame_count(fps);
            let span = FrameRange {
                start: FrameIndex(start),
                end: FrameIndex(end),
            };
            start = end;
            span
        })
        .collect()
}

/// Place every scene's timeline at the sample of its first frame, cut at its last.
pub(crate) fn build_audio_manifest(
    units: &[SceneUnit],
    spans: &[FrameRange],
    fps: Fps,
    sample_rate: u32,
    decoder: &dyn PcmDecoder,
) -> ReelResult<AudioManifest> {
    let mut builder = AudioManifestBuilder::with_sample_rate(decoder, sample_rate);
    for (unit, span) in units.iter().zip(spans) {
        builder
            .push_scene(
                unit.timeline(),
                frame_to_sample(span.start.0, fps, sample_rate),
                frame_to_sample(span.end.0, fps, sample_rate),
            )
            .map_err(|e| e.in_scene(unit.index()))?;
    }
    let total = spans.last().map_or(0, |r| r.end.0);
    Ok(builder.finish(frame_to_sample(total, fps, sample_rate)))
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::composition(format!("failed to build rayon thread pool: {e}")))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/mod.rs"]
mod tests;
