use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::media::{AudioPcm, decode_audio_f32_stereo};
use crate::audio::timeline::Timeline;
use crate::foundation::error::ReelResult;

#[derive(Clone, Debug)]
/// One scheduled audio contribution in reel sample space.
pub(crate) struct AudioSegment {
    pub(crate) timeline_start_sample: u64,
    /// Exclusive; already truncated at the owning scene's end.
    pub(crate) timeline_end_sample: u64,
    pub(crate) volume: f32,
    pub(crate) source_sample_rate: u32,
    pub(crate) source_channels: u16,
    pub(crate) source_interleaved_f32: Arc<Vec<f32>>,
}

#[derive(Clone, Debug)]
/// Audio mixing plan for the whole reel.
pub(crate) struct AudioManifest {
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
    pub(crate) total_samples: u64,
    pub(crate) segments: Vec<AudioSegment>,
}

/// Turns an audio file into PCM at a requested sample rate.
pub(crate) trait PcmDecoder: Sync {
    fn decode(&self, path: &Path, sample_rate: u32) -> ReelResult<AudioPcm>;
}

/// Decoder backed by the system `ffmpeg`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FfmpegPcmDecoder;

impl PcmDecoder for FfmpegPcmDecoder {
    fn decode(&self, path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
        decode_audio_f32_stereo(path, sample_rate)
    }
}

#[derive(Clone, Debug)]
struct CachedPcm {
    sample_rate: u32,
    channels: u16,
    data: Arc<Vec<f32>>,
}

/// Accumulates scene timelines, in reel order, into one [`AudioManifest`].
///
/// Sources are decoded once per path; stingers reused across scenes share their PCM.
pub(crate) struct AudioManifestBuilder<'a> {
    decoder: &'a dyn PcmDecoder,
    sample_rate: u32,
    cache: HashMap<PathBuf, CachedPcm>,
    segments: Vec<AudioSegment>,
}

impl<'a> AudioManifestBuilder<'a> {
    pub(crate) fn with_sample_rate(decoder: &'a dyn PcmDecoder, sample_rate: u32) -> Self {
        Self {
            decoder,
            sample_rate,
            cache: HashMap::new(),
            segments: Vec::new(),
        }
    }

    /// Schedule every placement of `timeline` for a scene occupying
    /// `[scene_start_sample, scene_end_sample)`. Tracks are cut at the scene end.
    pub(crate) fn push_scene(
        &mut self,
        timeline: &Timeline,
        scene_start_sample: u64,
        scene_end_sample: u64,
    ) -> ReelResult<()> {
        for placement in timeline.placements() {
            let start = scene_start_sample + secs_to_sample(placement.start_offset, self.sample_rate);
            if start >= scene_end_sample {
                continue;
            }
            let natural_end = scene_start_sample + secs_to_sample(placement.end(), self.sample_rate);
            let end = natural_end.min(scene_end_sample);
            if end <= start {
                continue;
            }

            let pcm = self.ensure_pcm(&placement.source.path)?;
            if pcm.data.is_empty() {
                continue;
            }
            self.segments.push(AudioSegment {
                timeline_start_sample: start,
                timeline_end_sample: end,
                volume: placement.volume.max(0.0),
                source_sample_rate: pcm.sample_rate,
                source_channels: pcm.channels,
                source_interleaved_f32: pcm.data.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn finish(self, total_samples: u64) -> AudioManifest {
        AudioManifest {
            sample_rate: self.sample_rate,
            channels: 2,
            total_samples,
            segments: self.segments,
        }
    }

    fn ensure_pcm(&mut self, path: &Path) -> ReelResult<CachedPcm> {
        if let Some(pcm) = self.cache.get(path) {
            return Ok(pcm.clone());
        }
        let pcm = self.decoder.decode(path, self.sample_rate)?;
        let cached = CachedPcm {
            sample_rate: pcm.sample_rate,
            channels: pcm.channels,
            data: Arc::new(pcm.interleaved_f32),
        };
        self.cache.insert(path.to_path_buf(), cached.clone());
        Ok(cached)
    }
}

/// Nearest sample index for an offset in seconds.
pub(crate) fn secs_to_sample(secs: f64, sample_rate: u32) -> u64 {
    (secs.max(0.0) * f64::from(sample_rate)).round() as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/manifest.rs"]
mod tests;
