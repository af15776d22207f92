use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Internal audio mixing sample rate used across decode/mix/encode pipeline.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// A locally readable audio file and its playable duration.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioAsset {
    /// File path.
    pub path: PathBuf,
    /// Playable duration in seconds.
    pub duration_secs: f64,
}

impl AudioAsset {
    /// Build an asset from a known duration.
    pub fn new(path: impl Into<PathBuf>, duration_secs: f64) -> Self {
        Self {
            path: path.into(),
            duration_secs,
        }
    }

    /// Probe `path` with `ffprobe` to learn its duration.
    pub fn probe(path: impl Into<PathBuf>) -> ReelResult<Self> {
        let path = path.into();
        let duration_secs = probe_audio_duration(&path)?;
        Ok(Self {
            path,
            duration_secs,
        })
    }
}

/// A locally readable image file and its pixel size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAsset {
    /// File path.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageAsset {
    /// Read the image header at `path` to learn its dimensions.
    pub fn probe(path: impl Into<PathBuf>) -> ReelResult<Self> {
        let path = path.into();
        let (width, height) = image::image_dimensions(&path).map_err(|e| {
            ReelError::composition(format!(
                "failed to read image header '{}': {e}",
                path.display()
            ))
        })?;
        Ok(Self {
            path,
            width,
            height,
        })
    }
}

#[derive(Clone, Debug)]
/// Decoded interleaved floating-point PCM.
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.interleaved_f32.len() / usize::from(self.channels.max(1))
    }
}

/// Probe the playable duration of an audio file through `ffprobe`.
pub fn probe_audio_duration(path: &Path) -> ReelResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: ProbeFormat,
    }

    if !path.is_file() {
        return Err(ReelError::composition(format!(
            "audio asset '{}' does not exist",
            path.display()
        )));
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_entries",
            "format=duration",
        ])
        .arg(path)
        .output()
        .map_err(|e| ReelError::composition(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::composition(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::composition(format!("ffprobe json parse failed: {e}")))?;
    let duration = parsed
        .format
        .duration
        .as_deref()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .ok_or_else(|| {
            ReelError::composition(format!(
                "ffprobe reported no duration for '{}'",
                path.display()
            ))
        })?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(ReelError::composition(format!(
            "audio asset '{}' has non-positive duration {duration}",
            path.display()
        )));
    }
    Ok(duration)
}

/// Decode audio from media source to stereo interleaved `f32` PCM.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            ReelError::composition(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(ReelError::composition(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::composition(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: pcm,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
