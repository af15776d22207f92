use crate::assets::locator::SfxLibrary;
use crate::assets::media::AudioAsset;
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::model::ComedyMeta;

/// Gain applied to the laugh stinger.
pub const LAUGH_VOLUME: f32 = 0.7;

/// Share of the laugh stinger that counts towards the scene duration. The rest of the laugh is
/// cut off at the scene end.
pub const LAUGH_ADVANCE_FRACTION: f64 = 0.5;

/// What a placed track is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackRole {
    /// The spoken line. Always first, always at offset 0.
    Voice,
    /// Sound effect after the punchline beat.
    Sfx,
    /// Laugh-track stinger after the sound effect.
    Laugh,
}

/// One audio source placed on a scene timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackPlacement {
    /// Track purpose.
    pub role: TrackRole,
    /// Placed asset.
    pub source: AudioAsset,
    /// Start offset in seconds from the scene start.
    pub start_offset: f64,
    /// Linear gain in `(0, 1]`.
    pub volume: f32,
}

impl TrackPlacement {
    /// Offset at which the source runs out (may exceed the scene duration).
    pub fn end(&self) -> f64 {
        self.start_offset + self.source.duration_secs
    }
}

/// Audio placements of one scene plus the derived scene duration.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    placements: Vec<TrackPlacement>,
    total_duration: f64,
}

impl Timeline {
    /// Placements in placement order; the voice is always first.
    pub fn placements(&self) -> &[TrackPlacement] {
        &self.placements
    }

    /// Scene duration in seconds. Playback of every track is truncated here.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// The voice placement.
    pub fn voice(&self) -> &TrackPlacement {
        &self.placements[0]
    }

    /// Duration of the spoken line.
    pub fn voice_duration(&self) -> f64 {
        self.voice().source.duration_secs
    }

    /// First placement with `role`, if that track made it onto the timeline.
    pub fn track(&self, role: TrackRole) -> Option<&TrackPlacement> {
        self.placements.iter().find(|p| p.role == role)
    }
}

/// Resolves a library tag (`"whoosh"`, `"laugh_medium"`) to a ready audio asset.
///
/// `Ok(None)` means "skip this track". `Err` is reserved for assets that were found but cannot be
/// used.
pub trait AuxAudioSource: Sync {
    /// Resolve `tag`.
    fn resolve(&self, tag: &str) -> ReelResult<Option<AudioAsset>>;
}

impl AuxAudioSource for SfxLibrary {
    fn resolve(&self, tag: &str) -> ReelResult<Option<AudioAsset>> {
        match self.locate(Some(tag)) {
            Some(path) => AudioAsset::probe(path).map(Some),
            None => Ok(None),
        }
    }
}

/// A source that never resolves anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuxAudio;

impl AuxAudioSource for NoAuxAudio {
    fn resolve(&self, _tag: &str) -> ReelResult<Option<AudioAsset>> {
        Ok(None)
    }
}

struct TimelineBuilder {
    placements: Vec<TrackPlacement>,
    cursor: f64,
}

impl TimelineBuilder {
    fn new(voice: AudioAsset, beat: f64) -> Self {
        let cursor = voice.duration_secs + beat;
        Self {
            placements: vec![TrackPlacement {
                role: TrackRole::Voice,
                source: voice,
                start_offset: 0.0,
                volume: 1.0,
            }],
            cursor,
        }
    }

    /// Place `source` at the cursor and move the cursor by `advance` of its duration.
    fn place(&mut self, role: TrackRole, source: AudioAsset, volume: f32, advance: f64) {
        let step = source.duration_secs * advance;
        self.placements.push(TrackPlacement {
            role,
            source,
            start_offset: self.cursor,
            volume,
        });
        self.cursor += step;
    }

    fn finish(self) -> Timeline {
        Timeline {
            placements: self.placements,
            total_duration: self.cursor,
        }
    }
}

/// Build the audio timeline of one scene.
///
/// Voice at 0, then the punchline beat, then the sound effect (full duration), then the laugh
/// (half its duration counts). Missing stingers are skipped.
pub fn compose_timeline(
    voice: AudioAsset,
    meta: &ComedyMeta,
    aux: &dyn AuxAudioSource,
) -> ReelResult<Timeline> {
    if !voice.duration_secs.is_finite() || voice.duration_secs <= 0.0 {
        return Err(ReelError::composition(format!(
            "voice asset '{}' has invalid duration {}",
            voice.path.display(),
            voice.duration_secs
        )));
    }
    if !meta.punchline_beat.is_finite() || meta.punchline_beat < 0.0 {
        return Err(ReelError::composition(format!(
            "punchline beat must be finite and >= 0, got {}",
            meta.punchline_beat
        )));
    }

    let mut builder = TimelineBuilder::new(voice, meta.punchline_beat);

    if let Some(tag) = meta.sfx_tag.as_deref()
        && let Some(sfx) = aux.resolve(tag)?
    {
        builder.place(TrackRole::Sfx, sfx, 1.0, 1.0);
    }

    if let Some(tag) = meta.laugh_tag()
        && let Some(laugh) = aux.resolve(&tag)?
    {
        builder.place(TrackRole::Laugh, laugh, LAUGH_VOLUME, LAUGH_ADVANCE_FRACTION);
    }

    let timeline = builder.finish();
    tracing::debug!(
        tracks = timeline.placements().len(),
        total = timeline.total_duration(),
        "timeline composed"
    );
    Ok(timeline)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/timeline.rs"]
mod tests;
