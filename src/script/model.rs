use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::foundation::error::{ReelError, ReelResult};

/// Pause inserted after the voice line when the script does not specify one.
pub const DEFAULT_PUNCHLINE_BEAT_SECS: f64 = 0.2;

/// A loaded script. Scene order is output order.
#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    /// Free-form title; the output file name is derived from it.
    pub title: String,
    /// Scenes in script order. `scenes[i].index == i`.
    pub scenes: Vec<Scene>,
}

/// One unit of script mapped to one contiguous span of output video.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// 0-based position in the script.
    pub index: usize,
    /// Line handed to the voice synthesizer.
    pub speech_text: String,
    /// Prompt handed to the image generator.
    pub visual_prompt: String,
    /// On-screen caption.
    pub caption: String,
    /// Timing and styling controls.
    pub meta: ComedyMeta,
}

/// Per-scene controls for every timing and visual decision.
#[derive(Clone, Debug, PartialEq)]
pub struct ComedyMeta {
    /// Sound-effect library prefix, e.g. `"whoosh"`.
    pub sfx_tag: Option<String>,
    /// Laugh intensity; resolved as the library prefix `laugh_<intensity>`.
    pub laugh_intensity: Option<String>,
    /// Silent pause after the voice line, in seconds.
    pub punchline_beat: f64,
    /// Zoom behavior of the background.
    pub zoom_style: ZoomStyle,
    /// Word that promotes the caption to punchline styling.
    pub highlight_word: Option<String>,
}

impl Default for ComedyMeta {
    fn default() -> Self {
        Self {
            sfx_tag: None,
            laugh_intensity: None,
            punchline_beat: DEFAULT_PUNCHLINE_BEAT_SECS,
            zoom_style: ZoomStyle::None,
            highlight_word: None,
        }
    }
}

impl ComedyMeta {
    /// Library prefix for the laugh stinger, if a laugh is requested.
    pub fn laugh_tag(&self) -> Option<String> {
        self.laugh_intensity
            .as_deref()
            .map(|intensity| format!("laugh_{intensity}"))
    }
}

/// Background zoom behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoomStyle {
    /// Slow linear push-in over the whole scene.
    #[default]
    None,
    /// Abrupt punch-in the instant the voice line ends.
    Snap,
}

impl ZoomStyle {
    fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("snap") => Self::Snap,
            _ => Self::None,
        }
    }
}

#[derive(Deserialize)]
struct ScriptJson {
    #[serde(default)]
    title: Option<String>,
    scenes: Vec<SceneJson>,
}

#[derive(Deserialize)]
struct SceneJson {
    hindi_speech: String,
    visual_prompt: String,
    caption: String,
    #[serde(default)]
    comedy_meta: Option<ComedyMetaJson>,
}

#[derive(Deserialize, Default)]
struct ComedyMetaJson {
    #[serde(default)]
    sfx: Option<String>,
    #[serde(default)]
    laugh_intensity: Option<String>,
    #[serde(default)]
    punchline_beat: Option<f64>,
    #[serde(default)]
    zoom_style: Option<String>,
    #[serde(default)]
    highlight_word: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl From<ComedyMetaJson> for ComedyMeta {
    fn from(m: ComedyMetaJson) -> Self {
        Self {
            sfx_tag: non_empty(m.sfx),
            laugh_intensity: non_empty(m.laugh_intensity),
            punchline_beat: m.punchline_beat.unwrap_or(DEFAULT_PUNCHLINE_BEAT_SECS),
            zoom_style: ZoomStyle::from_tag(m.zoom_style.as_deref()),
            highlight_word: non_empty(m.highlight_word),
        }
    }
}

impl Script {
    /// Parse a script from its JSON text and validate it.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let raw: ScriptJson =
            serde_json::from_str(s).map_err(|e| ReelError::serde(format!("script json: {e}")))?;

        let scenes = raw
            .scenes
            .into_iter()
            .enumerate()
            .map(|(index, s)| Scene {
                index,
                speech_text: s.hindi_speech,
                visual_prompt: s.visual_prompt,
                caption: s.caption,
                meta: s.comedy_meta.unwrap_or_default().into(),
            })
            .collect();

        let script = Self {
            title: raw.title.unwrap_or_default(),
            scenes,
        };
        script.validate()?;
        Ok(script)
    }

    /// Read and parse a script file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check structural invariants the composition engine relies on.
    pub fn validate(&self) -> ReelResult<()> {
        if self.scenes.is_empty() {
            return Err(ReelError::validation("script must contain at least one scene"));
        }
        for scene in &self.scenes {
            let beat = scene.meta.punchline_beat;
            if !beat.is_finite() || beat < 0.0 {
                return Err(ReelError::validation(format!(
                    "scene {}: punchline_beat must be finite and >= 0, got {beat}",
                    scene.index
                )));
            }
        }
        Ok(())
    }

    /// Filesystem-safe slug of the title.
    ///
    /// Drops everything except word characters, whitespace and `-`, trims, then turns spaces into
    /// dashes. Falls back to `reel` when nothing survives.
    pub fn title_slug(&self) -> String {
        let kept: String = self
            .title
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
            .collect();
        let slug = kept.trim().replace(' ', "-");
        if slug.is_empty() {
            "reel".to_string()
        } else {
            slug
        }
    }

    /// Output file name `<slug>-<YYYYmmdd-HHMMSS>.mp4` for a given generation time.
    pub fn output_file_name(&self, generated_at: chrono::NaiveDateTime) -> String {
        format!(
            "{}-{}.mp4",
            self.title_slug(),
            generated_at.format("%Y%m%d-%H%M%S")
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
