//! External media providers (voice synthesis, image generation) and the acquisition loop that
//! turns a script into on-disk scene media.

/// Leonardo.ai image generation.
pub mod leonardo;
/// Murf voice synthesis.
pub mod murf;
/// Bounded status polling.
pub mod poll;

use std::path::Path;
use std::time::Duration;

use crate::assets::media::{AudioAsset, ImageAsset};
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::model::Script;
use crate::sequence::SceneMedia;
use crate::workspace::Workspace;

pub use leonardo::LeonardoImages;
pub use murf::MurfVoice;
pub use poll::{PollPolicy, PollStatus};

/// Provider-assigned identifier of a generated image.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(
    /// Raw identifier.
    pub String,
);

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns a line of text into a spoken audio file.
pub trait VoiceSynthesizer: Send + Sync {
    /// Synthesize `text` into `out_path`.
    fn synthesize(&self, text: &str, out_path: &Path) -> ReelResult<AudioAsset>;
}

/// Turns a prompt into an image file.
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for `prompt` into `out_path`.
    ///
    /// `continuity` references an earlier image the provider should stay visually consistent
    /// with.
    fn generate(
        &self,
        prompt: &str,
        continuity: Option<&ImageId>,
        out_path: &Path,
    ) -> ReelResult<(ImageAsset, ImageId)>;
}

/// Acquire voice and image for every scene, in script order.
///
/// The first scene's image id becomes the continuity reference of every later scene; the first
/// scene itself is generated without one. Any provider failure halts acquisition and is
/// attributed to its scene.
#[tracing::instrument(level = "info", skip_all, fields(scenes = script.scenes.len()))]
pub fn acquire_media(
    script: &Script,
    workspace: &Workspace,
    voice: &dyn VoiceSynthesizer,
    images: &dyn ImageGenerator,
) -> ReelResult<Vec<SceneMedia>> {
    let mut continuity: Option<ImageId> = None;
    let mut media = Vec::with_capacity(script.scenes.len());

    for scene in &script.scenes {
        let i = scene.index;
        tracing::info!(scene = i, "generating voice-over");
        let voice_asset = voice
            .synthesize(&scene.speech_text, &workspace.voice_path(i))
            .map_err(|e| e.in_scene(i))?;

        let image_path = workspace.image_path(i);
        tracing::info!(scene = i, file = %image_path.display(), "generating image");
        let reference = if i == 0 { None } else { continuity.as_ref() };
        let (image, id) = images
            .generate(&scene.visual_prompt, reference, &image_path)
            .map_err(|e| e.in_scene(i))?;
        if i == 0 {
            continuity = Some(id);
        }

        tracing::info!(
            scene = i,
            voice_secs = voice_asset.duration_secs,
            sfx = scene.meta.sfx_tag.as_deref().unwrap_or("none"),
            laugh = scene.meta.laugh_intensity.as_deref().unwrap_or("none"),
            "scene media ready"
        );
        media.push(SceneMedia {
            voice: voice_asset,
            image_path: image.path,
        });
    }
    Ok(media)
}

/// Build a blocking HTTP client with request timeouts.
pub(crate) fn http_client() -> ReelResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| ReelError::acquisition(format!("failed to build http client: {e}")))
}

/// Fetch `url` and write the body to `out_path`.
pub(crate) fn download_to(
    client: &reqwest::blocking::Client,
    url: &str,
    out_path: &Path,
) -> ReelResult<()> {
    let resp = client
        .get(url)
        .send()
        .map_err(|e| ReelError::acquisition(format!("download '{url}': {e}")))?;
    let resp = ensure_success(resp, "download")?;
    let bytes = resp
        .bytes()
        .map_err(|e| ReelError::acquisition(format!("download body '{url}': {e}")))?;
    crate::encode::ffmpeg::ensure_parent_dir(out_path)?;
    std::fs::write(out_path, &bytes).map_err(|e| {
        ReelError::acquisition(format!("write '{}': {e}", out_path.display()))
    })
}

/// Turn a non-success response into an acquisition error carrying the body text.
pub(crate) fn ensure_success(
    resp: reqwest::blocking::Response,
    what: &str,
) -> ReelResult<reqwest::blocking::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    Err(ReelError::acquisition(format!(
        "{what} returned {status}: {}",
        text.trim()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/providers/mod.rs"]
mod tests;
