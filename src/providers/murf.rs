use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::media::AudioAsset;
use crate::foundation::error::{ReelError, ReelResult};
use crate::providers::{VoiceSynthesizer, download_to, ensure_success, http_client};

const GENERATE_URL: &str = "https://api.murf.ai/v1/speech/generate";

/// Murf voice settings.
#[derive(Clone, Debug, PartialEq)]
pub struct MurfOpts {
    /// Voice identifier.
    pub voice_id: String,
    /// Speaking speed multiplier.
    pub speed: f32,
}

impl Default for MurfOpts {
    fn default() -> Self {
        Self {
            voice_id: "hi-IN-amit".to_owned(),
            speed: 1.12,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    voice_id: &'a str,
    text: &'a str,
    format: &'static str,
    speed: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    audio_file: String,
}

/// Voice synthesis through the Murf speech API.
pub struct MurfVoice {
    client: reqwest::blocking::Client,
    api_key: String,
    opts: MurfOpts,
}

impl MurfVoice {
    /// Create a client authenticated with `api_key`.
    pub fn new(api_key: impl Into<String>, opts: MurfOpts) -> ReelResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ReelError::validation("Murf API key is empty"));
        }
        Ok(Self {
            client: http_client()?,
            api_key,
            opts,
        })
    }

    fn request_body<'a>(&'a self, text: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            voice_id: &self.opts.voice_id,
            text,
            format: "mp3",
            speed: self.opts.speed,
        }
    }
}

impl VoiceSynthesizer for MurfVoice {
    #[tracing::instrument(level = "debug", skip(self, text))]
    fn synthesize(&self, text: &str, out_path: &Path) -> ReelResult<AudioAsset> {
        let resp = self
            .client
            .post(GENERATE_URL)
            .header("api-key", &self.api_key)
            .json(&self.request_body(text))
            .send()
            .map_err(|e| ReelError::acquisition(format!("Murf request failed: {e}")))?;
        let body: GenerateResponse = ensure_success(resp, "Murf speech generation")?
            .json()
            .map_err(|e| ReelError::acquisition(format!("Murf response malformed: {e}")))?;

        download_to(&self.client, &body.audio_file, out_path)?;
        AudioAsset::probe(out_path)
    }
}
