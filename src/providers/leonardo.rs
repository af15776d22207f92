use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::media::ImageAsset;
use crate::foundation::error::{ReelError, ReelResult};
use crate::providers::poll::{PollPolicy, PollStatus};
use crate::providers::{ImageGenerator, ImageId, download_to, ensure_success, http_client};

const API_BASE: &str = "https://cloud.leonardo.ai/api/rest/v1";

/// Leonardo generation settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeonardoOpts {
    /// Model identifier.
    pub model_id: String,
    /// Style preset identifier.
    pub style_uuid: String,
    /// Generated image width.
    pub width: u32,
    /// Generated image height.
    pub height: u32,
    /// Status polling schedule.
    pub poll: PollPolicy,
}

impl Default for LeonardoOpts {
    fn default() -> Self {
        Self {
            model_id: "7b592283-e8a7-4c5a-9ba6-d18c31f258b9".to_owned(),
            style_uuid: "debdf72a-91a4-467b-bf61-cc02bdeb69c6".to_owned(),
            width: 512,
            height: 768,
            poll: PollPolicy::default(),
        }
    }
}

/// Wrap a scene prompt with the fixed character and look description.
pub fn styled_prompt(prompt: &str) -> String {
    format!("Indian professional character, {prompt}, 3D Pixar style, cinematic office lighting")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationRequest<'a> {
    height: u32,
    width: u32,
    model_id: &'a str,
    prompt: String,
    #[serde(rename = "num_images")]
    num_images: u32,
    alchemy: bool,
    #[serde(rename = "styleUUID")]
    style_uuid: &'a str,
    public: bool,
    #[serde(
        rename = "init_generation_image_id",
        skip_serializing_if = "Option::is_none"
    )]
    init_generation_image_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationCreated {
    sd_generation_job: GenerationJob,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationJob {
    generation_id: String,
}

#[derive(Debug, Deserialize)]
struct GenerationStatus {
    generations_by_pk: Option<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    status: String,
    #[serde(default)]
    generated_images: Vec<GeneratedImage>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeneratedImage {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    user_details: Vec<UserDetails>,
}

#[derive(Debug, Deserialize)]
struct UserDetails {
    user: Option<UserInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    subscription_tokens_remaining: Option<i64>,
}

/// Image generation through the Leonardo.ai REST API.
pub struct LeonardoImages {
    client: reqwest::blocking::Client,
    api_key: String,
    opts: LeonardoOpts,
}

impl LeonardoImages {
    /// Create a client authenticated with `api_key`.
    pub fn new(api_key: impl Into<String>, opts: LeonardoOpts) -> ReelResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ReelError::validation("Leonardo API key is empty"));
        }
        Ok(Self {
            client: http_client()?,
            api_key,
            opts,
        })
    }

    /// Remaining subscription tokens on the account, if reported.
    pub fn remaining_tokens(&self) -> ReelResult<Option<i64>> {
        let resp = self
            .client
            .get(format!("{API_BASE}/me"))
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| ReelError::acquisition(format!("Leonardo quota request failed: {e}")))?;
        let me: MeResponse = ensure_success(resp, "Leonardo quota check")?
            .json()
            .map_err(|e| ReelError::acquisition(format!("Leonardo quota malformed: {e}")))?;
        Ok(tokens_remaining(&me))
    }

    fn request_body<'a>(
        &'a self,
        prompt: &str,
        continuity: Option<&'a ImageId>,
    ) -> GenerationRequest<'a> {
        GenerationRequest {
            height: self.opts.height,
            width: self.opts.width,
            model_id: &self.opts.model_id,
            prompt: styled_prompt(prompt),
            num_images: 1,
            alchemy: false,
            style_uuid: &self.opts.style_uuid,
            public: false,
            init_generation_image_id: continuity.map(|id| id.0.as_str()),
        }
    }

    fn check_generation(&self, generation_id: &str) -> ReelResult<PollStatus<GeneratedImage>> {
        let resp = self
            .client
            .get(format!("{API_BASE}/generations/{generation_id}"))
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| ReelError::acquisition(format!("Leonardo poll failed: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            tracing::warn!(%status, generation_id, "Leonardo status check failed; retrying");
            return Ok(PollStatus::Pending(status.to_string()));
        }
        let body: GenerationStatus = resp
            .json()
            .map_err(|e| ReelError::acquisition(format!("Leonardo status malformed: {e}")))?;
        generation_status(body)
    }
}

fn generation_status(body: GenerationStatus) -> ReelResult<PollStatus<GeneratedImage>> {
    let Some(generation) = body.generations_by_pk else {
        return Ok(PollStatus::Pending("unknown".to_owned()));
    };
    match generation.status.as_str() {
        "COMPLETE" => generation
            .generated_images
            .into_iter()
            .next()
            .map(PollStatus::Ready)
            .ok_or_else(|| ReelError::acquisition("Leonardo generation completed without images")),
        "FAILED" => Ok(PollStatus::Failed(generation.status)),
        _ => Ok(PollStatus::Pending(generation.status)),
    }
}

fn tokens_remaining(me: &MeResponse) -> Option<i64> {
    me.user_details
        .first()
        .and_then(|d| d.user.as_ref())
        .and_then(|u| u.subscription_tokens_remaining)
}

impl ImageGenerator for LeonardoImages {
    #[tracing::instrument(level = "debug", skip(self, prompt, continuity))]
    fn generate(
        &self,
        prompt: &str,
        continuity: Option<&ImageId>,
        out_path: &Path,
    ) -> ReelResult<(ImageAsset, ImageId)> {
        let resp = self
            .client
            .post(format!("{API_BASE}/generations"))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.request_body(prompt, continuity))
            .send()
            .map_err(|e| ReelError::acquisition(format!("Leonardo request failed: {e}")))?;
        let created: GenerationCreated = ensure_success(resp, "Leonardo generation")?
            .json()
            .map_err(|e| ReelError::acquisition(format!("Leonardo response malformed: {e}")))?;
        let generation_id = created.sd_generation_job.generation_id;
        tracing::debug!(%generation_id, "generation submitted");

        let what = format!("Leonardo generation for '{}'", out_path.display());
        let image = self
            .opts
            .poll
            .run(&what, |_| self.check_generation(&generation_id))?;

        download_to(&self.client, &image.url, out_path)?;
        let asset = ImageAsset::probe(out_path)?;
        Ok((asset, ImageId(image.id)))
    }
}
