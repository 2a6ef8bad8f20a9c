use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::voice::{VoiceDirectory, VoiceInfo};
use super::{SpeechSynthesizer, SynthesisRequest};
use crate::config::ProviderConfig;
use crate::error::SynthesisError;

const XI_API_KEY_HEADER: &str = "xi-api-key";
const APPLICATION_JSON: &str = "application/json";
const AUDIO_MPEG: &str = "audio/mpeg";

/// HTTP client for the ElevenLabs text-to-speech and voices endpoints.
#[derive(Clone)]
pub struct ElevenLabsClient {
    inner: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

#[derive(Serialize)]
struct TtsBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettingsBody,
}

#[derive(Serialize)]
struct VoiceSettingsBody {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Deserialize)]
struct VoicesBody {
    voices: Vec<VoiceInfo>,
}

impl ElevenLabsClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model_id: config.model_id.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, SynthesisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SynthesisError::Http {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        let body = TtsBody {
            text: &request.text,
            model_id: &self.model_id,
            voice_settings: VoiceSettingsBody {
                stability: request.stability,
                similarity_boost: request.similarity_boost,
            },
        };

        let response = self
            .inner
            .post(self.url(&format!("text-to-speech/{}", request.voice_id)))
            .header(XI_API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, AUDIO_MPEG)
            .json(&body)
            .send()
            .await?;

        let audio = check(response).await?.bytes().await?;
        tracing::debug!(voice_id = %request.voice_id, bytes = audio.len(), "speech synthesized");
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl VoiceDirectory for ElevenLabsClient {
    async fn voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError> {
        let response = self
            .inner
            .get(self.url("voices"))
            .header(XI_API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let body: VoicesBody = check(response).await?.json().await?;
        Ok(body.voices)
    }
}
