pub mod blocks;
pub mod elevenlabs;
pub mod voice;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::VoiceSettings;
use crate::error::SynthesisError;

pub use blocks::{silence, split_blocks};
pub use elevenlabs::ElevenLabsClient;
pub use voice::{assign_voices, VoiceDirectory, VoiceInfo};

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
}

/// A speech provider: one text in, one encoded audio clip out.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError>;
}

pub struct PodcastService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    settings: VoiceSettings,
}

impl PodcastService {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, settings: VoiceSettings) -> Self {
        Self {
            synthesizer,
            settings,
        }
    }

    pub async fn speak(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, SynthesisError> {
        self.synthesizer.synthesize(&self.request(text, voice_id)).await
    }

    /// Synthesize a serialized transcript block by block and join the clips,
    /// with silence spliced in wherever a block ended in a break. Any failing
    /// block fails the whole podcast.
    pub async fn generate(
        &self,
        transcript: &str,
        voice_ids: &HashMap<String, String>,
    ) -> Result<Vec<u8>, SynthesisError> {
        let blocks = split_blocks(transcript)?;

        // Check every voice before spending any provider calls.
        let voices = blocks
            .iter()
            .map(|block| {
                voice_ids
                    .get(&block.speaker)
                    .ok_or_else(|| SynthesisError::MissingVoice(block.speaker.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut audio = Vec::new();
        for (block, voice_id) in blocks.iter().zip(voices) {
            let clip = self.speak(&block.text, voice_id).await.map_err(|e| {
                tracing::error!(speaker = %block.speaker, "Segment synthesis failed: {}", e);
                e
            })?;
            tracing::debug!(
                speaker = %block.speaker,
                bytes = clip.len(),
                pause = block.pause_seconds,
                "segment synthesized"
            );

            audio.extend_from_slice(&clip);
            if block.pause_seconds > 0.0 {
                audio.extend(silence(block.pause_seconds));
            }
        }

        tracing::info!(segments = blocks.len(), bytes = audio.len(), "podcast generated");
        Ok(audio)
    }

    fn request(&self, text: &str, voice_id: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice_id: voice_id.to_string(),
            stability: self.settings.stability,
            similarity_boost: self.settings.similarity_boost,
        }
    }
}
