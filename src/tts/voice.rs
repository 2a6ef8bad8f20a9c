use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub voice_id: String,
}

/// Catalogue of voices offered by the speech provider, in provider order.
#[async_trait]
pub trait VoiceDirectory: Send + Sync {
    async fn voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError>;
}

/// Give the first distinct speakers the first voices of the directory.
/// Speakers left over once the voices run out get nothing.
pub fn assign_voices<'a>(
    speakers: impl IntoIterator<Item = &'a str>,
    voices: &[VoiceInfo],
) -> HashMap<String, String> {
    let mut assigned = HashMap::new();
    let mut next = voices.iter();

    for speaker in speakers {
        if assigned.contains_key(speaker) {
            continue;
        }
        match next.next() {
            Some(voice) => {
                tracing::debug!(speaker, voice = %voice.name, "voice assigned");
                assigned.insert(speaker.to_string(), voice.voice_id.clone());
            }
            None => tracing::warn!(speaker, "No voice available for speaker"),
        }
    }

    assigned
}
