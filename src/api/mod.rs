pub mod handlers;
pub mod routes;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::ssml::highlight::Theme;
use crate::ssml::markup::Attributes;
use crate::ssml::{Selection, TagOutcome, Utterance};
use crate::tts::VoiceInfo;

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UtterancesResponse {
    pub utterances: Vec<Utterance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub utterances: Vec<Utterance>,
    pub pause_seconds: Option<f64>,
}

/// An attribute as sent by the editor: free text, or a slider position.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Edit {
    ApplyTag {
        start: usize,
        end: usize,
        tag: String,
        #[serde(default)]
        attributes: BTreeMap<String, AttributeValue>,
    },
    RemoveTag {
        tag: String,
    },
    RemoveTags {
        tags: Vec<String>,
    },
    TogglePause,
    RenameSpeaker {
        speaker: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub utterance: Utterance,
    pub edit: Edit,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub utterance: Utterance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TagOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SpanRequest {
    pub utterance: Utterance,
    pub tag: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Serialize)]
pub struct SpanResponse {
    /// Attributes of the existing span, `None` when the selection has none.
    pub attributes: Option<Attributes>,
    /// Slider positions for labelled attributes, e.g. `rate: fast` -> 150.
    pub positions: BTreeMap<String, i32>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub utterance: Utterance,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub selection: Option<Selection>,
}

#[derive(Debug, Deserialize)]
pub struct HighlightRequest {
    pub text: String,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Serialize)]
pub struct HighlightResponse {
    pub html: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastRequest {
    pub transcript: String,
    /// Speaker name to voice id. Missing or empty: voices are handed out
    /// from the directory in order of first appearance.
    #[serde(default)]
    pub voice_ids: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakRequest {
    pub text: String,
    pub voice_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_are_tagged_by_action() {
        let request: EditRequest = serde_json::from_str(
            r#"{
                "utterance": {"speaker": "Alice", "text": "Hello there", "addPause": false},
                "edit": {"action": "applyTag", "start": 0, "end": 5, "tag": "prosody",
                         "attributes": {"rate": 140, "pitch": "high"}}
            }"#,
        )
        .unwrap();

        assert!(!request.utterance.add_pause);
        match request.edit {
            Edit::ApplyTag { tag, attributes, .. } => {
                assert_eq!(tag, "prosody");
                assert!(matches!(attributes["rate"], AttributeValue::Number(n) if n == 140.0));
                assert!(matches!(&attributes["pitch"], AttributeValue::Text(t) if t == "high"));
            }
            other => panic!("unexpected edit {:?}", other),
        }

        let toggle: Edit = serde_json::from_str(r#"{"action": "togglePause"}"#).unwrap();
        assert!(matches!(toggle, Edit::TogglePause));
    }

    #[test]
    fn podcast_voice_ids_are_optional() {
        let request: PodcastRequest =
            serde_json::from_str(r#"{"transcript": "A: hi</speak>"}"#).unwrap();
        assert!(request.voice_ids.is_empty());
    }
}
