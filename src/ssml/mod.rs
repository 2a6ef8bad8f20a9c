pub mod annotator;
pub mod highlight;
pub mod markup;
pub mod registry;
pub mod reparse;
pub mod serializer;
pub mod transcript;

use serde::{Deserialize, Serialize};

pub use annotator::{Annotator, Selection, TagOutcome};
pub use registry::TagRegistry;
pub use reparse::SsmlTranscript;
pub use serializer::serialize;
pub use transcript::PlainTranscript;

/// One speaker turn. `text` may carry embedded SSML markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
    #[serde(default = "default_add_pause")]
    pub add_pause: bool,
}

fn default_add_pause() -> bool {
    true
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            add_pause: true,
        }
    }

    /// Text with all markup removed.
    pub fn visible_text(&self) -> String {
        markup::plain_text(&markup::parse_markup(&self.text))
    }
}

/// A way of turning uploaded text into utterances. The caller picks the
/// implementation that matches the upload.
pub trait TranscriptSource {
    fn parse(&self, text: &str) -> Vec<Utterance>;
}
