use lazy_static::lazy_static;
use regex::Regex;

use super::serializer::strip_speak_close;
use super::{TranscriptSource, Utterance};

lazy_static! {
    static ref SPEAKER_LINE: Regex = Regex::new(r"^(.*?):\s*(.*)$").unwrap();
}

/// Previously exported SSML, read back line by line. Tolerates hand edits:
/// markup is never validated, a `<break` anywhere in a block marks a pause.
#[derive(Debug, Clone, Copy, Default)]
pub struct SsmlTranscript;

#[derive(Default)]
struct Pending {
    speaker: String,
    text: String,
    add_pause: bool,
}

impl Pending {
    fn finish(self, parsed: &mut Vec<Utterance>) {
        let text = strip_speak_close(&self.text);
        let text = text.trim().strip_prefix("<speak>").unwrap_or(text.trim()).trim();
        if self.speaker.is_empty() || text.is_empty() {
            return;
        }
        parsed.push(Utterance {
            speaker: self.speaker,
            text: text.to_string(),
            add_pause: self.add_pause,
        });
    }
}

impl TranscriptSource for SsmlTranscript {
    fn parse(&self, text: &str) -> Vec<Utterance> {
        let mut parsed = Vec::new();
        let mut current = Pending::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(cap) = SPEAKER_LINE.captures(line) {
                std::mem::take(&mut current).finish(&mut parsed);
                current.speaker = cap[1].trim().to_string();
                current.text = cap[2].trim().to_string();
            } else {
                current.text.push(' ');
                current.text.push_str(line);
            }

            if line.contains("<break") {
                current.add_pause = true;
            }
        }

        current.finish(&mut parsed);
        parsed
    }
}
