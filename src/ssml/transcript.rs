use super::{TranscriptSource, Utterance};

/// Plain `Speaker: text` transcripts, blocks separated by blank lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTranscript;

impl TranscriptSource for PlainTranscript {
    fn parse(&self, text: &str) -> Vec<Utterance> {
        let mut parsed = Vec::new();
        let mut speaker = String::new();
        let mut body = String::new();

        for line in text.lines() {
            let line = line.trim();

            if line.is_empty() {
                if flush(&mut parsed, &speaker, &body) {
                    speaker.clear();
                    body.clear();
                }
                continue;
            }

            if let Some((name, rest)) = line.split_once(':') {
                flush(&mut parsed, &speaker, &body);
                speaker = name.trim().to_string();
                body = rest.trim().to_string();
            } else if !speaker.is_empty() {
                body.push(' ');
                body.push_str(line);
            } else {
                tracing::debug!(line, "dropping line with no speaker");
            }
        }

        flush(&mut parsed, &speaker, &body);
        parsed
    }
}

/// Push the open utterance if it has both a speaker and some text.
fn flush(parsed: &mut Vec<Utterance>, speaker: &str, body: &str) -> bool {
    let body = body.trim();
    if speaker.is_empty() || body.is_empty() {
        return false;
    }
    parsed.push(Utterance::new(speaker, body));
    true
}
