use lazy_static::lazy_static;
use regex::Regex;

use super::Utterance;

pub const SPEAK_CLOSE: &str = "</speak>";

lazy_static! {
    static ref TRAILING_BREAK: Regex = Regex::new(r"<break[^>]*>\s*$").unwrap();
}

/// Render utterances as `Speaker: text</speak>` blocks separated by blank
/// lines. Every utterance but the last gets a `<break>` of `pause_seconds`
/// when it asks for a pause and does not already end in one.
pub fn serialize(utterances: &[Utterance], pause_seconds: f64) -> String {
    let mut ssml = String::new();
    let last = utterances.len().saturating_sub(1);

    for (index, utterance) in utterances.iter().enumerate() {
        let mut text = strip_speak_close(&utterance.text).to_string();

        if utterance.add_pause && index < last && !ends_with_break(&text) {
            text.push_str(&break_marker(pause_seconds));
        }
        text.push_str(SPEAK_CLOSE);

        ssml.push_str(&format!("{}: {}\n\n", utterance.speaker, text));
    }

    ssml.trim().to_string()
}

pub fn break_marker(seconds: f64) -> String {
    format!("<break time=\"{}s\"/>", seconds)
}

pub fn ends_with_break(text: &str) -> bool {
    TRAILING_BREAK.is_match(text)
}

/// Drop a trailing `</speak>` left over from an earlier export.
pub fn strip_speak_close(text: &str) -> &str {
    let trimmed = text.trim_end();
    trimmed.strip_suffix(SPEAK_CLOSE).unwrap_or(text)
}
