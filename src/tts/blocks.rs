use lazy_static::lazy_static;
use regex::Regex;

use crate::error::SynthesisError;
use crate::ssml::serializer::strip_speak_close;

/// Fixed rate used for the silence spliced between speakers.
pub const SILENCE_SAMPLE_RATE: f64 = 44_100.0;

lazy_static! {
    static ref BLOCK_SEPARATOR: Regex = Regex::new(r"\r?\n[ \t]*\r?\n").unwrap();
    static ref TRAILING_BREAK: Regex =
        Regex::new(r#"<break\s+time="(\d+(?:\.\d+)?)(ms|s)"\s*/>\s*$"#).unwrap();
}

/// One speaker's turn of a serialized transcript, ready to synthesize.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerBlock {
    pub speaker: String,
    pub text: String,
    /// Silence to add after this block's audio.
    pub pause_seconds: f64,
}

/// Split a serialized transcript on blank lines. A trailing `<break time>`
/// is taken off the text and becomes the block's pause.
pub fn split_blocks(transcript: &str) -> Result<Vec<SpeakerBlock>, SynthesisError> {
    BLOCK_SEPARATOR
        .split(transcript)
        .filter(|block| !block.trim().is_empty())
        .map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Result<SpeakerBlock, SynthesisError> {
    let (speaker, text) = block
        .split_once(':')
        .ok_or_else(|| SynthesisError::InvalidSegment(block.trim().to_string()))?;
    let speaker = speaker.trim().to_string();
    let mut text = strip_speak_close(text.trim()).trim().to_string();

    let mut pause_seconds = 0.0;
    if let Some(cap) = TRAILING_BREAK.captures(&text) {
        let amount: f64 = cap[1].parse().unwrap_or(0.0);
        pause_seconds = if &cap[2] == "ms" { amount / 1000.0 } else { amount };
        let start = cap.get(0).map_or(text.len(), |m| m.start());
        text.truncate(start);
        text.truncate(text.trim_end().len());
    }

    if text.is_empty() {
        return Err(SynthesisError::EmptySegment(speaker));
    }

    Ok(SpeakerBlock {
        speaker,
        text,
        pause_seconds,
    })
}

/// Zeroed 16-bit mono samples lasting `seconds` at [`SILENCE_SAMPLE_RATE`].
pub fn silence(seconds: f64) -> Vec<u8> {
    let samples = (seconds * SILENCE_SAMPLE_RATE).round().max(0.0) as usize;
    vec![0; samples * 2]
}
