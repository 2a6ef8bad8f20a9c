use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
    AttributeValue, Edit, EditRequest, EditResponse, ExportRequest, HealthResponse,
    HighlightRequest, HighlightResponse, PodcastRequest, SelectRequest, SelectResponse,
    SpanRequest, SpanResponse, SpeakRequest, TextRequest, UtterancesResponse, VoicesResponse,
};
use crate::api::routes::AppState;
use crate::error::{AppError, EditError};
use crate::ssml::annotator::{rename_speaker, select, toggle_pause};
use crate::ssml::highlight::{project, strip_decoration, ColorScheme};
use crate::ssml::markup::Attributes;
use crate::ssml::registry::{TagDefinition, TagRegistry};
use crate::ssml::{
    serialize, Annotator, PlainTranscript, Selection, SsmlTranscript, TranscriptSource,
};
use crate::tts::{assign_voices, split_blocks};

const MAX_SPEAK_CHARS: usize = 10000;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn list_tags(State(state): State<Arc<AppState>>) -> Json<Vec<TagDefinition>> {
    Json(state.registry.tags().to_vec())
}

pub async fn parse_transcript(Json(request): Json<TextRequest>) -> Json<UtterancesResponse> {
    let utterances = PlainTranscript.parse(&request.text);
    tracing::info!(utterances = utterances.len(), "transcript parsed");
    Json(UtterancesResponse { utterances })
}

pub async fn parse_ssml(Json(request): Json<TextRequest>) -> Json<UtterancesResponse> {
    let utterances = SsmlTranscript.parse(&request.text);
    tracing::info!(utterances = utterances.len(), "ssml imported");
    Json(UtterancesResponse { utterances })
}

pub async fn export_ssml(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let pause = request
        .pause_seconds
        .unwrap_or(state.config.default_pause_seconds);
    if !pause.is_finite() || pause < 0.0 {
        return Err(AppError::BadRequest(
            "Pause must be a non-negative number of seconds".into(),
        ));
    }

    let xml = serialize(&request.utterances, pause);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/xml"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transcript.xml\"",
            ),
        ],
        xml,
    )
        .into_response())
}

pub async fn edit_utterance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EditRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let mut utterance = request.utterance;
    let annotator = Annotator::new(state.registry);
    let mut outcome = None;
    let mut removed = None;

    match request.edit {
        Edit::ApplyTag {
            start,
            end,
            tag,
            attributes,
        } => {
            let attributes = resolve_attributes(state.registry, &tag, attributes);
            outcome = Some(annotator.apply_tag(
                &mut utterance,
                Selection::new(start, end),
                &tag,
                &attributes,
            )?);
        }
        Edit::RemoveTag { tag } => {
            removed = Some(annotator.remove_tag(&mut utterance, &tag)?);
        }
        Edit::RemoveTags { tags } => {
            let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
            removed = Some(annotator.remove_tags(&mut utterance, &tags));
        }
        Edit::TogglePause => toggle_pause(&mut utterance),
        Edit::RenameSpeaker { speaker } => rename_speaker(&mut utterance, &speaker)?,
    }

    Ok(Json(EditResponse {
        utterance,
        outcome,
        removed,
    }))
}

/// Slider positions become attribute text through the tag's definition;
/// unknown tags and attributes are left for the annotator to reject.
fn resolve_attributes(
    registry: &TagRegistry,
    tag: &str,
    attributes: BTreeMap<String, AttributeValue>,
) -> Attributes {
    let definition = registry.lookup(tag);
    attributes
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                AttributeValue::Text(text) => text,
                AttributeValue::Number(number) => definition
                    .and_then(|d| d.attribute(&name))
                    .map_or_else(|| number.to_string(), |spec| spec.resolve_numeric(number)),
            };
            (name, value)
        })
        .collect()
}

/// Existing-span detection: what the editor shows when a selection already
/// carries `tag`.
pub async fn find_span(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpanRequest>,
) -> Result<Json<SpanResponse>, AppError> {
    let definition = state
        .registry
        .lookup(&request.tag)
        .ok_or_else(|| EditError::UnknownTag(request.tag.clone()))?;

    let attributes = Annotator::new(state.registry).find_span(
        &request.utterance,
        &request.tag,
        Selection::new(request.start, request.end),
    );

    let positions: BTreeMap<String, i32> = attributes
        .as_ref()
        .map(|found| {
            definition
                .attributes
                .iter()
                .filter_map(|spec| {
                    let position = spec.label_value(found.get(spec.name)?)?;
                    Some((spec.name.to_string(), position))
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(SpanResponse {
        attributes,
        positions,
    }))
}

pub async fn select_text(Json(request): Json<SelectRequest>) -> Json<SelectResponse> {
    Json(SelectResponse {
        selection: select(&request.utterance, &request.text),
    })
}

pub async fn highlight(Json(request): Json<HighlightRequest>) -> Json<HighlightResponse> {
    let scheme = ColorScheme::for_theme(request.theme);
    Json(HighlightResponse {
        html: project(&strip_decoration(&request.text), scheme),
    })
}

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VoicesResponse>, AppError> {
    let voices = state.voices.voices().await?;
    Ok(Json(VoicesResponse { voices }))
}

pub async fn generate_podcast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PodcastRequest>,
) -> Result<Response, AppError> {
    if request.transcript.trim().is_empty() {
        return Err(AppError::BadRequest("Transcript cannot be empty".into()));
    }

    let voice_ids = if request.voice_ids.is_empty() {
        let blocks = split_blocks(&request.transcript)?;
        let voices = state.voices.voices().await?;
        assign_voices(blocks.iter().map(|b| b.speaker.as_str()), &voices)
    } else {
        request.voice_ids
    };

    let audio = state
        .podcast
        .generate(&request.transcript, &voice_ids)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"podcast.mp3\"",
            ),
        ],
        audio,
    )
        .into_response())
}

pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpeakRequest>,
) -> Result<Response, AppError> {
    // Validate input
    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest("Text cannot be empty".into()));
    }

    if request.text.chars().count() > MAX_SPEAK_CHARS {
        return Err(AppError::BadRequest(format!(
            "Text too long (max {} chars)",
            MAX_SPEAK_CHARS
        )));
    }

    let voice_id = request
        .voice_id
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| state.config.default_voice_id.clone());

    let audio = state.podcast.speak(&request.text, &voice_id).await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}
