//! Handler for `POST /api/generate`.
//!
//! Validates the request, expands it into one prompt per decoration type,
//! and either waits for every image (`stream: false`) or forwards each
//! result as a server-sent event as soon as it completes (`stream: true`).

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use festoon_core::generation::GenerateRequest;
use festoon_core::stream::{GenerationEvent, DONE_SENTINEL};
use festoon_core::validation::validate_generate_request;
use futures::stream::{self, BoxStream, Stream};
use futures::StreamExt;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    AppJson(input): AppJson<GenerateRequest>,
) -> AppResult<Response> {
    let plan = validate_generate_request(&input)?;

    tracing::info!(
        theme = %plan.theme,
        images = plan.images.len(),
        size = %plan.size,
        reference_images = plan.reference_images.len(),
        stream = input.stream,
        "Starting generation",
    );

    if input.stream {
        let events = state.generator.generate_stream(&plan);
        return Ok(event_stream(events).into_response());
    }

    let response = state.generator.generate_all(&plan).await;
    if response.images.is_empty() {
        return Err(AppError::GenerationFailed {
            failures: response.errors,
        });
    }

    tracing::info!(
        generated = response.images.len(),
        failed = response.errors.len(),
        "Generation finished",
    );
    Ok(Json(response).into_response())
}

/// Wrap generation events as SSE frames, closing with a `[DONE]` frame.
fn event_stream(
    events: BoxStream<'static, GenerationEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let frames = events
        .filter_map(|event| async move {
            match Event::default().json_data(&event) {
                Ok(frame) => Some(Ok::<_, Infallible>(frame)),
                Err(e) => {
                    tracing::error!(index = event.index(), error = %e, "Failed to encode event");
                    None
                }
            }
        })
        .chain(stream::once(async {
            tracing::debug!("Generation stream complete");
            Ok(Event::default().data(DONE_SENTINEL))
        }));

    Sse::new(frames).keep_alive(KeepAlive::default())
}
