//! HTTP client for the generation and iteration endpoints.

use festoon_core::generation::GenerateRequest;
use festoon_core::stream::{AssembleError, AssembledResult, SlotUpdate, StreamAssembler};
use festoon_core::types::DbId;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

/// Errors from talking to a Festoon server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Failure to connect or to receive the response head.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The stream finished without a single image.
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// An iteration as returned by the server after saving.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedIteration {
    pub id: DbId,
    pub project_id: DbId,
    pub images: Vec<SavedImage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedImage {
    pub id: DbId,
    pub decoration_type: String,
    pub position: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveIteration<'a> {
    theme: &'a str,
    details: Option<&'a str>,
    decoration_types: &'a [String],
    size: Option<&'a str>,
    images: Vec<SaveImage<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveImage<'a> {
    decoration_type: &'static str,
    image_url: &'a str,
    prompt: &'a str,
    position: usize,
}

/// Error body shape used by the server.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client bound to one server base URL.
#[derive(Debug, Clone)]
pub struct GenerateClient {
    client: reqwest::Client,
    base_url: String,
}

impl GenerateClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a streaming generation.
    ///
    /// Each chunk read from the response is fed to a [`StreamAssembler`];
    /// `on_update` sees every slot change together with the assembler so it
    /// can inspect the slot that changed. Reading stops at `[DONE]`, when
    /// the server closes the connection, or when reading the body fails.
    /// Partial results are returned as long as at least one image arrived.
    pub async fn generate_streaming<F>(
        &self,
        request: &GenerateRequest,
        mut on_update: F,
    ) -> Result<AssembledResult, ClientError>
    where
        F: FnMut(SlotUpdate, &StreamAssembler),
    {
        let body = GenerateRequest {
            stream: true,
            ..request.clone()
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let mut assembler = StreamAssembler::expecting(request.decoration_types.len());
        let mut chunks = response.bytes_stream();

        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        ready = assembler.ready_count(),
                        "Generation stream read failed",
                    );
                    break;
                }
            };
            for update in assembler.push(&chunk) {
                on_update(update, &assembler);
            }
            if assembler.is_done() {
                break;
            }
        }

        if !assembler.is_done() {
            tracing::warn!(
                ready = assembler.ready_count(),
                "Generation stream closed before [DONE]",
            );
        }

        Ok(assembler.finish()?)
    }

    /// Save an assembled run as a new iteration of `project_id`.
    ///
    /// Images keep their slot index as their position.
    pub async fn save_iteration(
        &self,
        project_id: DbId,
        request: &GenerateRequest,
        result: &AssembledResult,
    ) -> Result<SavedIteration, ClientError> {
        let body = SaveIteration {
            theme: &request.theme,
            details: request.details.as_deref(),
            decoration_types: &request.decoration_types,
            size: request.size.as_deref(),
            images: result
                .images
                .iter()
                .map(|image| SaveImage {
                    decoration_type: image.decoration_type.label(),
                    image_url: &image.image,
                    prompt: &image.prompt,
                    position: image.index,
                })
                .collect(),
        };

        let response = self
            .client
            .post(format!(
                "{}/api/projects/{project_id}/iterations",
                self.base_url
            ))
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let saved: SavedIteration = response.json().await?;
        tracing::info!(
            project_id,
            iteration_id = saved.id,
            images = saved.images.len(),
            "Iteration saved",
        );
        Ok(saved)
    }

    /// Whether the server's health endpoint answers 200.
    pub async fn health_check(&self) -> Result<bool, ClientError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}

/// Pass 2xx responses through; turn anything else into [`ClientError::Server`]
/// using the server's `error` message when the body carries one.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}
