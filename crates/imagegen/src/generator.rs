//! Parallel fan-out of a generation plan.
//!
//! Each [`PlannedImage`] becomes one provider request. All requests run
//! concurrently; a failure only affects its own slot.

use std::sync::Arc;

use festoon_core::generation::{
    GenerateResponse, GeneratedImage, GenerationPlan, ImageFailure, PlannedImage,
};
use festoon_core::stream::GenerationEvent;
use futures::stream::{BoxStream, FuturesUnordered};
use futures::StreamExt;

use crate::provider::{ImageProvider, ImageRequest};

/// Runs generation plans against an [`ImageProvider`].
#[derive(Clone)]
pub struct Generator {
    provider: Arc<dyn ImageProvider>,
}

impl Generator {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    /// Run every slot and wait for all of them.
    ///
    /// Images and failures are each returned in slot order.
    pub async fn generate_all(&self, plan: &GenerationPlan) -> GenerateResponse {
        let events = futures::future::join_all(self.slot_futures(plan)).await;

        let mut response = GenerateResponse::default();
        for event in events {
            match event {
                GenerationEvent::Image(image) => response.images.push(image),
                GenerationEvent::Failure(failure) => response.errors.push(failure),
            }
        }
        response.sorted()
    }

    /// Run every slot, yielding each result as soon as it completes.
    ///
    /// Events arrive in completion order; consumers key them by `index`.
    pub fn generate_stream(&self, plan: &GenerationPlan) -> BoxStream<'static, GenerationEvent> {
        self.slot_futures(plan)
            .into_iter()
            .collect::<FuturesUnordered<_>>()
            .boxed()
    }

    fn slot_futures(
        &self,
        plan: &GenerationPlan,
    ) -> Vec<impl std::future::Future<Output = GenerationEvent> + Send + 'static> {
        let reference_images: Arc<[String]> = plan.reference_images.clone().into();

        plan.images
            .iter()
            .cloned()
            .map(|slot| {
                let provider = Arc::clone(&self.provider);
                let request = ImageRequest {
                    prompt: slot.prompt.clone(),
                    size: plan.size,
                    reference_images: Arc::clone(&reference_images),
                };
                run_slot(provider, slot, request)
            })
            .collect()
    }
}

async fn run_slot(
    provider: Arc<dyn ImageProvider>,
    slot: PlannedImage,
    request: ImageRequest,
) -> GenerationEvent {
    match provider.generate_image(&request).await {
        Ok(image) => {
            tracing::info!(
                index = slot.index,
                decoration_type = %slot.decoration_type,
                "Image generated",
            );
            GenerationEvent::Image(GeneratedImage {
                image,
                decoration_type: slot.decoration_type,
                index: slot.index,
                prompt: slot.prompt,
            })
        }
        Err(e) => {
            tracing::warn!(
                index = slot.index,
                decoration_type = %slot.decoration_type,
                error = %e,
                "Image generation failed",
            );
            GenerationEvent::Failure(ImageFailure {
                error: e.user_message(),
                decoration_type: slot.decoration_type,
                index: slot.index,
            })
        }
    }
}
