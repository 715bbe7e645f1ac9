//! `festoon` -- generate party decorations from the command line.
//!
//! Streams a generation from a running Festoon server, prints each slot as
//! it arrives, writes the images to disk, and optionally saves the run to a
//! project.
//!
//! ```text
//! festoon <theme> <decoration type>[,<decoration type>...]
//! ```
//!
//! # Environment variables
//!
//! | Variable             | Required | Default                 | Description                          |
//! |----------------------|----------|-------------------------|--------------------------------------|
//! | `FESTOON_URL`        | no       | `http://localhost:3000` | Server base URL                      |
//! | `FESTOON_DETAILS`    | no       | --                      | Extra prompt details                 |
//! | `FESTOON_SIZE`       | no       | `1024x1024`             | Image size                           |
//! | `FESTOON_OUTPUT_DIR` | no       | `festoon-output`        | Where images are written             |
//! | `FESTOON_PROJECT_ID` | no       | --                      | Save the run to this project         |

use std::path::PathBuf;

use festoon_client::client::GenerateClient;
use festoon_client::output;
use festoon_core::generation::GenerateRequest;
use festoon_core::stream::{Slot, SlotUpdate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_URL: &str = "http://localhost:3000";
const DEFAULT_OUTPUT_DIR: &str = "festoon-output";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "festoon=info,festoon_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(theme), Some(types)) = (args.next(), args.next()) else {
        eprintln!("usage: festoon <theme> <decoration type>[,<decoration type>...]");
        std::process::exit(2);
    };

    let request = GenerateRequest {
        theme,
        details: std::env::var("FESTOON_DETAILS").ok(),
        decoration_types: types
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        size: std::env::var("FESTOON_SIZE").ok(),
        reference_images: Vec::new(),
        stream: true,
    };

    let base_url = std::env::var("FESTOON_URL").unwrap_or_else(|_| DEFAULT_URL.into());
    let output_dir = PathBuf::from(
        std::env::var("FESTOON_OUTPUT_DIR").unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.into()),
    );
    let project_id: Option<i64> = std::env::var("FESTOON_PROJECT_ID").ok().map(|v| {
        v.parse().unwrap_or_else(|_| {
            tracing::error!("FESTOON_PROJECT_ID must be a valid integer");
            std::process::exit(1);
        })
    });

    let client = GenerateClient::new(base_url);
    tracing::info!(
        url = %client.base_url(),
        theme = %request.theme,
        types = request.decoration_types.len(),
        "Starting generation",
    );

    let result = client
        .generate_streaming(&request, |update, assembler| match update {
            SlotUpdate::Ready(index) | SlotUpdate::Failed(index) => {
                match assembler.slot(index) {
                    Some(Slot::Ready(image)) => {
                        println!("[{index}] {} ready", image.decoration_type);
                    }
                    Some(Slot::Failed(failure)) => {
                        println!("[{index}] {} failed: {}", failure.decoration_type, failure.error);
                    }
                    None => {}
                }
            }
            SlotUpdate::Done => println!("done"),
        })
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Generation failed");
            std::process::exit(1);
        });

    if !result.missing.is_empty() {
        tracing::warn!(missing = ?result.missing, "Some images never arrived");
    }

    match output::write_images(&output_dir, &result.images) {
        Ok(paths) => {
            for path in paths {
                println!("wrote {}", path.display());
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to write images");
            std::process::exit(1);
        }
    }

    if let Some(project_id) = project_id {
        match client.save_iteration(project_id, &request, &result).await {
            Ok(saved) => println!("saved iteration {} to project {project_id}", saved.id),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save iteration");
                std::process::exit(1);
            }
        }
    }
}
