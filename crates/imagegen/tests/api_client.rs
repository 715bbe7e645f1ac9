//! Image provider client tests using wiremock.
//!
//! These tests verify that `ImageGenApi` sends an authenticated
//! chat-completions request and maps provider responses to images or
//! errors.

use std::sync::Arc;

use assert_matches::assert_matches;
use festoon_core::generation::ImageSize;
use festoon_imagegen::api::{ImageGenApi, ImageGenError};
use festoon_imagegen::config::ImageGenConfig;
use festoon_imagegen::provider::{ImageProvider, ImageRequest};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_token() -> String {
    "test-image-key".to_string()
}

fn client_for(server: &MockServer) -> ImageGenApi {
    ImageGenApi::new(ImageGenConfig::new(server.uri(), test_token())).unwrap()
}

fn request(prompt: &str) -> ImageRequest {
    ImageRequest {
        prompt: prompt.to_string(),
        size: ImageSize::Landscape,
        reference_images: Arc::from(vec!["data:image/png;base64,UkVG".to_string()]),
    }
}

fn image_response(url: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": "",
                "images": [{"type": "image_url", "image_url": {"url": url}}]
            }
        }]
    })
}

#[tokio::test]
async fn test_generate_image_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", format!("Bearer {}", test_token())))
        .and(body_partial_json(serde_json::json!({
            "modalities": ["image", "text"],
            "image_config": {"aspect_ratio": "3:2"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(image_response("data:image/png;base64,T0s=")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server);
    let image = api.generate_image(&request("a banner")).await.unwrap();
    assert_eq!(image, "data:image/png;base64,T0s=");
}

#[tokio::test]
async fn test_reference_images_are_sent_as_image_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "a cake"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,UkVG"}}
                ]
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(image_response("data:image/png;base64,T0s=")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server);
    assert!(api.generate_image(&request("a cake")).await.is_ok());
}

#[tokio::test]
async fn test_non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let err = api.generate_image(&request("x")).await.unwrap_err();
    assert_matches!(err, ImageGenError::ApiError { status: 429, ref body } if body == "rate limited");
}

#[tokio::test]
async fn test_error_body_with_ok_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": {"message": "content policy", "code": 400}
        })))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let err = api.generate_image(&request("x")).await.unwrap_err();
    assert_matches!(err, ImageGenError::ApiError { status: 400, .. });
}

#[tokio::test]
async fn test_text_only_reply_maps_to_no_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content": "Sorry, I can only describe it."}}]
        })))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let err = api.generate_image(&request("x")).await.unwrap_err();
    assert_matches!(err, ImageGenError::NoImage);
}

#[tokio::test]
async fn test_non_json_body_maps_to_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let err = api.generate_image(&request("x")).await.unwrap_err();
    assert_matches!(err, ImageGenError::MalformedResponse(_));
}

#[tokio::test]
async fn test_missing_api_key_fails_without_calling_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = ImageGenApi::new(ImageGenConfig::new(server.uri(), "")).unwrap();
    let err = api.generate_image(&request("x")).await.unwrap_err();
    assert_matches!(err, ImageGenError::MissingApiKey);
}
