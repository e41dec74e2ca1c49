//! Remote client tests against local stub servers.
//!
//! Each test binds an axum router to 127.0.0.1:0 and points the real
//! Pl@ntNet / OpenAI clients at it over plain HTTP.

use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use axum::{
    extract::{Multipart, Query},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use plantwatch_core::{
    normalize, ClassificationOutcome, ClassificationResult, Identification,
    InvasivenessClassifier, NormalizedImage, OpenAiClassifier, OpenAiConfig, PlantNetConfig,
    PlantNetIdentifier, SpeciesIdentifier,
};
use serde_json::{json, Value};

const API_KEY: &str = "test-key";

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Address nothing listens on.
async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn png_image() -> NormalizedImage {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 128, 0])));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    normalize(out.into_inner()).unwrap()
}

fn plantnet(base_url: String, timeout: Duration) -> PlantNetIdentifier {
    PlantNetIdentifier::with_config(PlantNetConfig {
        api_url: base_url,
        timeout,
        require_https: false,
        ..PlantNetConfig::new(API_KEY)
    })
    .unwrap()
}

fn openai(base_url: String) -> OpenAiClassifier {
    OpenAiClassifier::with_config(OpenAiConfig {
        api_url: format!("{base_url}/v1/chat/completions"),
        require_https: false,
        ..OpenAiConfig::new(API_KEY)
    })
    .unwrap()
}

// ============================================================================
// Pl@ntNet
// ============================================================================

async fn plantnet_stub(
    Query(params): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    if params.get("api-key").map(String::as_str) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" })));
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        let is_upload = field.name() == Some("images")
            && field.file_name() == Some("capture.png")
            && field.content_type() == Some("image/png");
        if is_upload && !field.bytes().await.unwrap_or_default().is_empty() {
            return (
                StatusCode::OK,
                Json(json!({
                    "bestMatch": "Lonicera japonica Thunb.",
                    "results": [{ "score": 0.87 }]
                })),
            );
        }
    }

    (StatusCode::BAD_REQUEST, Json(json!({ "error": "missing images" })))
}

#[tokio::test]
async fn test_plantnet_returns_best_match() {
    let url = spawn(Router::new().route("/v2/identify/{project}", post(plantnet_stub))).await;
    let identifier = plantnet(url, Duration::from_secs(5));

    let result = identifier.identify(&png_image()).await;

    assert_eq!(
        result,
        Identification::Match("Lonicera japonica Thunb.".into())
    );
}

#[tokio::test]
async fn test_plantnet_non_200_is_no_match() {
    let url = spawn(Router::new().route("/v2/identify/{project}", post(plantnet_stub))).await;
    let identifier = PlantNetIdentifier::with_config(PlantNetConfig {
        api_url: url,
        require_https: false,
        ..PlantNetConfig::new("wrong-key")
    })
    .unwrap();

    let result = identifier.identify(&png_image()).await;

    assert!(!result.is_found());
    assert!(result.species_or_error().contains("401"));
}

#[tokio::test]
async fn test_plantnet_species_not_found() {
    let router = Router::new().route(
        "/v2/identify/{project}",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "statusCode": 404, "message": "Species not found" })),
            )
        }),
    );
    let identifier = plantnet(spawn(router).await, Duration::from_secs(5));

    assert_eq!(identifier.best_match(&png_image()).await, Ok(None));
    assert!(!identifier.identify(&png_image()).await.is_found());
}

#[tokio::test]
async fn test_plantnet_malformed_json_is_no_match() {
    let router = Router::new().route(
        "/v2/identify/{project}",
        post(|| async { (StatusCode::OK, "<html>maintenance</html>") }),
    );
    let identifier = plantnet(spawn(router).await, Duration::from_secs(5));

    let result = identifier.identify(&png_image()).await;

    assert!(!result.is_found());
    assert!(result.species_or_error().contains("malformed"));
}

#[tokio::test]
async fn test_plantnet_unreachable_is_no_match() {
    let identifier = plantnet(dead_address().await, Duration::from_secs(5));

    let result = identifier.identify(&png_image()).await;

    assert!(!result.is_found());
    assert!(result.species_or_error().contains("request failed"));
    assert!(!result.species_or_error().contains(API_KEY));
}

#[tokio::test]
async fn test_plantnet_unreachable_is_distinct_from_no_species() {
    let identifier = plantnet(dead_address().await, Duration::from_secs(5));

    let reason = identifier.best_match(&png_image()).await.unwrap_err();

    assert!(!reason.contains(API_KEY));
    assert!(!reason.contains("api-key"));
}

#[tokio::test]
async fn test_plantnet_timeout_is_no_match() {
    let router = Router::new().route(
        "/v2/identify/{project}",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "bestMatch": "Too late" }))
        }),
    );
    let identifier = plantnet(spawn(router).await, Duration::from_millis(200));

    let result = identifier.identify(&png_image()).await;

    assert!(!result.is_found());
    assert!(!result.species_or_error().contains(API_KEY));
}

// ============================================================================
// OpenAI
// ============================================================================

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn openai_stub(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-key");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
    }

    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    let well_formed = body["model"] == "gpt-4o-mini"
        && messages.len() == 2
        && messages[0]["role"] == "system"
        && messages[1]["role"] == "user";
    if !well_formed {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad request" })));
    }

    let prompt = messages[1]["content"].as_str().unwrap_or_default();
    let reply = if prompt.contains("Pueraria montana") {
        "True. It is invasive here.\n1. **Smothers** native trees.\n2. Spreads  by runners."
    } else {
        "False."
    };
    (StatusCode::OK, Json(completion(reply)))
}

#[tokio::test]
async fn test_openai_invasive_reply_is_parsed() {
    let url = spawn(Router::new().route("/v1/chat/completions", post(openai_stub))).await;
    let classifier = openai(url);

    let outcome = classifier
        .classify("Pueraria montana", "35.99", "-78.90")
        .await;

    assert_eq!(
        outcome,
        ClassificationOutcome::Classified(ClassificationResult::invasive(
            "It is invasive here. Smothers native trees. Spreads by runners."
        ))
    );
}

#[tokio::test]
async fn test_openai_native_reply_is_parsed() {
    let url = spawn(Router::new().route("/v1/chat/completions", post(openai_stub))).await;
    let classifier = openai(url);

    let outcome = classifier.classify("Quercus alba", "35.99", "-78.90").await;

    assert_eq!(
        outcome,
        ClassificationOutcome::Classified(ClassificationResult::not_invasive())
    );
}

#[tokio::test]
async fn test_openai_server_error_is_invalid() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    );
    let classifier = openai(spawn(router).await);

    let outcome = classifier.classify("Pueraria montana", "1", "2").await;

    assert!(matches!(outcome, ClassificationOutcome::Invalid(reason) if reason.contains("500")));
}

#[tokio::test]
async fn test_openai_missing_content_is_invalid() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let classifier = openai(spawn(router).await);

    let outcome = classifier.classify("Pueraria montana", "1", "2").await;

    assert!(matches!(outcome, ClassificationOutcome::Invalid(_)));
    assert!(classifier.complete("prompt").await.is_err());
}

#[tokio::test]
async fn test_openai_unreachable_is_invalid() {
    let classifier = openai(dead_address().await);

    let outcome = classifier.classify("Pueraria montana", "1", "2").await;

    assert!(matches!(outcome, ClassificationOutcome::Invalid(_)));
}
