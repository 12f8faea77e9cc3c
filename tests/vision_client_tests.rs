//! Mock HTTP tests for VisionClient.
//!
//! These tests cover:
//! - Request formatting (auth header, endpoint path, payload shape)
//! - Response extraction
//! - The never-fails-outward contract of `describe_image`

use webcam_describe::vision::{VisionClient, DEFAULT_MODEL};

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}

#[tokio::test]
async fn test_describe_image_sends_bearer_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("a desk")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert_eq!(result, "a desk");
}

#[tokio::test]
async fn test_describe_image_sends_model_and_token_cap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": DEFAULT_MODEL,
            "max_tokens": 300
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert_eq!(result, "ok");
}

#[tokio::test]
async fn test_describe_image_sends_prompt_and_data_uri() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "What is in this image?"},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
                    ]
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert_eq!(result, "ok");
}

#[tokio::test]
async fn test_describe_image_uses_first_choice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert_eq!(result, "first");
}

#[tokio::test]
async fn test_describe_image_api_error_becomes_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("internal server error"),
        )
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert!(result.starts_with("Error analyzing image: "));
    assert!(result.contains("500"));
    assert!(result.contains("internal server error"));
}

#[tokio::test]
async fn test_describe_image_auth_failure_becomes_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("invalid api key"),
        )
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("wrong-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert!(result.starts_with("Error analyzing image: "));
    assert!(result.contains("401"));
}

#[tokio::test]
async fn test_describe_image_malformed_body_becomes_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert!(result.starts_with("Error analyzing image: "));
}

#[tokio::test]
async fn test_describe_image_empty_choices_becomes_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert!(result.starts_with("Error analyzing image: "));
    assert!(result.contains("Malformed response"));
}

#[tokio::test]
async fn test_describe_image_null_content_becomes_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        })))
        .mount(&mock_server)
        .await;

    let client =
        VisionClient::with_base_url("test-api-key".to_string(), mock_server.uri()).unwrap();
    let result = client.describe_image("QUJD").await;

    assert!(result.starts_with("Error analyzing image: "));
}

#[tokio::test]
async fn test_describe_image_unreachable_server_becomes_string() {
    // Nothing listens on this port; the connection error is absorbed.
    let client = VisionClient::with_base_url(
        "test-api-key".to_string(),
        "http://127.0.0.1:9".to_string(),
    )
    .unwrap();

    let result = client.describe_image("QUJD").await;

    assert!(result.starts_with("Error analyzing image: "));
}
