use maildraft::models::EmailRequest;
use maildraft::services::gemini::{ApiVersion, GeminiClient, GeminiConfig, RetryPolicy};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FLASH_URL: &str = "/v1/models/gemini-1.5-flash-001:generateContent";
const PRO_URL: &str = "/v1/models/gemini-pro:generateContent";

fn generation_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

fn draft_json(subject: &str, body: &str) -> String {
    json!({ "subject": subject, "body": body }).to_string()
}

/// v1 lists flash-001 and gemini-pro, v1beta lists nothing.
async fn mount_default_registries(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent"] },
                { "name": "models/gemini-1.5-flash-001", "supportedGenerationMethods": ["generateContent"] }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .mount(server)
        .await;
}

fn fast_client(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new("test-key")
        .with_base_url(server.uri())
        .with_retry(RetryPolicy::default().with_base_delay(Duration::from_millis(20)));
    GeminiClient::new(config).unwrap()
}

fn request() -> EmailRequest {
    EmailRequest::new(["見積", "納期"]).with_recipient("山田")
}

#[tokio::test]
async fn test_first_candidate_success() {
    let server = MockServer::start().await;
    mount_default_registries(&server).await;

    Mock::given(method("POST"))
        .and(path(FLASH_URL))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generation_response(&draft_json("見積の件", "山田様 ..."))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = fast_client(&server).generate(&request()).await.unwrap();

    assert_eq!(draft.subject, "見積の件");
    assert_eq!(draft.body, "山田様 ...");
}

#[tokio::test]
async fn test_transient_errors_are_retried_with_backoff() {
    let server = MockServer::start().await;
    mount_default_registries(&server).await;

    Mock::given(method("POST"))
        .and(path(FLASH_URL))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(FLASH_URL))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(generation_response(&draft_json("S", "B"))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PRO_URL))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let started = Instant::now();
    let draft = fast_client(&server).generate(&request()).await.unwrap();

    assert_eq!(draft.subject, "S");
    // 20ms then 40ms between the three attempts
    assert!(started.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_rate_limit_exhaustion_moves_to_next_candidate() {
    let server = MockServer::start().await;
    mount_default_registries(&server).await;

    Mock::given(method("POST"))
        .and(path(FLASH_URL))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PRO_URL))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(generation_response(&draft_json("S", "B"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = fast_client(&server).generate(&request()).await.unwrap();
    assert_eq!(draft.body, "B");
}

#[tokio::test]
async fn test_permanent_error_is_not_retried() {
    let server = MockServer::start().await;
    mount_default_registries(&server).await;

    Mock::given(method("POST"))
        .and(path(FLASH_URL))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PRO_URL))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(generation_response(&draft_json("S", "B"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = fast_client(&server).generate(&request()).await.unwrap();
    assert_eq!(draft.subject, "S");
}

#[tokio::test]
async fn test_unparseable_output_moves_to_next_candidate() {
    let server = MockServer::start().await;
    mount_default_registries(&server).await;

    Mock::given(method("POST"))
        .and(path(FLASH_URL))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generation_response(r#"{"subject":"Only a subject"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PRO_URL))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(generation_response(&draft_json("S", "B"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = fast_client(&server).generate(&request()).await.unwrap();
    assert_eq!(draft.subject, "S");
}

#[tokio::test]
async fn test_code_fenced_output_is_accepted() {
    let server = MockServer::start().await;
    mount_default_registries(&server).await;

    let fenced = format!("```json\n{}\n```", draft_json("Fenced", "Body text"));
    Mock::given(method("POST"))
        .and(path(FLASH_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation_response(&fenced)))
        .mount(&server)
        .await;

    let draft = fast_client(&server).generate(&request()).await.unwrap();
    assert_eq!(draft.subject, "Fenced");
    assert_eq!(draft.body, "Body text");
}

#[tokio::test]
async fn test_all_candidates_failing_reports_every_attempt_in_order() {
    let server = MockServer::start().await;
    mount_default_registries(&server).await;

    Mock::given(method("POST"))
        .and(path(FLASH_URL))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PRO_URL))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let error = fast_client(&server)
        .generate(&request())
        .await
        .unwrap_err();
    let message = error.to_string();

    assert!(message.starts_with("Gemini generation failed. Attempts: "));
    let flash = message
        .find("v1/gemini-1.5-flash-001: Gemini v1/gemini-1.5-flash-001 error 400: bad request")
        .unwrap();
    let pro = message
        .find("v1/gemini-pro: Gemini v1/gemini-pro error 403: forbidden")
        .unwrap();
    assert!(flash < pro);
    assert!(message.contains(" | "));
}

#[tokio::test]
async fn test_missing_api_key_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::new(GeminiConfig::default().with_base_url(server.uri())).unwrap();
    let error = client.generate(&request()).await.unwrap_err();

    assert!(error.is_configuration_error());
}

#[tokio::test]
async fn test_no_models_available() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"] }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = fast_client(&server)
        .generate(&request())
        .await
        .unwrap_err();
    assert!(error.is_no_models_available());
}

#[tokio::test]
async fn test_cancelled_token_abandons_every_candidate() {
    let server = MockServer::start().await;
    mount_default_registries(&server).await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generation_response(&draft_json("S", "B")))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let error = fast_client(&server)
        .generate_with_cancel(&request(), &cancel)
        .await
        .unwrap_err();
    let message = error.to_string();

    assert!(message.contains("v1/gemini-1.5-flash-001: Request cancelled"));
    assert!(message.contains("v1/gemini-pro: Request cancelled"));
}

#[tokio::test]
async fn test_generate_with_fixed_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(generation_response(&draft_json("S", "B"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = fast_client(&server)
        .generate_with_model(ApiVersion::V1Beta, "gemini-1.5-pro", &request())
        .await
        .unwrap();
    assert_eq!(draft.body, "B");
}
