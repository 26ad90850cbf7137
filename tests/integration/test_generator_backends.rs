use maildraft::config::{resolve_gemini_config, Config};
use maildraft::models::{DraftLanguage, EmailRequest, GenerationBackend};
use maildraft::services::{create_generator, GeminiConfig};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{any, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_offline_backend_never_touches_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = GeminiConfig::default()
        .with_base_url(server.uri())
        .with_backend(GenerationBackend::Offline);
    let generator = create_generator(config).unwrap();

    let draft = generator
        .generate(EmailRequest::new(["会議", "日程調整"]).with_recipient("佐藤"))
        .await
        .unwrap();

    assert_eq!(generator.backend(), GenerationBackend::Offline);
    assert_eq!(draft.subject, "会議・日程調整 の件");
    assert!(draft.body.starts_with("佐藤 様"));
}

#[tokio::test]
async fn test_gemini_backend_sends_keywords_in_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "models/gemini-1.5-pro", "supportedGenerationMethods": ["generateContent"] }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/models/gemini-1.5-pro:generateContent"))
        .and(body_string_contains("quarterly report, deadline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "{\"subject\": \"Quarterly report\"," },
                { "text": " \"body\": \"Dear Kim,\\nThe deadline is Friday.\"}" }
            ] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = GeminiConfig::new("test-key")
        .with_base_url(server.uri())
        .with_model("gemini-1.5-pro");
    let generator = create_generator(config).unwrap();

    let draft = generator
        .generate_with_cancel(
            EmailRequest::new(["quarterly report", "deadline"])
                .with_recipient("Kim")
                .with_language(DraftLanguage::English),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(generator.backend(), GenerationBackend::Gemini);
    assert_eq!(draft.subject, "Quarterly report");
    assert_eq!(draft.body, "Dear Kim,\nThe deadline is Friday.");
}

#[tokio::test]
async fn test_config_file_selects_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut file = Config::default();
    file.set("backend", "offline".to_string()).unwrap();
    file.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    let config = resolve_gemini_config(&loaded, |_| None).unwrap();
    assert_eq!(config.backend, GenerationBackend::Offline);

    let draft = create_generator(config)
        .unwrap()
        .generate(EmailRequest::new(["invoice"]).with_language(DraftLanguage::English))
        .await
        .unwrap();
    assert_eq!(draft.subject, "Regarding: invoice");
}

#[tokio::test]
async fn test_missing_key_error_is_user_facing() {
    let generator = create_generator(GeminiConfig::default()).unwrap();
    let error = generator
        .generate(EmailRequest::new(["invoice"]))
        .await
        .unwrap_err();

    assert_eq!(error.category(), "gemini");
    assert!(error
        .as_gemini()
        .is_some_and(|e| e.is_configuration_error()));
    assert!(error.user_message().starts_with("Configuration error"));
}
