use maildraft::services::gemini::{ApiVersion, GeminiClient, GeminiConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry(models: &[(&str, &[&str])]) -> Value {
    json!({
        "models": models
            .iter()
            .map(|(name, methods)| json!({
                "name": format!("models/{name}"),
                "supportedGenerationMethods": methods,
            }))
            .collect::<Vec<_>>()
    })
}

const GENERATE: &[&str] = &["generateContent", "countTokens"];
const EMBED: &[&str] = &["embedContent"];

async fn mount_registry(server: &MockServer, version: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{version}/models")))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_registry_failure(server: &MockServer, version: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{version}/models")))
        .respond_with(ResponseTemplate::new(status).set_body_string("denied"))
        .mount(server)
        .await;
}

fn client(server: &MockServer, model: Option<&str>) -> GeminiClient {
    let mut config = GeminiConfig::new("test-key").with_base_url(server.uri());
    if let Some(model) = model {
        config = config.with_model(model);
    }
    GeminiClient::new(config).unwrap()
}

fn names(client_candidates: &[maildraft::services::gemini::ResolvedCandidate]) -> Vec<String> {
    client_candidates.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_candidates_are_ranked_per_version_v1_first() {
    let server = MockServer::start().await;
    mount_registry(
        &server,
        "v1",
        registry(&[
            ("text-bison-001", GENERATE),
            ("gemini-1.0-pro", GENERATE),
            ("gemini-1.5-flash-001", GENERATE),
            ("embedding-001", EMBED),
        ]),
    )
    .await;
    mount_registry(
        &server,
        "v1beta",
        registry(&[("gemini-exp-1206", GENERATE), ("gemini-1.5-pro", GENERATE)]),
    )
    .await;

    let candidates = client(&server, None).resolve_candidates().await.unwrap();

    assert_eq!(
        names(&candidates),
        vec![
            "v1/gemini-1.5-flash-001",
            "v1/gemini-1.0-pro",
            "v1/text-bison-001",
            "v1beta/gemini-1.5-pro",
            "v1beta/gemini-exp-1206",
        ]
    );
}

#[tokio::test]
async fn test_desired_model_is_tried_first() {
    let server = MockServer::start().await;
    mount_registry(
        &server,
        "v1",
        registry(&[
            ("gemini-1.5-flash-001", GENERATE),
            ("gemini-1.5-pro", GENERATE),
        ]),
    )
    .await;
    mount_registry(&server, "v1beta", registry(&[])).await;

    let candidates = client(&server, Some("gemini-1.5-pro"))
        .resolve_candidates()
        .await
        .unwrap();

    assert_eq!(
        names(&candidates),
        vec!["v1/gemini-1.5-pro", "v1/gemini-1.5-flash-001"]
    );
}

#[tokio::test]
async fn test_failed_version_is_skipped() {
    let server = MockServer::start().await;
    mount_registry_failure(&server, "v1", 403).await;
    mount_registry(&server, "v1beta", registry(&[("gemini-pro", GENERATE)])).await;

    let candidates = client(&server, None).resolve_candidates().await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].api_version, ApiVersion::V1Beta);
    assert_eq!(candidates[0].model_name, "gemini-pro");
}

#[tokio::test]
async fn test_all_versions_failing_yields_no_candidates() {
    let server = MockServer::start().await;
    mount_registry_failure(&server, "v1", 500).await;
    mount_registry_failure(&server, "v1beta", 404).await;

    let client = client(&server, None);
    assert!(client.resolve_candidates().await.unwrap().is_empty());
    assert!(client
        .resolve_model()
        .await
        .unwrap_err()
        .is_no_models_available());
}

#[tokio::test]
async fn test_no_duplicate_pairs() {
    let server = MockServer::start().await;
    mount_registry(
        &server,
        "v1",
        registry(&[
            ("gemini-pro", GENERATE),
            ("gemini-pro", GENERATE),
            ("gemini-1.5-flash", GENERATE),
        ]),
    )
    .await;
    mount_registry(&server, "v1beta", registry(&[("gemini-pro", GENERATE)])).await;

    let candidates = client(&server, None).resolve_candidates().await.unwrap();

    assert_eq!(
        names(&candidates),
        vec!["v1/gemini-1.5-flash", "v1/gemini-pro", "v1beta/gemini-pro"]
    );
}

#[tokio::test]
async fn test_registry_pages_are_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(registry(&[("gemini-1.5-pro", GENERATE)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut first_page = registry(&[("embedding-001", EMBED)]);
    first_page["nextPageToken"] = json!("page-2");
    mount_registry(&server, "v1", first_page).await;
    mount_registry(&server, "v1beta", registry(&[])).await;

    let candidates = client(&server, None).resolve_candidates().await.unwrap();

    assert_eq!(names(&candidates), vec!["v1/gemini-1.5-pro"]);
}

#[tokio::test]
async fn test_resolve_model_returns_top_candidate() {
    let server = MockServer::start().await;
    mount_registry(&server, "v1", registry(&[])).await;
    mount_registry(
        &server,
        "v1beta",
        registry(&[("gemini-1.0-pro", GENERATE), ("gemini-1.5-flash-8b", GENERATE)]),
    )
    .await;

    let top = client(&server, None).resolve_model().await.unwrap();
    assert_eq!(top.to_string(), "v1beta/gemini-1.5-flash-8b");
}
