use serde_json::json;
use tern_client::{ExtensionConfig, ExtensionEntry, TernClient, TernClientConfig, TernClientError};
use tern_settings::{ExtensionEvent, ModelSelection, Settings, SettingsError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer, dir: &tempfile::TempDir) -> Settings {
    let client = TernClient::new(TernClientConfig::new(server.uri(), "local-credential")).unwrap();
    let selection = ModelSelection::load(dir.path().join("model_selection.json")).unwrap();
    Settings::with_selection(client, selection)
}

fn openai_providers(is_set: bool) -> serde_json::Value {
    json!([
        {
            "name": "OpenAI",
            "keys": [{"key": "OPENAI_API_KEY", "is_set": is_set}]
        }
    ])
}

fn shell_entry() -> ExtensionEntry {
    ExtensionEntry {
        enabled: true,
        config: ExtensionConfig::Stdio {
            name: "shell".to_string(),
            cmd: "tern-shell".to_string(),
            args: vec![],
            envs: Default::default(),
            timeout: Some(300),
        },
    }
}

#[tokio::test]
async fn test_store_then_refresh_then_select_scenario() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_providers(false)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_providers(true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/secrets/store"))
        .and(body_json(json!({"key": "OPENAI_API_KEY", "value": "sk-test"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);

    settings.refresh_active_keys().await.unwrap();
    assert!(!settings.active_keys.is_configured("OpenAI"));

    settings
        .client()
        .store_secret("OPENAI_API_KEY", "sk-test")
        .await
        .unwrap();
    settings.refresh_active_keys().await.unwrap();
    assert!(settings.active_keys.is_configured("OpenAI"));
    assert_eq!(settings.active_keys.active_providers(), vec!["OpenAI"]);

    let selected = settings.selection.select_provider("openai").unwrap();
    assert_eq!(selected.provider, "openai");
    assert_eq!(selected.model, "gpt-4o");
    assert_eq!(settings.selection.recent_models()[0].selection, selected);

    let reloaded = ModelSelection::load(dir.path().join("model_selection.json")).unwrap();
    assert_eq!(reloaded.selected(), Some(selected));
}

#[tokio::test]
async fn test_set_provider_key_fresh_add_stores_then_refreshes() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/secrets/store"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/secrets/delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_providers(true)))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    settings.set_provider_key("openai", " sk-test ").await.unwrap();
    assert!(settings.active_keys.is_configured("OpenAI"));
}

#[tokio::test]
async fn test_replace_aborts_before_store_when_delete_fails() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_providers(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/secrets/delete"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "store locked"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/secrets/store"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    settings.refresh_active_keys().await.unwrap();
    assert!(settings.active_keys.is_configured("OpenAI"));

    let err = settings
        .set_provider_key("openai", "sk-new")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Client(TernClientError::Server { status: 500, .. })
    ));

    // The cache was not refreshed on failure, so the prior configured
    // state is still what consumers see.
    assert!(settings.active_keys.is_configured("OpenAI"));
}

#[tokio::test]
async fn test_store_failure_after_delete_is_replace_failed() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_providers(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/secrets/delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/secrets/store"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "disk full"})))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    settings.refresh_active_keys().await.unwrap();

    let err = settings
        .set_provider_key("openai", "sk-new")
        .await
        .unwrap_err();
    match err {
        SettingsError::ReplaceFailed { provider, .. } => assert_eq!(provider, "OpenAI"),
        other => panic!("expected ReplaceFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_store_triggers_no_refresh() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/secrets/store"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "disk full"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_providers(false)))
        .expect(0)
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    let err = settings.set_provider_key("openai", "sk-test").await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_set_provider_key_unknown_provider() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let settings = settings_for(&server, &dir);
    let err = settings.set_provider_key("acme", "sk-test").await.unwrap_err();
    assert!(matches!(err, SettingsError::UnknownProvider(ref id) if id == "acme"));
}

#[tokio::test]
async fn test_clear_provider_key_deletes_and_refreshes() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("DELETE"))
        .and(path("/secrets/delete"))
        .and(body_json(json!({"key": "OPENAI_API_KEY"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_providers(false)))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    settings.clear_provider_key("openai").await.unwrap();
    assert!(!settings.active_keys.is_configured("OpenAI"));
}

#[tokio::test]
async fn test_extension_add_conflict_and_idempotent_remove() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/config/extension"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/config/extension"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "shell already exists"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/config/extension"))
        .and(body_json(json!({"name": "shell"})))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/config/extension"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    let mut events = settings.extensions.subscribe();

    settings.extensions.add(shell_entry()).await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        ExtensionEvent::Added("shell".to_string())
    );

    let err = settings.extensions.add(shell_entry()).await.unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Client(TernClientError::Conflict(_))
    ));

    settings.extensions.remove("shell").await.unwrap();
    settings.extensions.remove("shell").await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        ExtensionEvent::Removed("shell".to_string())
    );
}

#[tokio::test]
async fn test_extension_update_absent_is_not_found_and_no_event() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("PUT"))
        .and(path("/config/extension"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "no such extension"})),
        )
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    let mut events = settings.extensions.subscribe();

    let err = settings.extensions.update(shell_entry()).await.unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Client(TernClientError::NotFound(_))
    ));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_set_enabled_round_trips_through_installed_map() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/config/read"))
        .and(body_json(json!({"key": "extensions"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shell": {
                "enabled": true,
                "type": "stdio",
                "name": "shell",
                "cmd": "tern-shell",
                "timeout": 300
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/config/extension"))
        .and(body_json(json!({
            "name": "shell",
            "enabled": false,
            "config": {
                "type": "stdio",
                "name": "shell",
                "cmd": "tern-shell",
                "args": [],
                "envs": {},
                "timeout": 300
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    let mut events = settings.extensions.subscribe();

    settings.extensions.set_enabled("shell", false).await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        ExtensionEvent::Updated("shell".to_string())
    );
}

#[tokio::test]
async fn test_provider_summaries_merge_catalog_and_backend() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "OpenAI",
                "keys": [{"key": "OPENAI_API_KEY", "is_set": true}]
            },
            {"name": "Acme", "keys": []}
        ])))
        .mount(&server)
        .await;

    let settings = settings_for(&server, &dir);
    settings.refresh_active_keys().await.unwrap();

    let rows = settings.provider_summaries().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "openai");
    assert!(rows[0].configured);
    assert!(!rows[0].description.is_empty());
    assert_eq!(rows[1].name, "Acme");
    assert!(rows[1].description.is_empty());
    assert!(!rows[1].configured);
}
