//! HTTP client tests against a mock server

use std::path::Path;
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voxlate::audio::{AudioFormat, silence};
use voxlate::backend::{BackendTimeouts, HttpBackend, SpeechBackend};
use voxlate::error::ErrorKind;
use voxlate::lang::Language;

fn backend(uri: &str) -> HttpBackend {
    HttpBackend::new(uri, "test-token", BackendTimeouts::default())
}

fn fixture_wav(dir: &Path) -> std::path::PathBuf {
    let audio = dir.join("rec.wav");
    silence::write_silence(&audio, AudioFormat::default(), Duration::from_millis(100)).unwrap();
    audio
}

#[tokio::test]
async fn transcribe_uploads_and_parses_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stt/stop"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"transcript": "hello there"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let audio = fixture_wav(dir.path());

    let transcript = backend(&server.uri()).transcribe(&audio).await.unwrap();
    assert_eq!(transcript, "hello there");
}

#[tokio::test]
async fn transcribe_missing_artifact_is_upload_error() {
    // The request never leaves the process: reading the artifact fails first
    let err = backend("http://localhost:9")
        .transcribe(Path::new("/tmp/voxlate-no-such-recording.wav"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upload);
}

#[tokio::test]
async fn non_success_status_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let err = backend(&server.uri()).translate("hello").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn slow_response_is_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"translations": {}}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let timeouts = BackendTimeouts {
        translate: Duration::from_millis(50),
        ..BackendTimeouts::default()
    };
    let backend = HttpBackend::new(server.uri(), "test-token", timeouts);

    let err = backend.translate("hello").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn translate_drops_unsupported_codes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "translations": {
                "en": "Hello",
                "ja": "こんにちは",
                "xx": "???"
            }
        })))
        .mount(&server)
        .await;

    let translations = backend(&server.uri()).translate("hi").await.unwrap();
    assert_eq!(translations.len(), 2);
    assert_eq!(translations.get(&Language::English).unwrap(), "Hello");
    assert!(translations.keys().all(|lang| Language::ALL.contains(lang)));
}

#[tokio::test]
async fn translate_accepts_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "translations": {"en": "", "ja": "", "zh-cn": "", "vi": ""}
        })))
        .mount(&server)
        .await;

    let translations = backend(&server.uri()).translate("").await.unwrap();
    assert_eq!(translations.len(), 4);
    assert!(translations.values().all(String::is_empty));
}

#[tokio::test]
async fn synthesize_returns_raw_bytes() {
    let voice = b"RIFF-not-really-audio".to_vec();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tts/speak"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(voice.clone()))
        .mount(&server)
        .await;

    let audio = backend(&server.uri()).synthesize("hello").await.unwrap();
    assert_eq!(audio, voice);
}

#[tokio::test]
async fn chat_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/llm/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"response": "happy to help"})),
        )
        .mount(&server)
        .await;

    let response = backend(&server.uri()).chat("hi").await.unwrap();
    assert_eq!(response, "happy to help");
}
