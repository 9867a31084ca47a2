//! Mock speech backend for local development
//!
//! Serves canned responses on the four endpoints the frontend calls, so the
//! whole pipeline can run without a real STT/translate/TTS deployment.
//! Start it, then run `voxlate` against the default base URL.

use std::time::Duration;

use anyhow::Result;
use axum::body::Bytes;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use voxlate::audio::{AudioFormat, silence};

const TRANSCRIPT: &str = "안녕하세요, 이것은 모의 전사입니다.";

const TRANSLATIONS: [(&str, &str); 4] = [
    ("en", "Hello, this is a mock transcript."),
    ("ja", "こんにちは、これはモックの文字起こしです。"),
    ("zh-cn", "你好，这是一个模拟转录。"),
    ("vi", "Xin chào, đây là bản ghi giả lập."),
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .route("/stt/stop", post(stt_stop))
        .route("/translate", post(translate))
        .route("/tts/speak", post(tts_speak))
        .route("/llm/chat", post(llm_chat));

    let addr = "0.0.0.0:8001";
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "mock backend listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn stt_stop(body: Bytes) -> Response {
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "no file uploaded"})),
        )
            .into_response();
    }

    let translations: serde_json::Map<String, serde_json::Value> = TRANSLATIONS
        .iter()
        .map(|(code, text)| ((*code).to_string(), json!(text)))
        .collect();

    Json(json!({
        "transcript": TRANSCRIPT,
        "translations": translations,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct TranslateRequest {
    #[serde(default)]
    text: String,
}

async fn translate(Json(request): Json<TranslateRequest>) -> Json<serde_json::Value> {
    let translations: serde_json::Map<String, serde_json::Value> = TRANSLATIONS
        .iter()
        .map(|(code, text)| {
            let value = if request.text.is_empty() { "" } else { *text };
            ((*code).to_string(), json!(value))
        })
        .collect();

    Json(json!({ "translations": translations }))
}

async fn tts_speak(Json(_request): Json<serde_json::Value>) -> Response {
    match silence::silent_wav_bytes(AudioFormat::default(), Duration::from_secs(1)) {
        Ok(wav) => ([(header::CONTENT_TYPE, "audio/wav")], wav).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

async fn llm_chat(Json(request): Json<ChatRequest>) -> Json<serde_json::Value> {
    let prefix: String = request.message.chars().take(200).collect();
    Json(json!({ "response": format!("Mock LLM response to: {prefix}") }))
}
