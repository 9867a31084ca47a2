//! HTTP binding of the speech backend

use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lang::Language;

use super::SpeechBackend;

/// Per-operation request deadlines
#[derive(Debug, Clone, Copy)]
pub struct BackendTimeouts {
    pub stt: Duration,
    pub translate: Duration,
    pub tts: Duration,
    pub chat: Duration,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self {
            stt: Duration::from_secs(60),
            translate: Duration::from_secs(30),
            tts: Duration::from_secs(30),
            chat: Duration::from_secs(30),
        }
    }
}

#[derive(Deserialize)]
struct SttResponse {
    #[serde(default)]
    transcript: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: HashMap<String, String>,
}

#[derive(Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    format: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    response: String,
}

/// Speech backend over HTTP with bearer-token authentication
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: String,
    timeouts: BackendTimeouts,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeouts: BackendTimeouts) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: token.into(),
            timeouts,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a transport error to the pipeline taxonomy: past-deadline
    /// failures are timeouts, everything else is a service error
    fn classify(err: reqwest::Error, deadline: Duration) -> Error {
        if err.is_timeout() {
            Error::Timeout(deadline)
        } else {
            Error::Service(err.to_string())
        }
    }

    async fn check_status(endpoint: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::error!(endpoint, status = %status, body = %body, "service returned error");
        Err(Error::Service(format!("{endpoint} returned {status}: {body}")))
    }
}

#[async_trait]
impl SpeechBackend for HttpBackend {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        let bytes = tokio::fs::read(audio).await.map_err(Error::Upload)?;
        tracing::debug!(audio_bytes = bytes.len(), "uploading recording for transcription");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("record.wav")
            .mime_str("audio/wav")
            .map_err(|e| Error::Service(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let started = Instant::now();
        let response = self
            .client
            .post(self.url("/stt/stop"))
            .bearer_auth(&self.token)
            .multipart(form)
            .timeout(self.timeouts.stt)
            .send()
            .await
            .map_err(|e| Self::classify(e, self.timeouts.stt))?;

        let response = Self::check_status("/stt/stop", response).await?;
        let parsed: SttResponse = response
            .json()
            .await
            .map_err(|e| Self::classify(e, self.timeouts.stt))?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = parsed.transcript.len(),
            "transcription complete"
        );
        Ok(parsed.transcript)
    }

    async fn translate(&self, text: &str) -> Result<HashMap<Language, String>> {
        let started = Instant::now();
        let response = self
            .client
            .post(self.url("/translate"))
            .bearer_auth(&self.token)
            .json(&TranslateRequest { text })
            .timeout(self.timeouts.translate)
            .send()
            .await
            .map_err(|e| Self::classify(e, self.timeouts.translate))?;

        let response = Self::check_status("/translate", response).await?;
        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| Self::classify(e, self.timeouts.translate))?;

        // Codes the service returns beyond the supported set are dropped
        let translations: HashMap<Language, String> = parsed
            .translations
            .into_iter()
            .filter_map(|(code, text)| Language::from_code(&code).map(|lang| (lang, text)))
            .collect();

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            languages = translations.len(),
            "translations received"
        );
        Ok(translations)
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let started = Instant::now();
        let response = self
            .client
            .post(self.url("/tts/speak"))
            .bearer_auth(&self.token)
            .json(&TtsRequest {
                text,
                format: "wav",
            })
            .timeout(self.timeouts.tts)
            .send()
            .await
            .map_err(|e| Self::classify(e, self.timeouts.tts))?;

        let response = Self::check_status("/tts/speak", response).await?;
        let audio = response
            .bytes()
            .await
            .map_err(|e| Self::classify(e, self.timeouts.tts))?;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            audio_bytes = audio.len(),
            "speech synthesized"
        );
        Ok(audio.to_vec())
    }

    async fn chat(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url("/llm/chat"))
            .bearer_auth(&self.token)
            .json(&ChatRequest { message })
            .timeout(self.timeouts.chat)
            .send()
            .await
            .map_err(|e| Self::classify(e, self.timeouts.chat))?;

        let response = Self::check_status("/llm/chat", response).await?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Self::classify(e, self.timeouts.chat))?;
        Ok(parsed.response)
    }
}
