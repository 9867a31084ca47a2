//! Remote speech service client
//!
//! Four independent request/response operations against the backend. Each
//! carries an explicit timeout and no retry policy: transient failures
//! surface directly to the caller. The trait is the seam the orchestrator
//! depends on; [`HttpBackend`] is the wire implementation.

pub mod http;

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::lang::Language;

pub use http::{BackendTimeouts, HttpBackend};

#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Upload a recorded audio artifact and return its transcript
    async fn transcribe(&self, audio: &Path) -> Result<String>;

    /// Translate a transcript into the supported target languages.
    ///
    /// The result keys are always a subset of [`Language::ALL`]; codes the
    /// service returns that are not supported are dropped. An empty input
    /// text is valid and yields a well-defined (possibly empty-valued)
    /// mapping.
    async fn translate(&self, text: &str) -> Result<HashMap<Language, String>>;

    /// Synthesize speech for a translated text, returning raw audio bytes.
    /// Persisting the bytes is the caller's responsibility.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Free-form chat exchange, independent of the translation pipeline
    async fn chat(&self, message: &str) -> Result<String>;
}
