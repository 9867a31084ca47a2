use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::lang::Language;
use crate::session::SessionId;

/// Messages handled by the orchestrator actor: frontend commands plus
/// results reported back by background pipeline tasks. Every task result
/// carries the id of the session it was started for so late arrivals from a
/// superseded session can be discarded.
#[derive(Debug)]
pub enum PipelineMsg {
    /// Start a new recording, invalidating the active session
    StartRecording,
    /// Abandon an in-progress recording; the pending capture result will
    /// arrive later and be discarded
    CancelRecording,
    /// Capture finished or failed
    RecordingDone {
        session: SessionId,
        result: Result<PathBuf>,
    },
    /// STT round trip finished or failed
    TranscriptReady {
        session: SessionId,
        result: Result<String>,
    },
    /// Translate round trip finished or failed
    TranslationsReady {
        session: SessionId,
        result: Result<HashMap<Language, String>>,
    },
    /// One language's TTS prefetch finished or failed
    AudioFetched {
        session: SessionId,
        lang: Language,
        result: Result<PathBuf>,
    },
}
