//! Session state: the single authoritative model of one interaction
//!
//! One [`Session`] is active at a time; the orchestrator is its only writer
//! and publishes snapshots through a watch channel. The frontend is a
//! read-only projection of those snapshots.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, ErrorKind};
use crate::lang::Language;

/// Identity of one recording-to-playback interaction.
///
/// Allocated monotonically; results arriving from background tasks carry the
/// id of the session they were started for, and are discarded when it no
/// longer matches the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pipeline phase, monotonic within one session apart from the explicit
/// reset when a new recording starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Recording,
    Transcribing,
    Translating,
    SynthesizingAudio,
    Ready,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Error record surfaced to the frontend
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorRecord {
    pub fn from_error(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Mutable model of the current interaction
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub phase: Phase,
    pub transcript: Option<String>,
    pub translations: HashMap<Language, String>,
    pub audio_artifacts: HashMap<Language, PathBuf>,
    pub last_error: Option<ErrorRecord>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            phase: Phase::Idle,
            transcript: None,
            translations: HashMap::new(),
            audio_artifacts: HashMap::new(),
            last_error: None,
        }
    }

    /// Move to the next phase of a successful transition, clearing any
    /// previously recorded error
    pub(crate) fn advance(&mut self, phase: Phase) {
        self.phase = phase;
        self.last_error = None;
    }

    /// Transition to `Failed`, recording the cause
    pub(crate) fn fail(&mut self, err: &Error) {
        self.phase = Phase::Failed;
        self.last_error = Some(ErrorRecord::from_error(err));
    }

    /// Synthesized audio path for a language, if prefetch has landed
    pub fn audio_for(&self, lang: Language) -> Option<&PathBuf> {
        self.audio_artifacts.get(&lang)
    }

    /// Human-readable status line for the current phase
    pub fn status_line(&self) -> String {
        match self.phase {
            Phase::Idle => "Idle.".to_string(),
            Phase::Recording => "Recording...".to_string(),
            Phase::Transcribing => "Uploading for STT...".to_string(),
            Phase::Translating => "Requesting translations...".to_string(),
            Phase::SynthesizingAudio => "Fetching voice tracks...".to_string(),
            Phase::Ready => "Translations ready. Use `play <language>` to listen.".to_string(),
            Phase::Failed => match &self.last_error {
                Some(err) => format!("Error: {}", err.message),
                None => "Error.".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn advance_clears_previous_error() {
        let mut session = Session::new(SessionId(1));
        session.fail(&Error::Capture("device busy".to_string()));
        assert_eq!(session.phase, Phase::Failed);
        assert!(session.last_error.is_some());

        session.advance(Phase::Recording);
        assert_eq!(session.phase, Phase::Recording);
        assert!(session.last_error.is_none());
    }

    #[test]
    fn fail_records_error_kind() {
        let mut session = Session::new(SessionId(1));
        session.fail(&Error::Timeout(Duration::from_secs(60)));

        let record = session.last_error.expect("error record");
        assert_eq!(record.kind, ErrorKind::Timeout);
        assert!(record.message.contains("timed out"));
    }

    #[test]
    fn terminal_phases() {
        assert!(Phase::Ready.is_terminal());
        assert!(Phase::Failed.is_terminal());
        assert!(!Phase::Recording.is_terminal());
        assert!(!Phase::Idle.is_terminal());
    }

    #[test]
    fn failed_status_line_surfaces_message() {
        let mut session = Session::new(SessionId(1));
        session.fail(&Error::Service("stt returned 500".to_string()));
        assert!(session.status_line().contains("stt returned 500"));
    }
}
