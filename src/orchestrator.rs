//! Translation pipeline orchestrator
//!
//! A single actor task owns the active [`Session`] and is its only writer.
//! Commands from the frontend and results from background tasks arrive on
//! one channel; snapshots go out on a watch channel for the frontend to
//! project. Long-latency work (capture, each remote call) runs on spawned
//! tasks that report back with the session id they were started for; a
//! result whose id no longer matches the active session is dropped without
//! touching state.
//!
//! Phase flow: Idle -> Recording -> Transcribing -> Translating ->
//! SynthesizingAudio -> Ready, with Failed reachable from any non-terminal
//! phase on a capture/STT/translate error. The session becomes Ready as
//! soon as translation lands; TTS prefetch results fill in
//! `audio_artifacts` incrementally afterwards, and a failed prefetch only
//! leaves that one language without audio.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::artifacts::ArtifactStore;
use crate::audio::AudioFormat;
use crate::backend::SpeechBackend;
use crate::error::{Error, Result};
use crate::lang::Language;
use crate::messages::PipelineMsg;
use crate::recorder;
use crate::session::{ErrorRecord, Phase, Session, SessionId};

/// Tunables the orchestrator needs from configuration
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub record_duration: Duration,
    pub capture_mode: String,
    pub capture_utility: String,
    pub format: AudioFormat,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            record_duration: Duration::from_secs(4),
            capture_mode: "auto".to_string(),
            capture_utility: "arecord".to_string(),
            format: AudioFormat::default(),
        }
    }
}

pub struct Orchestrator {
    backend: Arc<dyn SpeechBackend>,
    store: ArtifactStore,
    settings: PipelineSettings,
    rx: mpsc::Receiver<PipelineMsg>,
    tx: mpsc::Sender<PipelineMsg>,
    state_tx: watch::Sender<Session>,
    session: Session,
    next_id: u64,
    pending_tts: HashSet<Language>,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        store: ArtifactStore,
        settings: PipelineSettings,
    ) -> (Self, OrchestratorHandle, watch::Receiver<Session>) {
        let (tx, rx) = mpsc::channel(32);
        let session = Session::new(SessionId(0));
        let (state_tx, state_rx) = watch::channel(session.clone());

        let orchestrator = Self {
            backend,
            store,
            settings,
            rx,
            tx: tx.clone(),
            state_tx,
            session,
            next_id: 0,
            pending_tts: HashSet::new(),
        };

        (orchestrator, OrchestratorHandle { tx }, state_rx)
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            self.handle(msg);
        }
        tracing::debug!("orchestrator shutting down");
    }

    fn handle(&mut self, msg: PipelineMsg) {
        match msg {
            PipelineMsg::StartRecording => self.start_recording(),
            PipelineMsg::CancelRecording => self.cancel_recording(),
            PipelineMsg::RecordingDone { session, result } => {
                self.on_recording_done(session, result);
            }
            PipelineMsg::TranscriptReady { session, result } => {
                self.on_transcript(session, result);
            }
            PipelineMsg::TranslationsReady { session, result } => {
                self.on_translations(session, result);
            }
            PipelineMsg::AudioFetched {
                session,
                lang,
                result,
            } => self.on_audio_fetched(session, lang, result),
        }
    }

    /// Allocate a fresh session, invalidating the previous one. In-flight
    /// tasks keep running; their results fail the staleness check on
    /// arrival.
    fn begin_session(&mut self) -> SessionId {
        self.next_id += 1;
        let id = SessionId(self.next_id);
        self.session = Session::new(id);
        self.pending_tts.clear();
        id
    }

    fn publish(&self) {
        let _ = self.state_tx.send(self.session.clone());
    }

    fn is_stale(&self, id: SessionId) -> bool {
        id != self.session.id
    }

    fn fail(&mut self, err: &Error) {
        tracing::error!(session = %self.session.id, error = %err, "pipeline failed");
        self.session.fail(err);
        self.publish();
    }

    fn start_recording(&mut self) {
        let id = self.begin_session();
        tracing::info!(session = %id, "starting recording");
        self.session.advance(Phase::Recording);
        self.publish();

        if let Err(e) = self.store.ensure() {
            self.fail(&e);
            return;
        }

        let strategy =
            match recorder::select_strategy(&self.settings.capture_mode, &self.settings.capture_utility) {
                Ok(strategy) => strategy,
                Err(e) => {
                    self.fail(&e);
                    return;
                }
            };

        let out_path = self.store.recording_path();
        let format = self.settings.format;
        let duration = self.settings.record_duration;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = recorder::record(strategy, format, duration, &out_path).await;
            let _ = tx
                .send(PipelineMsg::RecordingDone {
                    session: id,
                    result,
                })
                .await;
        });
    }

    fn cancel_recording(&mut self) {
        if self.session.phase != Phase::Recording {
            tracing::debug!("cancel ignored, no recording in progress");
            return;
        }
        tracing::info!(session = %self.session.id, "recording cancelled");
        self.begin_session();
        self.publish();
    }

    fn on_recording_done(&mut self, id: SessionId, result: Result<PathBuf>) {
        if self.is_stale(id) {
            tracing::debug!(session = %id, "discarding capture result for superseded session");
            return;
        }

        let artifact = match result {
            Ok(artifact) => artifact,
            Err(e) => {
                self.fail(&e);
                return;
            }
        };

        self.session.advance(Phase::Transcribing);
        self.publish();

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.transcribe(&artifact).await;
            let _ = tx
                .send(PipelineMsg::TranscriptReady {
                    session: id,
                    result,
                })
                .await;
        });
    }

    fn on_transcript(&mut self, id: SessionId, result: Result<String>) {
        if self.is_stale(id) {
            tracing::debug!(session = %id, "discarding transcript for superseded session");
            return;
        }

        let transcript = match result {
            Ok(transcript) => transcript,
            Err(e) => {
                self.fail(&e);
                return;
            }
        };

        self.session.transcript = Some(transcript.clone());
        self.session.advance(Phase::Translating);
        self.publish();

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.translate(&transcript).await;
            let _ = tx
                .send(PipelineMsg::TranslationsReady {
                    session: id,
                    result,
                })
                .await;
        });
    }

    fn on_translations(&mut self, id: SessionId, result: Result<HashMap<Language, String>>) {
        if self.is_stale(id) {
            tracing::debug!(session = %id, "discarding translations for superseded session");
            return;
        }

        let translations = match result {
            Ok(translations) => translations,
            Err(e) => {
                self.fail(&e);
                return;
            }
        };

        self.session.translations = translations.clone();
        self.session.advance(Phase::SynthesizingAudio);
        self.publish();

        for (lang, text) in translations {
            // At most one prefetch in flight per language per session
            if !self.pending_tts.insert(lang) {
                continue;
            }
            let backend = Arc::clone(&self.backend);
            let tx = self.tx.clone();
            let path = self.store.tts_path(id, lang);
            tokio::spawn(async move {
                let result = synthesize_to_file(backend.as_ref(), &text, &path).await;
                let _ = tx
                    .send(PipelineMsg::AudioFetched {
                        session: id,
                        lang,
                        result,
                    })
                    .await;
            });
        }

        // Usable as soon as translation lands; voice tracks fill in behind
        self.session.advance(Phase::Ready);
        self.publish();
    }

    fn on_audio_fetched(&mut self, id: SessionId, lang: Language, result: Result<PathBuf>) {
        if self.is_stale(id) {
            tracing::debug!(
                session = %id,
                lang = lang.code(),
                "discarding synthesized audio for superseded session"
            );
            return;
        }

        self.pending_tts.remove(&lang);
        match result {
            Ok(path) => {
                tracing::info!(session = %id, lang = lang.code(), "voice track ready");
                self.session.audio_artifacts.insert(lang, path);
            }
            Err(e) => {
                // Local to this language: siblings and the Ready state are
                // unaffected
                tracing::warn!(session = %id, lang = lang.code(), error = %e, "voice prefetch failed");
                self.session.last_error = Some(ErrorRecord::from_error(&e));
            }
        }
        self.publish();
    }
}

async fn synthesize_to_file(
    backend: &dyn SpeechBackend,
    text: &str,
    path: &Path,
) -> Result<PathBuf> {
    let audio = backend.synthesize(text).await?;
    tokio::fs::write(path, &audio).await?;
    Ok(path.to_path_buf())
}

/// Handle for sending commands to the orchestrator
#[derive(Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::Sender<PipelineMsg>,
}

impl OrchestratorHandle {
    pub async fn start_recording(&self) -> Result<()> {
        self.tx
            .send(PipelineMsg::StartRecording)
            .await
            .map_err(|_| Error::Channel("orchestrator task terminated".to_string()))
    }

    pub async fn cancel_recording(&self) -> Result<()> {
        self.tx
            .send(PipelineMsg::CancelRecording)
            .await
            .map_err(|_| Error::Channel("orchestrator task terminated".to_string()))
    }
}
