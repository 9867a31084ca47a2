//! Console frontend
//!
//! A thin, read-only projection of Session snapshots plus a line-oriented
//! command reader. All pipeline state lives in the orchestrator; this layer
//! only forwards commands and prints what the snapshots say.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use crate::artifacts::ArtifactStore;
use crate::backend::{HttpBackend, SpeechBackend};
use crate::config::Config;
use crate::lang::Language;
use crate::orchestrator::{Orchestrator, OrchestratorHandle};
use crate::player;
use crate::session::{Phase, Session, SessionId};

const HELP: &str = "commands: rec (toggle recording), play <language>, chat <message>, status, quit";

/// Commands entered at the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    ToggleMic,
    Play(Language),
    Chat(String),
    Status,
    Quit,
}

/// Parse one input line into a command
pub fn parse_command(line: &str) -> std::result::Result<UiCommand, String> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd.to_ascii_lowercase().as_str() {
        "rec" | "mic" => Ok(UiCommand::ToggleMic),
        "play" => Language::parse(rest)
            .map(UiCommand::Play)
            .ok_or_else(|| format!("unknown language `{rest}` (try en, ja, zh-cn or vi)")),
        "chat" if !rest.is_empty() => Ok(UiCommand::Chat(rest.to_string())),
        "chat" => Err("usage: chat <message>".to_string()),
        "status" => Ok(UiCommand::Status),
        "quit" | "exit" => Ok(UiCommand::Quit),
        _ => Err(HELP.to_string()),
    }
}

pub struct App {
    config: Config,
    orchestrator: OrchestratorHandle,
    session_rx: watch::Receiver<Session>,
    backend: Arc<dyn SpeechBackend>,
    command_rx: mpsc::Receiver<UiCommand>,
    recording: bool,
    shown_phase: Option<(SessionId, Phase)>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let backend: Arc<dyn SpeechBackend> = Arc::new(HttpBackend::new(
            config.backend_url.clone(),
            config.api_token.clone(),
            config.backend_timeouts(),
        ));

        let store = ArtifactStore::new(&config.audio_dir);
        let (orchestrator, handle, session_rx) =
            Orchestrator::new(Arc::clone(&backend), store, config.pipeline_settings());
        tokio::spawn(orchestrator.run());

        let command_rx = Self::spawn_command_reader();

        Ok(Self {
            config,
            orchestrator: handle,
            session_rx,
            backend,
            command_rx,
            recording: false,
            shown_phase: None,
        })
    }

    pub async fn run(mut self) -> Result<()> {
        println!("voxlate (backend: {})", self.config.backend_url);
        println!("{HELP}");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if !self.handle_command(cmd).await? {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                changed = self.session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = self.session_rx.borrow_and_update().clone();
                    self.on_session_update(&snapshot);
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_command(&mut self, cmd: UiCommand) -> Result<bool> {
        match cmd {
            UiCommand::ToggleMic => {
                if self.recording {
                    self.recording = false;
                    self.orchestrator.cancel_recording().await?;
                    println!("Recording cancelled.");
                } else {
                    self.recording = true;
                    self.orchestrator.start_recording().await?;
                }
            }
            UiCommand::Play(lang) => self.play(lang),
            UiCommand::Chat(message) => self.chat(message),
            UiCommand::Status => {
                let session = self.session_rx.borrow().clone();
                println!("[session {}] {}", session.id, session.status_line());
            }
            UiCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn on_session_update(&mut self, session: &Session) {
        // The mic latch follows the pipeline, so a completed or failed
        // recording resets the toggle
        if session.phase != Phase::Recording {
            self.recording = false;
        }

        let entry = (session.id, session.phase);
        if self.shown_phase != Some(entry) {
            self.shown_phase = Some(entry);
            println!("[session {}] {}", session.id, session.status_line());

            if session.phase == Phase::Translating {
                if let Some(transcript) = &session.transcript {
                    println!("  transcript: {transcript}");
                }
            }
            if session.phase == Phase::Ready {
                for lang in Language::ALL {
                    match session.translations.get(&lang) {
                        Some(text) => println!("  {:<12} {text}", lang.name()),
                        None => println!("  {:<12} (no translation available)", lang.name()),
                    }
                }
            }
        } else if session.phase == Phase::Ready {
            // Incremental voice-track arrivals after Ready
            let ready: Vec<&str> = Language::ALL
                .iter()
                .filter(|lang| session.audio_for(**lang).is_some())
                .map(|lang| lang.code())
                .collect();
            println!("  voice tracks ready: [{}]", ready.join(", "));
        }
    }

    fn play(&self, lang: Language) {
        let session = self.session_rx.borrow().clone();
        match session.audio_for(lang) {
            Some(path) => {
                let path = path.clone();
                let utility = self.config.playback_utility.clone();
                tokio::spawn(async move {
                    println!("Playing {}...", lang.name());
                    match player::play(&utility, &path).await {
                        Ok(()) => println!("Playback of {} complete.", lang.name()),
                        Err(e) => println!("Playback error: {e}"),
                    }
                });
            }
            None => println!("No audio for {}.", lang.name()),
        }
    }

    fn chat(&self, message: String) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            match backend.chat(&message).await {
                Ok(response) => println!("assistant: {response}"),
                Err(e) => println!("Chat error: {e}"),
            }
        });
    }

    fn spawn_command_reader() -> mpsc::Receiver<UiCommand> {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(cmd) => {
                        if tx.send(cmd).await.is_err() {
                            break;
                        }
                    }
                    Err(msg) => println!("{msg}"),
                }
            }
        });
        rx
    }
}
