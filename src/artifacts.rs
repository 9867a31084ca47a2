//! On-disk storage for recorded and synthesized audio
//!
//! One directory holds every artifact. Names are unique per artifact so the
//! area is append-only: no two tasks ever write the same path. Retention is
//! left to the surrounding environment.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Result;
use crate::lang::Language;
use crate::session::SessionId;

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the artifact directory if it does not exist yet
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Fresh unique path for a recording
    pub fn recording_path(&self) -> PathBuf {
        self.root
            .join(format!("rec-{}.wav", Uuid::new_v4().simple()))
    }

    /// Path for the synthesized audio of one language in one session
    pub fn tts_path(&self, session: SessionId, lang: Language) -> PathBuf {
        self.root
            .join(format!("tts-{session}-{}.wav", lang.code()))
    }
}
