//! Audio playback
//!
//! Mirrors the recorder's capability probing: an external playback utility
//! when present, otherwise the bundled audio library. Runs on a blocking
//! context so playback never stalls the pipeline; failures are reported to
//! the caller and are never fatal.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::OutputStreamBuilder;

use crate::error::{Error, Result};

/// How an artifact will be played
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStrategy {
    ExternalUtility(PathBuf),
    BundledLibrary,
}

/// Probe for the playback utility. Re-checked on every invocation.
pub fn select_strategy(utility: &str) -> PlaybackStrategy {
    which::which(utility)
        .map(PlaybackStrategy::ExternalUtility)
        .unwrap_or(PlaybackStrategy::BundledLibrary)
}

/// Play an audio artifact to completion.
///
/// `utility` is the external player binary to probe for (normally `aplay`).
pub async fn play(utility: &str, path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    match select_strategy(utility) {
        PlaybackStrategy::ExternalUtility(bin) => play_external(&bin, path).await,
        PlaybackStrategy::BundledLibrary => {
            let path = path.to_path_buf();
            tokio::task::spawn_blocking(move || play_bundled(&path))
                .await
                .map_err(|e| Error::Playback(format!("playback task failed: {e}")))?
        }
    }
}

async fn play_external(bin: &Path, path: &Path) -> Result<()> {
    let output = tokio::process::Command::new(bin)
        .arg(path)
        .output()
        .await
        .map_err(|e| Error::Playback(format!("failed to run {}: {e}", bin.display())))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Playback(format!(
            "{} exited with {}: {}",
            bin.display(),
            output.status,
            stderr.trim()
        )));
    }

    tracing::debug!(path = %path.display(), "playback complete");
    Ok(())
}

fn play_bundled(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|_| Error::NotFound(path.to_path_buf()))?;

    let stream_handle = OutputStreamBuilder::open_default_stream()
        .map_err(|e| Error::Playback(format!("failed to open output stream: {e}")))?;
    let sink = rodio::play(stream_handle.mixer(), BufReader::new(file))
        .map_err(|e| Error::Playback(e.to_string()))?;
    sink.sleep_until_end();

    tracing::debug!(path = %path.display(), "playback complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn missing_artifact_is_not_found() {
        let err = play("aplay", Path::new("/tmp/voxlate-no-such-artifact.wav"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn probe_returns_bundled_when_utility_absent() {
        assert_eq!(
            select_strategy("voxlate-no-such-player"),
            PlaybackStrategy::BundledLibrary
        );
    }
}
