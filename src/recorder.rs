//! Audio capture
//!
//! Capture runs off the orchestrator's execution path and reports exactly one
//! completion or failure. Strategy selection happens at every invocation so
//! hardware that appears mid-session is picked up: an external capture
//! utility when one is on PATH, otherwise a synthesized silent artifact of
//! the requested duration so the rest of the pipeline stays exercisable
//! without recording hardware.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio::{AudioFormat, silence};
use crate::error::{Error, Result};

/// Capture mode names accepted in configuration
pub const CAPTURE_MODES: [&str; 3] = ["auto", "external", "fallback"];

/// How a recording will be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStrategy {
    /// Delegate to an external capture utility (arecord or a configured
    /// replacement)
    ExternalUtility(PathBuf),
    /// Synthesize a silent placeholder artifact
    FallbackSynthesis,
}

/// Select the capture strategy for one invocation.
///
/// `utility` is the binary name or path to probe for (normally `arecord`).
/// Probing is never cached: availability is re-checked on every call.
pub fn select_strategy(mode: &str, utility: &str) -> Result<CaptureStrategy> {
    match mode {
        "fallback" => Ok(CaptureStrategy::FallbackSynthesis),
        "external" => which::which(utility)
            .map(CaptureStrategy::ExternalUtility)
            .map_err(|_| Error::Capture(format!("capture utility `{utility}` not found"))),
        _ => Ok(which::which(utility)
            .map(CaptureStrategy::ExternalUtility)
            .unwrap_or(CaptureStrategy::FallbackSynthesis)),
    }
}

/// Record for `duration` into `out_path`, returning the artifact path.
///
/// External capture durations are whole seconds, matching the utility's
/// `-d` argument.
pub async fn record(
    strategy: CaptureStrategy,
    format: AudioFormat,
    duration: Duration,
    out_path: &Path,
) -> Result<PathBuf> {
    match strategy {
        CaptureStrategy::ExternalUtility(utility) => {
            record_external(&utility, format, duration, out_path).await
        }
        CaptureStrategy::FallbackSynthesis => {
            let path = out_path.to_path_buf();
            let result = tokio::task::spawn_blocking(move || {
                silence::write_silence(&path, format, duration).map(|()| path)
            })
            .await
            .map_err(|e| Error::Capture(format!("fallback synthesis task failed: {e}")))??;
            tracing::info!(path = %result.display(), "synthesized fallback recording");
            Ok(result)
        }
    }
}

async fn record_external(
    utility: &Path,
    format: AudioFormat,
    duration: Duration,
    out_path: &Path,
) -> Result<PathBuf> {
    let output = tokio::process::Command::new(utility)
        .arg("-q")
        .args(["-f", "S16_LE"])
        .args(["-c", &format.channels.to_string()])
        .args(["-r", &format.sample_rate.to_string()])
        .args(["-d", &duration.as_secs().to_string()])
        .arg(out_path)
        .output()
        .await
        .map_err(|e| Error::Capture(format!("failed to run {}: {e}", utility.display())))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Capture(format!(
            "{} exited with {}: {}",
            utility.display(),
            output.status,
            stderr.trim()
        )));
    }

    tracing::info!(path = %out_path.display(), "external capture complete");
    Ok(out_path.to_path_buf())
}
