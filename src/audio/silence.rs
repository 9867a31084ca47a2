//! Silent WAV synthesis
//!
//! Used as the capture fallback when no recording utility is available, and
//! by the mock backend to serve placeholder TTS audio. Keeps the rest of the
//! pipeline exercisable on machines without recording hardware.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use hound::WavWriter;

use crate::audio::AudioFormat;
use crate::error::{Error, Result};

/// Write a silent WAV file of the given duration to `path`
pub fn write_silence(path: &Path, format: AudioFormat, duration: Duration) -> Result<()> {
    let mut writer = WavWriter::create(path, format.wav_spec())
        .map_err(|e| Error::Capture(format!("failed to create fallback wav: {e}")))?;
    write_samples(&mut writer, format, duration)?;
    writer
        .finalize()
        .map_err(|e| Error::Capture(format!("failed to finalize fallback wav: {e}")))
}

/// Produce a silent WAV of the given duration as in-memory bytes
pub fn silent_wav_bytes(format: AudioFormat, duration: Duration) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, format.wav_spec())
            .map_err(|e| Error::Capture(format!("failed to create wav writer: {e}")))?;
        write_samples(&mut writer, format, duration)?;
        writer
            .finalize()
            .map_err(|e| Error::Capture(format!("failed to finalize wav: {e}")))?;
    }
    Ok(cursor.into_inner())
}

fn write_samples<W: std::io::Write + std::io::Seek>(
    writer: &mut WavWriter<W>,
    format: AudioFormat,
    duration: Duration,
) -> Result<()> {
    for _ in 0..format.samples_for_duration(duration.as_secs_f32()) {
        writer
            .write_sample(0i16)
            .map_err(|e| Error::Capture(format!("failed to write sample: {e}")))?;
    }
    Ok(())
}
