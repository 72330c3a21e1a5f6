use std::io::Cursor;

use lofty::{AudioFile, FileType, Probe};

use crate::error::{Error, Result};

/// Audio containers accepted for upload.
pub fn file_type_for(extension: &str) -> Result<FileType> {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => Ok(FileType::Mpeg),
        "wav" => Ok(FileType::Wav),
        "aac" => Ok(FileType::Aac),
        "m4a" => Ok(FileType::Mp4),
        other => Err(Error::UnsupportedAudioFormat {
            extension: other.to_string(),
        }),
    }
}

/// Duration in seconds of an in-memory audio file.
pub fn audio_duration(bytes: &[u8], extension: &str) -> Result<f64> {
    let file_type = file_type_for(extension)?;

    let tagged_file = Probe::new(Cursor::new(bytes))
        .set_file_type(file_type)
        .read()?;

    let duration = tagged_file.properties().duration().as_secs_f64();
    if duration <= 0.0 {
        return Err(Error::AudioMetadata(
            "Unable to read audio duration".to_string(),
        ));
    }

    Ok(duration)
}

/// Same as [`audio_duration`], off the async runtime.
pub async fn audio_duration_blocking(bytes: Vec<u8>, extension: String) -> Result<f64> {
    tokio::task::spawn_blocking(move || audio_duration(&bytes, &extension))
        .await
        .map_err(|e| Error::AudioMetadata(e.to_string()))?
}
