use std::io::Cursor;

use crate::AssetError;

/// What the audio engine needs to know about a sound file.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundInfo {
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

/// Read the duration of a WAVE file from its header.
pub fn probe_wav(bytes: &[u8]) -> Result<f32, AssetError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| AssetError::UnsupportedSound(e.to_string()))?;
    let rate = reader.spec().sample_rate;
    if rate == 0 {
        return Err(AssetError::UnsupportedSound("zero sample rate".into()));
    }
    Ok(reader.duration() as f32 / rate as f32)
}
