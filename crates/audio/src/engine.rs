use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::distance::DistanceModel;

/// Errors from audio engine operations.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("invalid distance model: {0:?}")]
    InvalidDistanceModel(DistanceModel),
    #[error("unknown source {0:?}")]
    UnknownSource(SourceId),
    #[error("unknown sound {0:?}")]
    UnknownSound(SoundId),
    #[error("sound {0:?} has no duration")]
    EmptySound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(pub u64);

/// Point of audition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

/// One-time engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub distance_model: DistanceModel,
    pub listener: Listener,
}

/// A decoded sound, reduced to what playback bookkeeping needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundAsset {
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    OneShot,
    Looping,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Voice {
    sound: SoundId,
    mode: PlaybackMode,
    cursor: f32,
}

/// An emitter placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialSource {
    pub transform: Mat4,
    voice: Option<Voice>,
}

impl SpatialSource {
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    pub fn is_playing(&self) -> bool {
        self.voice.is_some()
    }

    /// Playback position in seconds, if playing.
    pub fn cursor(&self) -> Option<f32> {
        self.voice.map(|v| v.cursor)
    }
}

/// Per-source parameters for a mixer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialParams {
    pub distance: f32,
    /// Distance-model gain in `[0, 1]`; zero when the source is silent.
    pub gain: f32,
    /// -1 full left, 0 center, 1 full right.
    pub pan: f32,
}

impl SpatialParams {
    pub fn audible(&self) -> bool {
        self.gain > 0.0
    }
}

/// Headless spatial audio engine.
#[derive(Debug)]
pub struct AudioEngine {
    config: AudioConfig,
    sounds: BTreeMap<SoundId, SoundAsset>,
    sources: BTreeMap<SourceId, SpatialSource>,
    next_id: u64,
}

impl AudioEngine {
    pub fn new(config: AudioConfig) -> Result<Self, AudioError> {
        if !config.distance_model.is_valid() {
            return Err(AudioError::InvalidDistanceModel(config.distance_model));
        }
        tracing::info!(model = ?config.distance_model, "audio engine configured");
        Ok(Self {
            config,
            sounds: BTreeMap::new(),
            sources: BTreeMap::new(),
            next_id: 0,
        })
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn listener(&self) -> &Listener {
        &self.config.listener
    }

    pub fn set_listener(&mut self, listener: Listener) {
        self.config.listener = listener;
    }

    pub fn register_sound(&mut self, asset: SoundAsset) -> Result<SoundId, AudioError> {
        if !(asset.duration.is_finite() && asset.duration > 0.0) {
            return Err(AudioError::EmptySound(asset.name));
        }
        let id = SoundId(self.bump());
        tracing::debug!(name = %asset.name, duration = asset.duration, "sound registered");
        self.sounds.insert(id, asset);
        Ok(id)
    }

    pub fn add_source(&mut self, transform: Mat4) -> SourceId {
        let id = SourceId(self.bump());
        self.sources.insert(
            id,
            SpatialSource {
                transform,
                voice: None,
            },
        );
        id
    }

    pub fn source(&self, id: SourceId) -> Option<&SpatialSource> {
        self.sources.get(&id)
    }

    /// Start `sound` on `source` from the beginning, replacing anything playing.
    pub fn play(
        &mut self,
        source: SourceId,
        sound: SoundId,
        mode: PlaybackMode,
    ) -> Result<(), AudioError> {
        if !self.sounds.contains_key(&sound) {
            return Err(AudioError::UnknownSound(sound));
        }
        let src = self.source_mut(source)?;
        src.voice = Some(Voice {
            sound,
            mode,
            cursor: 0.0,
        });
        tracing::debug!(?source, ?sound, ?mode, "playback started");
        Ok(())
    }

    pub fn stop(&mut self, source: SourceId) -> Result<(), AudioError> {
        self.source_mut(source)?.voice = None;
        Ok(())
    }

    pub fn set_source_transform(
        &mut self,
        source: SourceId,
        transform: Mat4,
    ) -> Result<(), AudioError> {
        self.source_mut(source)?.transform = transform;
        Ok(())
    }

    /// Advance every voice by `dt` seconds. Looping voices wrap, one-shots end.
    pub fn advance(&mut self, dt: f32) {
        for (id, src) in self.sources.iter_mut() {
            let Some(voice) = src.voice.as_mut() else {
                continue;
            };
            let Some(sound) = self.sounds.get(&voice.sound) else {
                src.voice = None;
                continue;
            };
            voice.cursor += dt;
            if voice.cursor < sound.duration {
                continue;
            }
            if voice.mode == PlaybackMode::Looping {
                voice.cursor %= sound.duration;
            } else {
                tracing::trace!(?id, "one-shot finished");
                src.voice = None;
            }
        }
    }

    /// Gain and pan of `source` relative to the listener. Silent sources
    /// report zero gain.
    pub fn spatialize(&self, source: SourceId) -> Result<SpatialParams, AudioError> {
        let src = self
            .sources
            .get(&source)
            .ok_or(AudioError::UnknownSource(source))?;
        let listener = &self.config.listener;
        let to_source = src.position() - listener.position;
        let distance = to_source.length();

        let gain = if src.is_playing() {
            self.config.distance_model.gain(distance)
        } else {
            0.0
        };

        let pan = if distance < f32::EPSILON {
            0.0
        } else {
            let right = listener.forward.cross(listener.up).normalize_or_zero();
            to_source.normalize().dot(right).clamp(-1.0, 1.0)
        };

        Ok(SpatialParams {
            distance,
            gain,
            pan,
        })
    }

    fn source_mut(&mut self, id: SourceId) -> Result<&mut SpatialSource, AudioError> {
        self.sources.get_mut(&id).ok_or(AudioError::UnknownSource(id))
    }

    fn bump(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> AudioEngine {
        AudioEngine::new(AudioConfig::default()).unwrap()
    }

    fn looping(engine: &mut AudioEngine, at: Vec3) -> SourceId {
        let sound = engine
            .register_sound(SoundAsset {
                name: "engine_hum".into(),
                duration: 2.0,
            })
            .unwrap();
        let src = engine.add_source(Mat4::from_translation(at));
        engine.play(src, sound, PlaybackMode::Looping).unwrap();
        src
    }

    #[test]
    fn rejects_invalid_cutoff() {
        let cfg = AudioConfig {
            distance_model: DistanceModel::Cutoff { radius: -1.0 },
            ..AudioConfig::default()
        };
        assert!(matches!(
            AudioEngine::new(cfg),
            Err(AudioError::InvalidDistanceModel(_))
        ));
    }

    #[test]
    fn rejects_empty_sound() {
        let mut e = engine();
        let err = e
            .register_sound(SoundAsset {
                name: "silence".into(),
                duration: 0.0,
            })
            .unwrap_err();
        assert!(matches!(err, AudioError::EmptySound(_)));
    }

    #[test]
    fn source_to_the_right_pans_right() {
        let mut e = engine();
        let src = looping(&mut e, Vec3::new(5.0, 0.0, 0.0));
        let p = e.spatialize(src).unwrap();
        assert_relative_eq!(p.pan, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.distance, 5.0);
        assert_relative_eq!(p.gain, 0.2);
    }

    #[test]
    fn source_beyond_cutoff_is_silent() {
        let mut e = engine();
        let src = looping(&mut e, Vec3::new(0.0, 0.0, 12.0));
        assert!(!e.spatialize(src).unwrap().audible());
    }

    #[test]
    fn moving_source_follows_transform() {
        let mut e = engine();
        let src = looping(&mut e, Vec3::new(20.0, 0.0, 0.0));
        assert!(!e.spatialize(src).unwrap().audible());

        e.set_source_transform(src, Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0)))
            .unwrap();
        let p = e.spatialize(src).unwrap();
        assert!(p.audible());
        assert!(p.pan < -0.5);
    }

    #[test]
    fn stopped_source_reports_zero_gain() {
        let mut e = engine();
        let src = looping(&mut e, Vec3::new(1.0, 0.0, 0.0));
        e.stop(src).unwrap();
        assert_eq!(e.spatialize(src).unwrap().gain, 0.0);
    }

    #[test]
    fn looping_wraps_one_shot_ends() {
        let mut e = engine();
        let sound = e
            .register_sound(SoundAsset {
                name: "blip".into(),
                duration: 1.0,
            })
            .unwrap();
        let a = e.add_source(Mat4::IDENTITY);
        let b = e.add_source(Mat4::IDENTITY);
        e.play(a, sound, PlaybackMode::Looping).unwrap();
        e.play(b, sound, PlaybackMode::OneShot).unwrap();

        e.advance(1.5);
        assert_relative_eq!(e.source(a).unwrap().cursor().unwrap(), 0.5);
        assert!(!e.source(b).unwrap().is_playing());
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut e = engine();
        assert!(matches!(
            e.spatialize(SourceId(99)),
            Err(AudioError::UnknownSource(_))
        ));
        let src = e.add_source(Mat4::IDENTITY);
        assert!(matches!(
            e.play(src, SoundId(99), PlaybackMode::Looping),
            Err(AudioError::UnknownSound(_))
        ));
    }
}
