//! Spatial audio: a listener, a distance model, and emitters whose gain and
//! pan follow their transform.
//!
//! There is no DSP here. The engine tracks playback state and computes the
//! per-source parameters a mixer would apply.

mod distance;
mod engine;

pub use distance::DistanceModel;
pub use engine::{
    AudioConfig, AudioEngine, AudioError, Listener, PlaybackMode, SoundAsset, SoundId, SourceId,
    SpatialParams, SpatialSource,
};
