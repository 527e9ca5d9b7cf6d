//! Asset loading: scene descriptions and sound files, indexed by content hash.
//!
//! Every failure to find or parse an asset is an [`AssetError`]; callers load
//! everything once at startup and stop there if anything is missing.

mod scene_asset;
mod sound;

pub use scene_asset::{GeometryDesc, MaterialDesc, NodeDesc, SceneAsset};
pub use sound::{SoundInfo, probe_wav};

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Content-addressed asset ID computed from the asset bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset {path} could not be read: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scene: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed scene: {0}")]
    InvalidScene(String),
    #[error("scene has no node named {0:?}")]
    MissingNode(String),
    #[error("unsupported sound file: {0}")]
    UnsupportedSound(String),
    #[error(transparent)]
    Scene(#[from] spatialplane_kernel::SceneError),
}

/// Registry of loaded assets.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    scenes: BTreeMap<AssetId, SceneAsset>,
    sounds: BTreeMap<AssetId, SoundInfo>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read, parse and register a scene description. Loading the same bytes
    /// twice yields the same id.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> Result<AssetId, AssetError> {
        let bytes = read(path.as_ref())?;
        let asset = SceneAsset::from_slice(&bytes)?;
        let id = AssetId::of(&bytes);
        tracing::info!(
            path = %path.as_ref().display(),
            nodes = asset.node_count(),
            "scene asset loaded"
        );
        Ok(self.register_scene(id, asset))
    }

    pub fn register_scene(&mut self, id: AssetId, asset: SceneAsset) -> AssetId {
        self.scenes.insert(id, asset);
        id
    }

    /// Read, probe and register a sound file.
    pub fn load_sound(&mut self, path: impl AsRef<Path>) -> Result<AssetId, AssetError> {
        let path = path.as_ref();
        let bytes = read(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sound")
            .to_string();
        let info = SoundInfo {
            name,
            duration: probe_wav(&bytes)?,
        };
        let id = AssetId::of(&bytes);
        tracing::info!(path = %path.display(), duration = info.duration, "sound asset loaded");
        self.sounds.insert(id, info);
        Ok(id)
    }

    pub fn scene(&self, id: AssetId) -> Option<&SceneAsset> {
        self.scenes.get(&id)
    }

    pub fn sound(&self, id: AssetId) -> Option<&SoundInfo> {
        self.sounds.get(&id)
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.scenes.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Missing {
        path: path.to_path_buf(),
        source,
    })
}
