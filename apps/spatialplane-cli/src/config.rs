use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use spatialplane_audio::{AudioConfig, DistanceModel, Listener};
use spatialplane_input::Joystick;
use spatialplane_motion::{JoystickScale, UpdaterConfig, ZeroDelta};
use spatialplane_render::Viewport;

/// Everything the app reads at startup. Every field has a default, so an
/// empty YAML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scene description to load. The built-in ship is used when unset.
    pub scene_path: Option<PathBuf>,
    /// WAV file looped on the ship's audio source. Silent when unset.
    pub sound_path: Option<PathBuf>,
    pub input_scale: JoystickScale,
    pub zero_delta: ZeroDelta,
    pub orient_audio: bool,
    pub cutoff_radius: f32,
    pub joystick_diameter: f32,
    /// Scene view size in points, `[width, height]`.
    pub viewport: [f32; 2],
    pub show_statistics: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            scene_path: None,
            sound_path: None,
            input_scale: JoystickScale::default(),
            zero_delta: ZeroDelta::default(),
            orient_audio: false,
            cutoff_radius: 10.0,
            joystick_diameter: Joystick::DEFAULT_DIAMETER,
            viewport: [viewport.width, viewport.height],
            show_statistics: true,
        }
    }
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(text).context("malformed config")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Reject values that would put non-finite transforms into the scene.
    /// The cutoff radius is checked by the audio engine.
    pub fn validate(&self) -> anyhow::Result<()> {
        let scale = self.input_scale.0;
        ensure!(
            scale.is_finite() && scale > 0.0,
            "input_scale must be a positive number, got {scale}"
        );
        let diameter = self.joystick_diameter;
        ensure!(
            diameter.is_finite() && diameter > 0.0,
            "joystick_diameter must be a positive number, got {diameter}"
        );
        let [width, height] = self.viewport;
        ensure!(
            width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
            "viewport must be positive, got [{width}, {height}]"
        );
        Ok(())
    }

    pub fn updater(&self) -> UpdaterConfig {
        UpdaterConfig {
            scale: self.input_scale,
            zero_delta: self.zero_delta,
            orient_audio: self.orient_audio,
        }
    }

    pub fn audio(&self) -> AudioConfig {
        AudioConfig {
            distance_model: DistanceModel::Cutoff {
                radius: self.cutoff_radius,
            },
            listener: Listener::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport[0], self.viewport[1])
    }
}
