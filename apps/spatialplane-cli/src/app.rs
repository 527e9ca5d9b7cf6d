use anyhow::Context;
use glam::{Mat4, Vec2};
use spatialplane_assets::{AssetStore, SceneAsset};
use spatialplane_audio::{AudioEngine, PlaybackMode, SoundAsset, SourceId, SpatialParams};
use spatialplane_common::NodeId;
use spatialplane_input::{Action, Joystick, JoystickReceiver, JoystickShape, joystick_channel};
use spatialplane_kernel::{Highlighter, Scene, SceneRig};
use spatialplane_motion::{MotionUpdate, TransformUpdater};
use spatialplane_render::{DebugTextRenderer, Renderer, ViewCamera, Viewport, hit_test};

use crate::config::AppConfig;

/// Name of the node the joystick steers.
pub const SHIP: &str = "ship";

/// The demo, headless: one scene with a steerable ship, an audio source
/// riding on it, and tap highlighting.
///
/// Everything runs on the caller's thread. Joystick vectors travel over a
/// channel and are applied in order the next time the app handles an action.
pub struct App {
    scene: Scene,
    rig: SceneRig,
    ship: NodeId,
    highlighter: Highlighter,
    updater: TransformUpdater,
    joystick: Joystick,
    input: JoystickReceiver,
    audio: AudioEngine,
    source: SourceId,
    viewport: Viewport,
    renderer: DebugTextRenderer,
}

impl App {
    /// Load assets, build the scene and configure audio. Any missing asset,
    /// missing `ship` node or invalid audio setting fails here.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let mut store = AssetStore::new();
        let asset = match &config.scene_path {
            Some(path) => {
                let id = store
                    .load_scene(path)
                    .with_context(|| format!("loading scene {}", path.display()))?;
                store
                    .scene(id)
                    .cloned()
                    .context("scene vanished from the asset store")?
            }
            None => SceneAsset::builtin_ship(),
        };
        asset.require(SHIP)?;

        let mut scene = Scene::new();
        let rig = SceneRig::install(&mut scene);
        asset.instantiate(&mut scene)?;
        let ship = scene.require_node(SHIP)?;

        let mut audio = AudioEngine::new(config.audio()).context("configuring audio")?;
        let ship_local = scene
            .node(ship)
            .map(|n| n.transform)
            .context("ship node disappeared")?;
        let parent = parent_world(&scene, ship)?;
        let source = audio.add_source(source_pose(parent, ship_local, config.orient_audio));
        if let Some(path) = &config.sound_path {
            let id = store
                .load_sound(path)
                .with_context(|| format!("loading sound {}", path.display()))?;
            let info = store.sound(id).context("sound vanished from the asset store")?;
            let sound = audio.register_sound(SoundAsset {
                name: info.name.clone(),
                duration: info.duration,
            })?;
            audio.play(source, sound, PlaybackMode::Looping)?;
        }

        let (tx, rx) = joystick_channel();
        let joystick = Joystick::new(config.joystick_diameter, JoystickShape::Circle)
            .with_locks_in_place(true)
            .with_sender(tx);

        tracing::info!(
            nodes = scene.node_count(),
            assets = store.len(),
            "scene ready"
        );

        Ok(Self {
            scene,
            rig,
            ship,
            highlighter: Highlighter::new(),
            updater: TransformUpdater::new(config.updater()),
            joystick,
            input: rx,
            audio,
            source,
            viewport: config.viewport(),
            renderer: DebugTextRenderer::new().with_statistics(config.show_statistics),
        })
    }

    /// Apply one action, then every joystick vector it produced.
    pub fn handle(&mut self, action: Action) -> anyhow::Result<()> {
        match action {
            Action::Steer(offset) => {
                self.joystick.drag(offset);
            }
            Action::Release => self.joystick.release(),
            Action::Tap(point) => {
                self.tap(point)?;
            }
            Action::Wait(dt) => {
                self.highlighter.advance(&mut self.scene, dt)?;
                self.audio.advance(dt);
            }
        }
        self.drain_input()?;
        Ok(())
    }

    /// Handle a whole script in order.
    pub fn run(&mut self, actions: impl IntoIterator<Item = Action>) -> anyhow::Result<()> {
        let span = tracing::info_span!("script");
        let _enter = span.enter();
        let mut count = 0usize;
        for action in actions {
            self.handle(action)
                .with_context(|| format!("action {count} ({action:?})"))?;
            count += 1;
        }
        tracing::info!(actions = count, "script finished");
        Ok(())
    }

    /// Apply a joystick vector directly, bypassing the on-screen joystick.
    pub fn steer(&mut self, xy: Vec2) -> anyhow::Result<MotionUpdate> {
        let current = self
            .scene
            .node(self.ship)
            .map(|n| n.transform)
            .context("ship node disappeared")?;
        let update = self.updater.update(&current, xy);
        self.scene.set_transform(self.ship, update.transform)?;
        let parent = parent_world(&self.scene, self.ship)?;
        let pose = source_pose(
            parent,
            update.audio_transform,
            self.updater.config().orient_audio,
        );
        self.audio.set_source_transform(self.source, pose)?;
        Ok(update)
    }

    fn drain_input(&mut self) -> anyhow::Result<()> {
        let pending: Vec<Vec2> = self.input.try_iter().collect();
        for xy in pending {
            self.steer(xy)?;
        }
        Ok(())
    }

    /// Hit-test a screen point and highlight the nearest node. Returns the
    /// highlighted node, if any.
    pub fn tap(&mut self, point: Vec2) -> anyhow::Result<Option<NodeId>> {
        let camera = self.camera()?;
        let hits = hit_test(&self.scene, &camera, point, self.viewport)?;
        let Some(first) = hits.first() else {
            tracing::debug!(x = point.x, y = point.y, "tap missed");
            return Ok(None);
        };
        self.highlighter.start(&self.scene, first.node)?;
        Ok(Some(first.node))
    }

    pub fn camera(&self) -> anyhow::Result<ViewCamera> {
        Ok(ViewCamera::from_node(&self.scene, self.rig.camera)?)
    }

    /// Text frame of the current scene.
    pub fn frame(&self) -> anyhow::Result<String> {
        Ok(self.renderer.render(&self.scene, &self.camera()?))
    }

    pub fn spatialize(&self) -> anyhow::Result<SpatialParams> {
        Ok(self.audio.spatialize(self.source)?)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ship(&self) -> NodeId {
        self.ship
    }

    pub fn ship_transform(&self) -> Mat4 {
        self.scene
            .node(self.ship)
            .map(|n| n.transform)
            .unwrap_or(Mat4::IDENTITY)
    }

    pub fn audio(&self) -> &AudioEngine {
        &self.audio
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Scene-space transform of `id`'s parent.
fn parent_world(scene: &Scene, id: NodeId) -> anyhow::Result<Mat4> {
    match scene.node(id).and_then(|n| n.parent()) {
        Some(parent) => Ok(scene.world_transform(parent)?),
        None => Ok(Mat4::IDENTITY),
    }
}

/// Lift a ship-local audio transform into scene space. Without `orient` only
/// the translation survives.
fn source_pose(parent: Mat4, local: Mat4, orient: bool) -> Mat4 {
    let world = parent * local;
    if orient {
        world
    } else {
        Mat4::from_translation(world.w_axis.truncate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spatialplane_common::Color;
    use std::f32::consts::FRAC_PI_2;

    fn app() -> App {
        App::new(&AppConfig::default()).unwrap()
    }

    fn emission(app: &App, name: &str) -> Color {
        let id = app.scene().find_node(name).unwrap();
        app.scene()
            .node(id)
            .unwrap()
            .geometry
            .as_ref()
            .unwrap()
            .material
            .emission
    }

    #[test]
    fn builtin_scene_has_ship_at_origin() {
        let app = app();
        assert_eq!(app.ship_transform(), Mat4::IDENTITY);
        assert_eq!(app.audio().source(app.source()).unwrap().position(), glam::Vec3::ZERO);
    }

    #[test]
    fn steer_moves_ship_and_audio_source() {
        let mut app = app();
        app.handle(Action::Steer(Vec2::new(50.0, 0.0))).unwrap();

        let t = app.ship_transform();
        assert_relative_eq!(t.w_axis.x, 5.0);
        assert_relative_eq!(t.w_axis.z, 0.0);
        assert_relative_eq!(spatialplane_motion::heading_of(&t), FRAC_PI_2, epsilon = 1e-6);

        let audio = app.audio().source(app.source()).unwrap().transform;
        assert_eq!(audio, Mat4::from_translation(glam::Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn steer_is_clamped_by_the_joystick() {
        let mut app = app();
        app.handle(Action::Steer(Vec2::new(300.0, 0.0))).unwrap();
        // Radius 75 points at scale 10.
        assert_relative_eq!(app.ship_transform().w_axis.x, 7.5);
    }

    #[test]
    fn release_returns_ship_to_origin() {
        let mut app = app();
        app.handle(Action::Steer(Vec2::new(0.0, 40.0))).unwrap();
        app.handle(Action::Release).unwrap();
        let t = app.ship_transform();
        assert_eq!(t.w_axis.truncate(), glam::Vec3::ZERO);
    }

    #[test]
    fn tap_on_ship_highlights_then_reverts() {
        let mut app = app();
        let center = app.viewport().center();
        let hit = app.tap(center).unwrap();
        assert_eq!(hit, app.scene().find_node("shipMesh"));

        app.handle(Action::Wait(0.5)).unwrap();
        assert_eq!(emission(&app, "shipMesh"), Color::RED);
        app.handle(Action::Wait(0.5)).unwrap();
        assert_eq!(emission(&app, "shipMesh"), Color::BLACK);
        assert_eq!(app.highlighter().active_count(), 0);
    }

    #[test]
    fn tap_on_empty_space_does_nothing() {
        let mut app = app();
        assert_eq!(app.tap(Vec2::new(5.0, 5.0)).unwrap(), None);
        assert_eq!(app.highlighter().active_count(), 0);
    }

    #[test]
    fn missing_scene_file_fails_at_startup() {
        let config = AppConfig {
            scene_path: Some("/no/such/ship.scene.json".into()),
            ..AppConfig::default()
        };
        assert!(App::new(&config).is_err());
    }

    #[test]
    fn invalid_cutoff_radius_fails_at_startup() {
        let config = AppConfig {
            cutoff_radius: 0.0,
            ..AppConfig::default()
        };
        assert!(App::new(&config).is_err());
    }

    #[test]
    fn zero_input_scale_fails_at_startup() {
        let config = AppConfig {
            input_scale: spatialplane_motion::JoystickScale(0.0),
            ..AppConfig::default()
        };
        let err = App::new(&config).err().unwrap();
        assert!(err.to_string().contains("input_scale"));
    }

    #[test]
    fn tap_action_starts_highlight() {
        let mut app = app();
        let center = app.viewport().center();
        app.handle(Action::Tap(center)).unwrap();
        let mesh = app.scene().find_node("shipMesh").unwrap();
        assert!(app.highlighter().is_active(mesh));

        app.handle(Action::Tap(Vec2::new(5.0, 5.0))).unwrap();
        assert_eq!(app.highlighter().active_count(), 1);
    }

    #[test]
    fn source_pose_keeps_parent_offset() {
        let parent = Mat4::from_translation(glam::Vec3::new(0.0, 0.0, 5.0));
        let local = Mat4::from_translation(glam::Vec3::new(2.0, 0.0, 0.0))
            * Mat4::from_rotation_y(FRAC_PI_2);
        let flat = source_pose(parent, local, false);
        assert_eq!(flat, Mat4::from_translation(glam::Vec3::new(2.0, 0.0, 5.0)));
        assert_eq!(source_pose(parent, local, true), parent * local);
    }

    #[test]
    fn frame_lists_the_ship() {
        let app = app();
        let frame = app.frame().unwrap();
        assert!(frame.contains("ship ["));
        assert!(frame.contains("-- nodes:"));
    }
}
