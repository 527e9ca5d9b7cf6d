use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glam::Vec2;
use spatialplane_cli::{App, AppConfig, load_script, parse_vec2};
use spatialplane_input::Action;
use spatialplane_kernel::highlight::HIGHLIGHT_FADE;
use spatialplane_motion::{JoystickScale, ZeroDelta};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "spatialplane-cli",
    about = "Steer the ship with scripted joystick input"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene description, overriding the config
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Looping WAV for the ship's audio source, overriding the config
    #[arg(long)]
    sound: Option<PathBuf>,

    /// Joystick points per world unit
    #[arg(long)]
    scale: Option<f32>,

    /// Keep the previous heading when the input does not move the ship
    #[arg(long)]
    hold_heading: bool,

    /// Orient the audio source with the ship instead of translating it only
    #[arg(long)]
    orient_audio: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the loaded scene
    Info,
    /// Run joystick input through the scene and print the final frame
    Run {
        /// YAML list of actions
        #[arg(short, long, conflicts_with = "steer")]
        script: Option<PathBuf>,
        /// Joystick offsets as x,y; each one is applied in turn
        #[arg(long, value_parser = parse_vec2, num_args = 1.., allow_hyphen_values = true)]
        steer: Vec<Vec2>,
    },
    /// Tap the scene view and follow the highlight to completion
    Tap { x: f32, y: f32 },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if cli.scene.is_some() {
        config.scene_path = cli.scene.clone();
    }
    if cli.sound.is_some() {
        config.sound_path = cli.sound.clone();
    }
    if let Some(scale) = cli.scale {
        config.input_scale = JoystickScale(scale);
    }
    if cli.hold_heading {
        config.zero_delta = ZeroDelta::Hold;
    }
    if cli.orient_audio {
        config.orient_audio = true;
    }

    let mut app = App::new(&config)?;

    match cli.command {
        Commands::Info => {
            println!("spatialplane-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "scene: {}",
                config
                    .scene_path
                    .as_ref()
                    .map_or("<builtin ship>".to_string(), |p| p.display().to_string())
            );
            println!("scale: {} points per unit", config.input_scale.0);
            println!("cutoff radius: {}", config.cutoff_radius);
            print!("{}", app.frame()?);
        }
        Commands::Run { script, steer } => {
            let actions = match script {
                Some(path) => load_script(&path)?,
                None => steer.into_iter().map(Action::Steer).collect(),
            };
            println!("Running {} actions", actions.len());
            app.run(actions)?;

            let t = app.ship_transform();
            println!(
                "ship: pos=({:.2}, {:.2}, {:.2}) heading={:.3}",
                t.w_axis.x,
                t.w_axis.y,
                t.w_axis.z,
                spatialplane_motion::heading_of(&t)
            );
            let params = app.spatialize()?;
            println!(
                "audio: distance={:.2} gain={:.3} pan={:.2}",
                params.distance, params.gain, params.pan
            );
            print!("{}", app.frame()?);
        }
        Commands::Tap { x, y } => {
            let Some(id) = app.tap(Vec2::new(x, y))? else {
                println!("Tap at ({x}, {y}) hit nothing");
                return Ok(());
            };
            let name = app
                .scene()
                .node(id)
                .and_then(|n| n.name.clone())
                .unwrap_or_else(|| id.short());
            println!("Tap at ({x}, {y}) hit {name}");
            for step in 1..=2 {
                app.handle(Action::Wait(HIGHLIGHT_FADE))?;
                let emission = app
                    .scene()
                    .node(id)
                    .and_then(|n| n.geometry.as_ref())
                    .map(|g| g.material.emission.0)
                    .unwrap_or_default();
                println!(
                    "t={:.1}s emission=({:.2}, {:.2}, {:.2})",
                    step as f32 * HIGHLIGHT_FADE,
                    emission[0],
                    emission[1],
                    emission[2]
                );
            }
        }
    }

    Ok(())
}
