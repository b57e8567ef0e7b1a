use clap::{Parser, Subcommand};
use glam::Vec2;
use spincube_input::{InputState, Key};
use spincube_render::{DebugTextRenderer, NagaBackend, Renderer, ShaderProgramBuilder};
use spincube_scene::{Scene, SceneConfig, config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spincube-cli", about = "Headless tools for the spincube demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compile and link a shader pair without a GPU
    CheckShaders {
        #[arg(long, default_value = "assets/shaders/vertex.wgsl")]
        vertex: PathBuf,
        #[arg(long, default_value = "assets/shaders/fragment.wgsl")]
        fragment: PathBuf,
    },
    /// Step the scene headlessly with scripted input
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.0166667")]
        dt: f32,
        /// Hold W (forward) for the whole run
        #[arg(long)]
        forward: bool,
        /// Hold D (strafe right) for the whole run
        #[arg(long)]
        strafe: bool,
        /// Horizontal cursor travel per frame, in pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        look_x: f32,
        /// Scene config JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print one JSON snapshot per frame instead of text
        #[arg(long)]
        json: bool,
    },
}

struct Script {
    frames: u64,
    dt: f32,
    forward: bool,
    strafe: bool,
    look_x: f32,
}

/// Run the scripted frames, calling `emit` after each one.
fn simulate(
    scene: &mut Scene,
    sensitivity: f32,
    script: &Script,
    mut emit: impl FnMut(&Scene, u64),
) {
    let mut input = InputState::new();
    input.set_key(Key::Forward, script.forward);
    input.set_key(Key::Right, script.strafe);
    for frame in 1..=script.frames {
        input.record_motion(Vec2::new(script.look_x, 0.0));
        let intent = input.take_frame_intent(sensitivity);
        scene.advance(intent.movement, intent.spin, script.dt);
        emit(scene, frame);
    }
    tracing::debug!(frames = script.frames, "simulation finished");
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("spincube-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", spincube_render::crate_info());
            let scene = Scene::demo();
            println!("demo scene:\n{}", DebugTextRenderer::new().render(&scene, 0));
        }
        Commands::CheckShaders { vertex, fragment } => {
            let build = ShaderProgramBuilder::new(&vertex, &fragment)
                .with_label("check")
                .build(&mut NagaBackend::new());
            if build.is_clean() {
                println!(
                    "OK: {} + {} ({} -> {})",
                    vertex.display(),
                    fragment.display(),
                    build.program.vertex_entry.as_deref().unwrap_or("?"),
                    build.program.fragment_entry.as_deref().unwrap_or("?"),
                );
            } else {
                for diag in &build.diagnostics {
                    eprintln!("{diag}");
                }
                anyhow::bail!("{} shader problem(s) found", build.diagnostics.len());
            }
        }
        Commands::Simulate {
            frames,
            dt,
            forward,
            strafe,
            look_x,
            config: config_path,
            json,
        } => {
            let scene_config: SceneConfig = match config_path {
                Some(path) => config::load_json(path)?,
                None => SceneConfig::default(),
            };
            let mut scene = Scene::from_config(&scene_config);
            let script = Script {
                frames,
                dt,
                forward,
                strafe,
                look_x,
            };
            let renderer = DebugTextRenderer::new();
            let sensitivity = scene_config.camera.look_sensitivity;
            let mut result = Ok(());
            simulate(&mut scene, sensitivity, &script, |scene, frame| {
                if json {
                    match serde_json::to_string(&scene.snapshot(frame)) {
                        Ok(line) => println!("{line}"),
                        Err(e) => result = Err(e),
                    }
                } else if frame == script.frames {
                    print!("{}", renderer.render(scene, frame));
                }
            });
            result?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn script(frames: u64) -> Script {
        Script {
            frames,
            dt: 0.5,
            forward: false,
            strafe: false,
            look_x: 0.0,
        }
    }

    #[test]
    fn idle_run_only_spins_cube() {
        let mut scene = Scene::demo();
        let mut seen = Vec::new();
        simulate(&mut scene, 0.1, &script(4), |_, frame| seen.push(frame));
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(scene.camera.position(), Vec3::new(0.0, 0.0, 1.0));
        assert!((scene.cube.transform().orientation().y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn holding_forward_walks_along_x() {
        let mut scene = Scene::demo();
        let mut s = script(10);
        s.forward = true;
        simulate(&mut scene, 0.1, &s, |_, _| {});
        assert!((scene.camera.position().x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn look_travel_turns_left_for_negative_x() {
        let mut scene = Scene::demo();
        let mut s = script(9);
        s.look_x = -100.0;
        simulate(&mut scene, 0.1, &s, |_, _| {});
        assert!((scene.camera.orientation().z - 90.0).abs() < 1e-3);
    }

    #[test]
    fn cli_parses_simulate_flags() {
        let cli = Cli::parse_from([
            "spincube-cli",
            "simulate",
            "--frames",
            "3",
            "--forward",
            "--look-x",
            "-4",
            "--json",
        ]);
        match cli.command {
            Commands::Simulate {
                frames,
                forward,
                look_x,
                json,
                ..
            } => {
                assert_eq!(frames, 3);
                assert!(forward);
                assert_eq!(look_x, -4.0);
                assert!(json);
            }
            _ => panic!("expected simulate"),
        }
    }
}
