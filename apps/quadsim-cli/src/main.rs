use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quadsim_common::{ControlInputs, RotationOrder};
use quadsim_input::{ConstantInput, InputSource};
use quadsim_kernel::{InputFrame, ManualClock, Preset, SimConfig, Simulation, TimeSource};
use quadsim_render::{ChaseCamera, DebugTextRenderer, Renderer, SceneAdapter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quadsim-cli", about = "Headless quadrotor flight runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, presets and rotation orders
    Info,
    /// Fly one vehicle from constant stick inputs
    Fly {
        /// YAML or JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Flight preset; replaces the config file's flight section
        #[arg(short, long)]
        preset: Option<Preset>,
        /// Euler rotation order
        #[arg(long)]
        order: Option<RotationOrder>,
        /// Simulated seconds
        #[arg(short, long, default_value = "3")]
        seconds: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        throttle: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        roll: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        yaw: f32,
        /// Render frames per second fed to the fixed-timestep clock
        #[arg(long, default_value = "60")]
        frame_rate: f32,
        /// Print a frame every N render frames
        #[arg(long, default_value = "30")]
        print_every: u64,
    },
    /// Hold the hover throttle and report the drift
    Hover {
        #[arg(short, long, default_value = "damped")]
        preset: Preset,
        #[arg(short, long, default_value = "5")]
        seconds: f32,
    },
    /// Print a preset as a config file
    Preset {
        name: Preset,
        /// Emit JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}

struct FlyArgs {
    config: Option<PathBuf>,
    preset: Option<Preset>,
    order: Option<RotationOrder>,
    seconds: f32,
    inputs: ControlInputs,
    frame_rate: f32,
    print_every: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => info(),
        Commands::Fly {
            config,
            preset,
            order,
            seconds,
            throttle,
            roll,
            pitch,
            yaw,
            frame_rate,
            print_every,
        } => fly(FlyArgs {
            config,
            preset,
            order,
            seconds,
            inputs: ControlInputs::new(throttle, roll, pitch, yaw),
            frame_rate,
            print_every,
        })?,
        Commands::Hover { preset, seconds } => hover(preset, seconds)?,
        Commands::Preset { name, json } => {
            let config = SimConfig {
                flight: name.config(),
                ..SimConfig::default()
            };
            let text = if json {
                config.to_json_string()?
            } else {
                config.to_yaml_string()?
            };
            println!("{text}");
        }
    }

    Ok(())
}

fn info() {
    println!("quadsim-cli v{}", env!("CARGO_PKG_VERSION"));
    for preset in Preset::ALL {
        let config = preset.config();
        let hover = config
            .tuning
            .hover_throttle()
            .map_or_else(|| "none".to_string(), |t| format!("{t:.3}"));
        println!(
            "preset {}: strategy={:?} rotors={:?} hover_throttle={hover}",
            preset.name(),
            config.strategy,
            config.rotor_speed
        );
    }
    let orders: Vec<&str> = RotationOrder::ALL.iter().map(|o| o.as_str()).collect();
    println!("rotation orders: {}", orders.join(", "));
}

fn fly(args: FlyArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.frame_rate.is_finite() && args.frame_rate > 0.0,
        "frame rate must be positive, got {}",
        args.frame_rate
    );
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "seconds must be non-negative, got {}",
        args.seconds
    );

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(preset) = args.preset {
        config.flight = preset.config();
    }
    if let Some(order) = args.order {
        config.flight.rotation_order = order;
    }

    let mut sim = Simulation::with_clock(config.clock)?;
    let id = sim.spawn(config.flight, config.rotors)?;
    let mut source = ConstantInput(args.inputs);
    let mut clock = ManualClock::from_rate(args.frame_rate);
    let camera = ChaseCamera::default();
    let renderer = DebugTextRenderer::new();
    let frames = (args.seconds * args.frame_rate).round() as u64;
    let print_every = args.print_every.max(1);

    tracing::info!(
        vehicle = %id.short(),
        frames,
        strategy = ?config.flight.strategy,
        "flight start"
    );

    for frame in 1..=frames {
        let dt = clock.frame_delta();
        let inputs = InputFrame::from([(id, source.sample(dt))]);
        sim.step_frame(dt, &inputs)?;

        if frame % print_every == 0 || frame == frames {
            let vehicle = sim.get(id).context("vehicle vanished")?;
            let view = camera.view(&SceneAdapter::pose(vehicle));
            print!("{}", renderer.render(&sim, &view));
        }
    }

    println!(
        "done: ticks={} simulated={:.3}s wall={:.3}s hash={:#018x}",
        sim.tick(),
        sim.elapsed(),
        clock.elapsed(),
        sim.state_hash()
    );
    Ok(())
}

fn hover(preset: Preset, seconds: f32) -> anyhow::Result<()> {
    anyhow::ensure!(
        seconds.is_finite() && seconds >= 0.0,
        "seconds must be non-negative, got {seconds}"
    );
    let config = SimConfig {
        flight: preset.config(),
        ..SimConfig::default()
    };
    let throttle = config
        .flight
        .tuning
        .hover_throttle()
        .context("max thrust cannot balance gravity")?;

    let mut sim = Simulation::with_clock(config.clock)?;
    let id = sim.spawn(config.flight, config.rotors)?;
    let inputs = InputFrame::from([(id, ControlInputs::throttle(throttle))]);
    let ticks = (seconds / config.clock.tick_seconds).round() as u64;
    for _ in 0..ticks {
        sim.step(&inputs)?;
    }

    let state = sim.get(id).context("vehicle vanished")?.state();
    println!(
        "preset={} throttle={throttle:.4} ticks={ticks} altitude={:.4} vertical_speed={:.6}",
        preset.name(),
        state.position.y,
        state.velocity.y
    );
    Ok(())
}
