use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use physarum::{present::FrameRecorder, ParameterStore, Simulation, SimulationParameters};

/// Run a Physarum trail simulation and write snapshots of the trail field as PNG files.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 1024)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 1024)]
    height: usize,

    /// Number of agents
    #[arg(long, default_value_t = 1 << 18)]
    agents: usize,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 2048)]
    ticks: u64,

    /// Seed for the initial placement (and for --randomize)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Capture a frame every this many ticks (0 captures only the final state)
    #[arg(long, default_value_t = 64)]
    capture_every: u64,

    /// Directory the frames are written to
    #[arg(long, default_value = "frames")]
    output: PathBuf,

    /// Draw a random parameter set instead of using the flags below
    #[arg(long)]
    randomize: bool,

    /// Total sensor cone width in degrees
    #[arg(long, default_value_t = 60.0)]
    sensor_angle: f32,

    #[arg(long, default_value_t = 3.0)]
    sensor_distance: f32,

    /// Sensor rays across all three sectors
    #[arg(long, default_value_t = 5)]
    sensor_theta_resolution: u32,

    /// Samples per sensor ray
    #[arg(long, default_value_t = 5)]
    sensor_length_resolution: u32,

    #[arg(long, default_value_t = 1.0)]
    turn_speed: f32,

    #[arg(long, default_value_t = 0.0)]
    wander_strength: f32,

    #[arg(long, default_value_t = 0.03)]
    evaporation_rate: f32,

    /// Deposition colour as three comma separated channels
    #[arg(long, value_delimiter = ',', default_values_t = [0.4_f32, 0.4, 0.5])]
    color: Vec<f32>,

    #[arg(long, default_value_t = 1.0)]
    step_length: f32,
}

impl Args {
    fn parameters(&self) -> Result<SimulationParameters> {
        if self.randomize {
            let mut rng = ChaCha12Rng::seed_from_u64(self.seed.wrapping_add(1));
            return Ok(SimulationParameters::random(&mut rng));
        }
        ensure!(
            self.color.len() == 3,
            "--color takes exactly three channels, got {}",
            self.color.len()
        );
        Ok(SimulationParameters {
            sensor_angle: self.sensor_angle.to_radians(),
            sensor_distance: self.sensor_distance,
            sensor_theta_resolution: self.sensor_theta_resolution,
            sensor_length_resolution: self.sensor_length_resolution,
            turn_speed: self.turn_speed,
            wander_strength: self.wander_strength,
            evaporation_rate: self.evaporation_rate,
            deposition_color: [self.color[0], self.color[1], self.color[2]],
            step_length: self.step_length,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = ParameterStore::new(args.parameters()?).context("invalid simulation parameters")?;
    info!("Parameters: {:?}", store.snapshot());

    let mut model = Simulation::initialize(args.agents, args.width, args.height, args.seed)
        .context("cannot initialize the simulation")?;
    let mut recorder = FrameRecorder::new();

    let pb = ProgressBar::new(args.ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ticks ({eta})")
            .progress_chars("#>-"),
    );

    for _ in 0..args.ticks {
        model.run(1, &store)?;
        if args.capture_every > 0 && model.tick() % args.capture_every == 0 {
            recorder.capture(&model.current_field(), model.tick());
        }
        pb.inc(1);
    }
    pb.finish();

    if recorder.frames().last().map(|f| f.tick) != Some(model.tick()) {
        recorder.capture(&model.current_field(), model.tick());
    }

    // export saved image data
    info!("Rendering {} captured frames", recorder.len());
    recorder
        .render_all(&args.output)
        .context("cannot write frames")?;
    Ok(())
}
