use std::{io, thread, time::Duration};

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    tensor::backend::Backend,
};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;
use yop::{
    algo::{DQNAgentConfig, QNetworkConfig},
    render,
    sim::Simulation,
};

type QBackend = Autodiff<NdArray>;

const DEMO_PAUSE: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "yop")]
#[command(version, about = "A grid-world agent learning to chase food")]
struct Cli {
    /// Do not redraw the grid every step
    #[arg(long)]
    no_draw: bool,

    /// Act without storing experiences or training
    #[arg(long)]
    no_learning: bool,

    /// Watch the agent without training, one step every 100 ms
    #[arg(long)]
    demo: bool,

    /// Seed for the world, exploration and replay sampling
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("seed {seed}");

    QBackend::seed(seed);
    let device = NdArrayDevice::default();
    let model = QNetworkConfig::new().init::<QBackend>(&device);
    let mut sim = Simulation::new(model, DQNAgentConfig::default(), seed);

    if cli.demo || cli.no_learning {
        sim.agent_mut().stop_learning();
    }

    let mut stdout = io::stdout();
    loop {
        if !cli.no_draw {
            render::draw(&mut stdout, sim.world(), sim.iteration(), sim.agent().score())?;
        }

        sim.step();

        if cli.demo {
            thread::sleep(DEMO_PAUSE);
        }
    }
}
