//! # Farm
//!
//! Headless front-end for the farm simulation. Reads one command per line
//! from stdin (or a script file) and drives the model with it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod controller;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use farm_sim::{FarmConfig, FarmModel, Shop};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::controller::{Controller, Response};

/// Grid-based farming simulation
#[derive(Parser, Debug)]
#[command(name = "farm")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map description file
    #[arg(default_value = "maps/map1.txt")]
    map: PathBuf,

    /// Configuration file (defaults are used if it is missing)
    #[arg(short, long, default_value = farm_sim::CONFIG_FILE)]
    config: PathBuf,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print the farm after every command
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive("farm=info".parse()?))
        .init();

    let args = Args::parse();
    info!("Farm starting, version {}", env!("CARGO_PKG_VERSION"));

    let config = FarmConfig::load_from(&args.config);
    let model = FarmModel::from_map_file(&args.map, &config)
        .with_context(|| format!("loading map {}", args.map.display()))?;
    let mut controller = Controller::new(model, Shop::new(config.prices.clone()), config.tiles);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", controller.status())?;

    for line in input.lines() {
        match controller.handle_line(&line?) {
            Response::Continue if args.verbose => write!(out, "{}", controller.status())?,
            Response::Continue => {},
            Response::Show(text) => write!(out, "{text}")?,
            Response::Quit => break,
        }
        out.flush()?;
    }

    info!(day = controller.model().days_elapsed(), "Farm closed");
    Ok(())
}
