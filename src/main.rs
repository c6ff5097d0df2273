//! Asteroid Ring headless driver
//!
//! Builds the scene, runs a fixed number of frames and applies `--set`
//! changes halfway through. Rendering is left to whatever consumes
//! `Asteroid::asteroid_object`.

use std::process::ExitCode;

use clap::Parser;

use asteroid_ring::cli::CliArgs;
use asteroid_ring::{AsteroidError, ColorPalette, CoreColor, ParameterStore, Parameters, Scene};

fn load_params(args: &CliArgs) -> Result<Parameters, AsteroidError> {
    let Some(path) = &args.preset else {
        return Ok(Parameters::default());
    };
    let json = std::fs::read_to_string(path).map_err(AsteroidError::PresetRead)?;
    let params = Parameters::from_json(&json)?;
    log::info!("Loaded preset from {}", path.display());
    Ok(params)
}

fn run(args: &CliArgs) -> Result<(), AsteroidError> {
    let params = load_params(args)?;
    if args.dump_preset {
        println!("{}", params.to_json()?);
        return Ok(());
    }

    let store = ParameterStore::new(params, ColorPalette::default())?;
    let mut scene = Scene::new(store);

    let core_color = if args.palette_core {
        CoreColor::FromPalette
    } else {
        CoreColor::default()
    };
    scene.spawn_asteroid(args.radius, core_color, args.seed)?;

    let change_at = args.ticks / 2;
    for frame in 0..args.ticks {
        if frame == change_at && !args.changes.is_empty() {
            let report = scene.apply_changes(&args.changes)?;
            log::info!(
                "Frame {}: applied {} change(s), recompute {:?}, {} rejected",
                frame,
                args.changes.len() - report.rejected.len(),
                report.recompute,
                report.rejected.len()
            );
        }
        scene.tick()?;
    }

    let asteroid = scene.asteroid()?;
    let ring = asteroid.ring();
    let mean_distance = if ring.is_empty() {
        0.0
    } else {
        ring.iter().map(|p| p.distance).sum::<f32>() / ring.len() as f32
    };
    let object = asteroid.asteroid_object();

    log::info!(
        "Done after {} frames: {} particles in {} shape batches, mean distance {:.2}, core rotation {:.3}",
        scene.ticks(),
        ring.len(),
        object.batches().len(),
        mean_distance,
        asteroid.core().rotation_y
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Asteroid Ring starting...");

    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
