//! Paint Pong headless host
//!
//! Drives the simulation the way a windowed front end would (one frame at a
//! time through a `FrameClock`), feeds sparks from capture events, and logs
//! territory counts once per simulated second.
//!
//! Usage: `paint-pong [preset|config.json] [frames]`

use std::process::ExitCode;

use paint_pong::sim::{FrameClock, initialize, snapshot};
use paint_pong::{ConfigError, Preset, SimConfig, SparkField};

/// Frames to run when none are given
const DEFAULT_FRAMES: u32 = 600;

fn load_config(arg: Option<&str>) -> Result<SimConfig, ConfigError> {
    let Some(arg) = arg else {
        return Ok(SimConfig::default());
    };
    if let Some(preset) = Preset::from_str(arg) {
        log::info!("Using preset {}", preset.as_str());
        return Ok(SimConfig::from_preset(preset));
    }
    let json = std::fs::read_to_string(arg).map_err(|e| ConfigError::Read {
        path: arg.to_string(),
        message: e.to_string(),
    })?;
    log::info!("Loaded config from {}", arg);
    SimConfig::from_json(&json)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = match load_config(args.get(1).map(String::as_str)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let frames = match args.get(2).map(|s| s.parse::<u32>()) {
        None => DEFAULT_FRAMES,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("Invalid frame count {:?}: {}", args[2], e);
            return ExitCode::FAILURE;
        }
    };

    let frame_dt = 1.0 / config.fps.max(1) as f32;
    let fps = config.fps.max(1);
    let mut sparks = SparkField::new(config.seed ^ 0x5eed);
    let mut state = match initialize(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut clock = FrameClock::new();
    let mut events = Vec::new();
    let mut total_captures = 0usize;

    for frame in 1..=frames {
        events.clear();
        clock.advance(&mut state, frame_dt, &mut events);
        total_captures += events.len();
        sparks.emit_all(&events);
        sparks.update(frame_dt);

        if frame % fps == 0 {
            let counts = state.counts();
            log::info!(
                "t={}s captures={} sparks={} counts={:?}",
                frame / fps,
                total_captures,
                sparks.len(),
                counts
            );
        }
    }

    let view = snapshot(&state);
    let leader = view
        .counts
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| **c)
        .map(|(team, _)| team)
        .unwrap_or(0);
    log::info!(
        "Finished {} frames: {} captures, team {} leads with {:.1}% of the grid",
        frames,
        total_captures,
        leader,
        view.share(paint_pong::Team(leader as u16)) * 100.0
    );

    match serde_json::to_string(&view.counts) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize counts: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
