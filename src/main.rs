//! Void Hop headless driver
//!
//! Runs a scripted session against the simulation at a fixed step and prints
//! the final frame as JSON. Rendering lives elsewhere; this is what you run to
//! watch the rules play out in the log.

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use void_hop::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use void_hop::sim::{SimState, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use void_hop::{Level, Tuning};

/// Run a scripted session and print the final frame as JSON
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// Tuning JSON (missing fields keep their defaults)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Level JSON (defaults to the built-in layout)
    #[arg(long)]
    level: Option<PathBuf>,
    /// RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Session length in simulated seconds
    #[arg(long, default_value_t = 40.0)]
    seconds: f32,
}

/// Input held during each second of the scripted session
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(now: f32) -> TickInput {
    let second = now as u32;
    let phase = now.fract();
    match second % 6 {
        0 | 1 => TickInput {
            right: true,
            jump: second % 6 == 1 && phase < 0.1,
            ..Default::default()
        },
        2 => TickInput::default(),
        3 | 4 => TickInput {
            left: true,
            jump: phase > 0.5 && phase < 0.6,
            ..Default::default()
        },
        _ => TickInput {
            // Tap rather than hold so each tap is a fresh press
            jump: phase < 0.05,
            ..Default::default()
        },
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
}

#[cfg(not(target_arch = "wasm32"))]
fn load(options: &Options) -> Result<(Tuning, Level), String> {
    let tuning = match &options.tuning {
        Some(path) => Tuning::from_json(&read(path)?)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => Tuning::default(),
    };
    let level = match &options.level {
        Some(path) => Level::from_json(&read(path)?)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => Level::default(),
    };
    Ok((tuning, level))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Void Hop (headless) starting...");

    let options = Options::parse();

    let (tuning, level) = match load(&options) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut state = match SimState::new(tuning, &level, options.seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Run initialized with seed {} ({} obstacles, well at ({:.0}, {:.0}))",
        options.seed,
        state.obstacles.len(),
        state.well.pos.x,
        state.well.pos.y
    );

    let steps = (options.seconds / SIM_DT).ceil() as u32;
    let mut now = 0.0;
    let mut deaths = 0;
    for _ in 0..steps {
        now += SIM_DT;
        let was_dead = state.game_over;
        tick(&mut state, &scripted_input(now), now, SIM_DT);
        if state.game_over && !was_dead {
            deaths += 1;
        }
    }

    log::info!(
        "Session over after {:.1}s: {} death(s), {} strike call(s)",
        now,
        deaths,
        state.movement_counter
    );

    match serde_json::to_string_pretty(&state.snapshot(now)) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the simulation through the library directly
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let options = Options::try_parse_from(["void-hop"]).unwrap();
        assert_eq!(options.seed, 12345);
        assert_eq!(options.seconds, 40.0);
        assert!(options.tuning.is_none());
        assert!(options.level.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let options = Options::try_parse_from([
            "void-hop",
            "--seed",
            "7",
            "--seconds",
            "2.5",
            "--level",
            "l.json",
        ])
        .unwrap();
        assert_eq!(options.seed, 7);
        assert_eq!(options.seconds, 2.5);
        assert_eq!(options.level, Some(PathBuf::from("l.json")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Options::try_parse_from(["void-hop", "--seed"]).is_err());
        assert!(Options::try_parse_from(["void-hop", "--seed", "x"]).is_err());
        assert!(Options::try_parse_from(["void-hop", "--fast"]).is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let options = Options::try_parse_from(["void-hop", "--tuning", "/nonexistent/tuning.json"]).unwrap();
        let err = load(&options).unwrap_err();
        assert!(err.contains("/nonexistent/tuning.json"));
    }

    #[test]
    fn test_scripted_input_taps_jump() {
        assert!(scripted_input(5.01).jump);
        assert!(!scripted_input(5.5).jump);
        assert!(scripted_input(0.5).right);
        assert!(scripted_input(3.5).left);
    }
}
