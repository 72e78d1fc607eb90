//! Space Shooter headless entry point
//!
//! Runs the simulation without graphics: the autopilot plays a seeded run
//! for a fixed tick budget and the final HUD is printed as JSON.
//!
//! Usage: `space-shooter [SEED] [--tuning PATH] [--ticks N]`

use std::process::ExitCode;

use space_shooter::consts::{MAX_SUBSTEPS, SIM_DT};
use space_shooter::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use space_shooter::{Tuning, TuningError};

/// Two minutes of play at 60 Hz
const DEFAULT_TICK_BUDGET: u64 = 60 * 120;
const DEFAULT_SEED: u64 = 42;
/// Wall-clock frame length the driver pretends to render at
const FRAME_SECS: f32 = 1.0 / 50.0;

/// Errors that end a headless run
#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error(transparent)]
    Tuning(#[from] TuningError),

    /// The final HUD could not be written out
    #[error("HUD output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Command line options
#[derive(Debug)]
struct Options {
    seed: u64,
    tuning: Option<String>,
    ticks: u64,
}

impl Options {
    fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        let mut options = Options {
            seed: DEFAULT_SEED,
            tuning: None,
            ticks: DEFAULT_TICK_BUDGET,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tuning" => options.tuning = args.next(),
                "--ticks" => match args.next().map(|v| v.parse()) {
                    Some(Ok(ticks)) => options.ticks = ticks,
                    _ => log::warn!("--ticks expects a number, keeping {}", options.ticks),
                },
                other => match other.parse() {
                    Ok(seed) => options.seed = seed,
                    Err(_) => log::warn!("ignoring unknown argument {other:?}"),
                },
            }
        }
        options
    }
}

/// Fixed-timestep driver fed by variable frame times
struct Driver {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    explosions: u64,
}

impl Driver {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            explosions: 0,
        }
    }

    /// Advance by one rendered frame of `dt` seconds
    fn frame(&mut self, dt: f32) {
        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the backlog instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }

        // Stand-in for the particle layer
        for event in self.state.drain_events() {
            match event {
                GameEvent::Explosion { .. } => self.explosions += 1,
                GameEvent::Notification {
                    message,
                    sub_message,
                    ..
                } => log::info!("{message} {}", sub_message.unwrap_or_default()),
                _ => {}
            }
        }
    }
}

fn run(options: &Options) -> Result<(), RunError> {
    let tuning = match &options.tuning {
        Some(path) => Tuning::from_path(path)?,
        None => Tuning::default(),
    };
    log::info!(
        "Space Shooter (headless) seed {} for {} ticks",
        options.seed,
        options.ticks
    );

    let mut driver = Driver::new(GameState::with_tuning(options.seed, tuning));
    while driver.state.time_ticks < options.ticks {
        driver.frame(FRAME_SECS);
        if driver.state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "finished after {} ticks with {} explosions",
        driver.state.time_ticks,
        driver.explosions
    );
    let hud = driver.state.hud();
    println!("{}", serde_json::to_string_pretty(&hud)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::from_args(std::env::args().skip(1));
    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
