//! Herd Dash entry point
//!
//! Native builds run a headless demo: the autopilot plays consecutive levels
//! and the outcome of each is logged.
//!
//! Usage: `herd-dash [levels] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use herd_dash::{
    Settings,
    autopilot::Autopilot,
    consts::SIM_DT,
    persistence::JsonFilePrefs,
    platform::{FixedStep, init_logging},
    sim::{ArenaPhysics, LevelOrchestrator, LevelOutcome, NullFactory, Rect},
    ui::LogHud,
};

/// Simulated wall-clock frame (60 fps display)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up on a level after this much simulated time
#[cfg(not(target_arch = "wasm32"))]
const LEVEL_TIMEOUT_SECS: f32 = 120.0;
/// Attempts per level before the run stops
#[cfg(not(target_arch = "wasm32"))]
const MAX_ATTEMPTS: u32 = 3;
#[cfg(not(target_arch = "wasm32"))]
const PREFS_FILE: &str = "herd_dash_prefs.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    init_logging();
    log::info!("Herd Dash (native) starting...");

    let mut args = std::env::args().skip(1);
    let levels: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5).max(1);
    let settings = args
        .next()
        .map(|path| Settings::load_from(std::path::Path::new(&path)))
        .unwrap_or_default();

    let physics = ArenaPhysics::new(Rect::from_half_extents(settings.arena_half_extents));
    let mut game = LevelOrchestrator::new(settings, Box::new(physics))
        .with_factory(Box::new(NullFactory::default()))
        .with_hud(Box::new(LogHud::new()))
        .with_persistence(Box::new(JsonFilePrefs::open(PREFS_FILE)));
    log::info!("Best level so far: {}", game.best_level().0);

    let mut autopilot = Autopilot::default();
    let mut clock = FixedStep::new();
    let max_ticks = (LEVEL_TIMEOUT_SECS / SIM_DT) as u64;
    let mut attempts = 1;
    let mut cleared = 0;

    game.start_level(1);
    while cleared < levels {
        for _ in 0..clock.advance(FRAME_DT) {
            let input = autopilot.plan(&game);
            game.tick_with_input(&input, SIM_DT);
        }

        let retry = match game.outcome() {
            Some(LevelOutcome::Won) => {
                cleared += 1;
                attempts = 1;
                if cleared < levels {
                    game.next_level();
                }
                false
            }
            Some(LevelOutcome::Lost) => true,
            None if game.level().time_ticks >= max_ticks => {
                log::warn!("Level {} timed out", game.level().current_level);
                true
            }
            None => false,
        };

        if retry {
            if attempts >= MAX_ATTEMPTS {
                log::warn!(
                    "Giving up on level {} after {attempts} attempts",
                    game.level().current_level
                );
                break;
            }
            attempts += 1;
            game.restart_level();
        }
    }

    log::info!(
        "Run finished: {cleared}/{levels} levels cleared, best level {}",
        game.best_level().0
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `LevelOrchestrator` from their own frame loop
}
