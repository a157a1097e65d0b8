//! Platform abstraction layer
//!
//! Handles native/browser differences for:
//! - Logging setup
//! - Frame time to fixed timestep conversion
//! - Pointer input (taps already projected to the ground plane)

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Install the platform logger. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Install the platform logger. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Converts variable frame times into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame delta; returns how many `SIM_DT` ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        // Clamp long frames (tab switches, debugger pauses)
        self.accumulator += frame_dt.clamp(0.0, 0.25);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Spiral of death guard: drop the backlog
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}

/// Source of pointer taps in world space
pub trait PointerInput {
    /// At most one tap per tick
    fn poll_tap(&mut self) -> Option<Vec2>;
}

/// Collects taps between ticks. Only the first tap since the last poll is
/// delivered; the rest are dropped.
#[derive(Debug, Clone, Default)]
pub struct TapBuffer {
    pending: Option<Vec2>,
    dropped: u32,
}

impl TapBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Vec2) {
        if self.pending.is_some() {
            self.dropped += 1;
        } else {
            self.pending = Some(point);
        }
    }

    /// Total taps dropped because another tap was already pending
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl PointerInput for TapBuffer {
    fn poll_tap(&mut self) -> Option<Vec2> {
        self.pending.take()
    }
}
