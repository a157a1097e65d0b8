//! HUD collaborator
//!
//! The game never draws anything itself. It pushes counters and outcome
//! notifications to a `Hud`; the host decides how to present them.

/// Heads-up display and end-of-level panels
pub trait Hud {
    fn update_hud(&mut self, level: u32, target: u32, live: u32, death: u32);
    fn show_win(&mut self);
    fn show_lose(&mut self);
    /// Hide win/lose panels (level start)
    fn reset(&mut self);
}

/// HUD that writes changes to the log
#[derive(Debug, Default)]
pub struct LogHud {
    last: Option<(u32, u32, u32, u32)>,
}

impl LogHud {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hud for LogHud {
    fn update_hud(&mut self, level: u32, target: u32, live: u32, death: u32) {
        let counters = (level, target, live, death);
        // Counters are pushed every tick; only log changes
        if self.last != Some(counters) {
            log::info!("Level {level} | safe {live}/{target} | lost {death}");
            self.last = Some(counters);
        }
    }

    fn show_win(&mut self) {
        log::info!("Level complete!");
    }

    fn show_lose(&mut self) {
        log::info!("Level failed");
    }

    fn reset(&mut self) {
        self.last = None;
    }
}
