//! Demo mode - scripted taps that herd prey into the zone
//!
//! Every `interval` ticks the autopilot picks the stray prey farthest from
//! the zone and taps the ground just behind it, so the proximity scare sends
//! it running straight at the zone center.

use glam::Vec2;

use crate::sim::{LevelOrchestrator, Prey, TickInput};

/// Scripted input source for headless runs
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Ticks between taps
    pub interval: u32,
    /// Distance of the tap behind the prey (must exceed the pick radius plus body radius)
    pub offset: f32,
    cooldown: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Autopilot {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            offset: 1.0,
            cooldown: 0,
        }
    }

    /// Input for the next tick
    pub fn plan(&mut self, game: &LevelOrchestrator) -> TickInput {
        if !game.level().is_active {
            return TickInput::default();
        }
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return TickInput::default();
        }

        let tap = self.pick_tap(game);
        if tap.is_some() {
            self.cooldown = self.interval - 1;
        }
        TickInput { tap }
    }

    fn pick_tap(&self, game: &LevelOrchestrator) -> Option<Vec2> {
        let zone = game.zone()?;
        let bounds = game.level().map_bounds;

        // Candidate: stray, not already running at the zone, tap lands on the ground
        let aim = |prey: &Prey| -> Option<(f32, Vec2)> {
            if !prey.is_alive() || prey.is_safe() {
                return None;
            }
            let away = (prey.core.pos - zone.center).try_normalize()?;
            if prey.core.heading.dot(-away) > 0.99 {
                return None;
            }
            let tap = prey.core.pos + away * self.offset;
            bounds
                .contains(tap)
                .then(|| (prey.core.pos.distance_squared(zone.center), tap))
        };

        game.prey()
            .iter()
            .filter_map(aim)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, tap)| tap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::{ArenaPhysics, LevelOutcome, Rect};

    fn game(level: u32) -> LevelOrchestrator {
        let settings = Settings::default();
        let physics = ArenaPhysics::new(Rect::from_half_extents(settings.arena_half_extents));
        let mut game = LevelOrchestrator::new(settings, Box::new(physics));
        game.start_level(level);
        game
    }

    #[test]
    fn test_tap_lands_behind_stray_prey() {
        let game = game(3);
        let mut autopilot = Autopilot::new(10);
        let tap = autopilot.plan(&game).tap.expect("a stray prey to herd");

        let zone = game.zone().expect("zone spawned").center;
        // Zone, prey and tap are collinear with the prey in the middle
        let herded = game.prey().iter().any(|prey| {
            let to_zone = (zone - prey.core.pos).normalize();
            let from_tap = prey.core.pos - tap;
            (from_tap.length() - autopilot.offset).abs() < 1e-4 && to_zone.dot(from_tap.normalize()) > 0.999
        });
        assert!(herded);
    }

    #[test]
    fn test_respects_interval() {
        let game = game(2);
        let mut autopilot = Autopilot::new(5);
        let taps: Vec<bool> = (0..10).map(|_| autopilot.plan(&game).tap.is_some()).collect();
        assert_eq!(
            taps,
            vec![true, false, false, false, false, true, false, false, false, false]
        );
    }

    #[test]
    fn test_wins_level_one() {
        let mut game = game(1);
        let mut autopilot = Autopilot::default();
        for _ in 0..3000 {
            let input = autopilot.plan(&game);
            game.tick_with_input(&input, SIM_DT);
            if game.outcome().is_some() {
                break;
            }
        }
        assert_eq!(game.outcome(), Some(LevelOutcome::Won));
    }
}
