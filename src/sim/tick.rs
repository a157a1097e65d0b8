//! Level orchestration and the per-tick simulation loop
//!
//! The orchestrator owns every agent and the zone, builds them in bulk at
//! level start and tears them down on the next start. Each tick runs a fixed
//! sequence of phases so results never depend on update order:
//!
//! 1. advance panic countdowns
//! 2. dispatch at most one tap, so a fresh panic keeps its full duration
//! 3. steer, reading a snapshot of last tick's positions
//! 4. integrate and sync bodies with the physics world
//! 5. apply contact events in ascending agent order
//! 6. push the HUD, then check win before lose

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::agent::{AgentCore, StimulusReceiver};
use super::level::{LevelOutcome, LevelState};
use super::predator::{Predator, PredatorSteering, PreySnapshot};
use super::prey::Prey;
use super::spawn::safe_placement;
use super::world::{
    AgentId, AgentKind, Collider, ContactEvent, EntityKind, LayerMask, PhysicsWorld, SpawnFactory,
};
use super::zone::SafeZone;
use crate::persistence::Persistence;
use crate::platform::PointerInput;
use crate::random_heading;
use crate::records::BestLevel;
use crate::settings::Settings;
use crate::ui::Hud;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// World-space ground point tapped this tick
    pub tap: Option<Vec2>,
}

/// Per-level RNG stream
fn level_rng(seed: u64, level: u32) -> Pcg32 {
    Pcg32::seed_from_u64(seed ^ u64::from(level).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Drives one level at a time: spawning, ticking, scoring
pub struct LevelOrchestrator {
    settings: Settings,
    physics: Box<dyn PhysicsWorld>,
    factory: Option<Box<dyn SpawnFactory>>,
    hud: Option<Box<dyn Hud>>,
    persistence: Option<Box<dyn Persistence>>,
    input: Option<Box<dyn PointerInput>>,

    level: LevelState,
    /// Spawn order (ascending id)
    prey: Vec<Prey>,
    /// Spawn order (ascending id)
    predators: Vec<Predator>,
    zone: Option<SafeZone>,
    rng: Pcg32,
    next_id: u32,
    time_scale: f32,
    outcome: Option<LevelOutcome>,
}

impl LevelOrchestrator {
    /// Create an orchestrator over `physics`. Nothing is spawned and the
    /// level is inactive until `start_level` is called.
    pub fn new(settings: Settings, physics: Box<dyn PhysicsWorld>) -> Self {
        let settings = settings.validated();
        let mut level = LevelState::new(1, settings.death_limit, physics.bounds());
        level.is_active = false;
        let rng = level_rng(settings.seed, 1);

        Self {
            settings,
            physics,
            factory: None,
            hud: None,
            persistence: None,
            input: None,
            level,
            prey: Vec::new(),
            predators: Vec::new(),
            zone: None,
            rng,
            next_id: 1,
            time_scale: 1.0,
            outcome: None,
        }
    }

    pub fn with_factory(mut self, factory: Box<dyn SpawnFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn with_hud(mut self, hud: Box<dyn Hud>) -> Self {
        self.hud = Some(hud);
        self
    }

    pub fn with_persistence(mut self, persistence: Box<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_input(mut self, input: Box<dyn PointerInput>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level(&self) -> &LevelState {
        &self.level
    }

    pub fn prey(&self) -> &[Prey] {
        &self.prey
    }

    pub fn predators(&self) -> &[Predator] {
        &self.predators
    }

    pub fn zone(&self) -> Option<&SafeZone> {
        self.zone.as_ref()
    }

    pub fn physics(&self) -> &dyn PhysicsWorld {
        &*self.physics
    }

    /// Outcome of the current level, once decided
    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.outcome
    }

    /// 1.0 while playing, 0.0 once the level is decided
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Best level on record (1 without a persistence backend)
    pub fn best_level(&self) -> BestLevel {
        self.persistence
            .as_deref()
            .map_or(BestLevel(1), |prefs| BestLevel::load(prefs))
    }

    /// Tear down the current level and build `level` from scratch
    pub fn start_level(&mut self, level: u32) {
        let bounds = self.physics.bounds();
        self.level = LevelState::new(level, self.settings.death_limit, bounds);
        let level = self.level.current_level;

        self.rng = level_rng(self.settings.seed, level);
        self.next_id = 1;
        self.time_scale = 1.0;
        self.outcome = None;
        self.teardown();

        self.spawn_zone();
        for _ in 0..self.level.total_prey {
            self.spawn_agent(AgentKind::Prey);
        }
        for _ in 0..self.level.predator_count {
            self.spawn_agent(AgentKind::Predator);
        }

        if let Some(hud) = self.hud.as_mut() {
            hud.reset();
        }
        self.push_hud();

        log::info!(
            "Level {} started: {} prey (target {}), {} predators, zone x{:.1}",
            level,
            self.level.total_prey,
            self.level.target_count,
            self.level.predator_count,
            self.level.zone_scale
        );
    }

    pub fn next_level(&mut self) {
        self.start_level(self.level.current_level.saturating_add(1));
    }

    pub fn restart_level(&mut self) {
        self.start_level(self.level.current_level);
    }

    pub fn restart_game(&mut self) {
        self.start_level(1);
    }

    /// A prey reached the zone (no-op once the level is over)
    pub fn add_live_count(&mut self) {
        self.level.add_live_count();
    }

    /// A prey was killed (no-op once the level is over)
    pub fn add_death_count(&mut self) {
        self.level.add_death_count();
    }

    /// Move an agent and its body. Returns false for unknown ids.
    pub fn teleport_agent(&mut self, id: AgentId, position: Vec2) -> bool {
        let Some(core) = core_mut(&mut self.prey, &mut self.predators, id) else {
            return false;
        };
        core.pos = position;
        self.physics.move_agent(id, position);
        true
    }

    /// Advance one step, polling the pointer collaborator for a tap
    pub fn tick(&mut self, dt: f32) {
        let tap = self.input.as_mut().and_then(|input| input.poll_tap());
        self.tick_with_input(&TickInput { tap }, dt);
    }

    /// Advance one step with host-supplied input
    pub fn tick_with_input(&mut self, input: &TickInput, dt: f32) {
        if !self.level.is_active {
            return;
        }
        let dt = dt * self.time_scale;
        self.level.time_ticks += 1;

        // (a) panic countdowns
        for prey in &mut self.prey {
            prey.core.advance_panic(dt);
        }
        for predator in &mut self.predators {
            predator.core.advance_panic(dt);
        }

        if let Some(point) = input.tap {
            self.dispatch_tap(point);
        }

        // (b) steering against last tick's positions
        let snapshot: Vec<PreySnapshot> = self
            .prey
            .iter()
            .map(|p| PreySnapshot {
                id: p.core.id,
                pos: p.core.pos,
                catchable: p.is_alive() && !p.is_safe(),
            })
            .collect();
        for prey in &mut self.prey {
            prey.steer(dt);
        }
        for predator in &mut self.predators {
            predator.steer(&snapshot, &*self.physics, dt, &mut self.rng);
        }

        // (c) integration
        for prey in &mut self.prey {
            prey.core.integrate(dt);
            self.physics.move_agent(prey.core.id, prey.core.pos);
        }
        for predator in &mut self.predators {
            predator.core.integrate(dt);
            self.physics.move_agent(predator.core.id, predator.core.pos);
        }

        // (d) contacts
        for event in self.physics.step() {
            self.apply_contact(event);
        }
        self.prey.retain(Prey::is_alive);

        self.push_hud();
        match self.level.evaluate() {
            Some(LevelOutcome::Won) => self.win(),
            Some(LevelOutcome::Lost) => self.lose(),
            None => {}
        }
    }

    fn teardown(&mut self) {
        if let Some(factory) = self.factory.as_mut() {
            factory.despawn_all(EntityKind::Prey);
            factory.despawn_all(EntityKind::Predator);
            factory.despawn_all(EntityKind::Zone);
        }
        self.physics.clear();
        self.prey.clear();
        self.predators.clear();
        self.zone = None;
    }

    fn spawn_zone(&mut self) {
        let radius = self.settings.zone_base_radius * self.level.zone_scale;
        // Keep the whole trigger inside the map
        let padding = self.settings.zone_padding.max(radius);
        let placement = safe_placement(
            self.level.map_bounds,
            padding,
            &*self.physics,
            LayerMask::AGENT | LayerMask::ZONE,
            &mut self.rng,
        );

        let mut zone = SafeZone::new(placement.position, self.settings.zone_base_radius, self.level.zone_scale);
        self.physics.set_zone(Some((zone.center, zone.radius)));
        if let Some(factory) = self.factory.as_mut() {
            zone.handle = Some(factory.spawn(EntityKind::Zone, zone.center));
        }
        self.zone = Some(zone);
    }

    fn spawn_agent(&mut self, kind: AgentKind) {
        let placement = safe_placement(
            self.level.map_bounds,
            self.settings.agent_padding,
            &*self.physics,
            LayerMask::AGENT | LayerMask::ZONE,
            &mut self.rng,
        );

        let id = AgentId(self.next_id);
        self.next_id += 1;
        let tuning = match kind {
            AgentKind::Prey => self.settings.prey,
            AgentKind::Predator => self.settings.predator,
        };
        let heading = random_heading(&mut self.rng);
        let mut core = AgentCore::new(id, placement.position, heading, tuning);

        self.physics.insert_agent(id, kind, core.pos, tuning.body_radius);
        if let Some(factory) = self.factory.as_mut() {
            core.handle = Some(factory.spawn(kind.into(), core.pos));
        }

        match kind {
            AgentKind::Prey => self.prey.push(Prey::new(core, self.settings.zone_steer_rate)),
            AgentKind::Predator => {
                let steering = PredatorSteering::from_settings(&self.settings);
                self.predators.push(Predator::new(core, steering, &mut self.rng));
            }
        }
    }

    /// Direct hit on one agent, else a proximity scare around a ground point
    fn dispatch_tap(&mut self, point: Vec2) {
        let picked = self
            .physics
            .overlap_disk(point, self.settings.tap_pick_radius, LayerMask::AGENT)
            .into_iter()
            .filter_map(|collider| match collider {
                Collider::Agent(id) => core_ref(&self.prey, &self.predators, id)
                    .map(|core| (id, core.pos.distance_squared(point))),
                _ => None,
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        if let Some((id, _)) = picked {
            if let Some(agent) = receiver(&mut self.prey, &mut self.predators, id) {
                agent.on_direct_stimulus(&mut self.rng);
                log::debug!("Direct hit on agent {}", id.0);
            }
            return;
        }

        if self.physics.overlap_disk(point, 0.0, LayerMask::GROUND).is_empty() {
            log::debug!("Tap at ({:.2}, {:.2}) missed the ground", point.x, point.y);
            return;
        }

        let nearby = self
            .physics
            .overlap_disk(point, self.settings.proximity_radius, LayerMask::AGENT);
        for collider in nearby {
            if let Collider::Agent(id) = collider {
                if let Some(agent) = receiver(&mut self.prey, &mut self.predators, id) {
                    agent.on_proximity_stimulus(point, &mut self.rng);
                }
            }
        }
    }

    fn apply_contact(&mut self, event: ContactEvent) {
        match event {
            ContactEvent::Wall {
                agent,
                normal,
                penetration,
            } => {
                if let Some(core) = core_mut(&mut self.prey, &mut self.predators, agent) {
                    core.bounce(normal, penetration);
                    self.physics.move_agent(agent, core.pos);
                }
            }
            ContactEvent::ZoneEntered { agent } => {
                // Predators pass through the trigger uncounted
                let (Some(zone), Some(prey)) =
                    (self.zone.as_ref(), self.prey.iter_mut().find(|p| p.core.id == agent))
                else {
                    return;
                };
                zone.on_prey_enter(prey, &mut self.level);
            }
            ContactEvent::Agents { a, b } => {
                let is_predator = |id: AgentId| self.predators.iter().any(|p| p.core.id == id);
                let (prey_id, predator_id) = if is_predator(b) { (a, b) } else { (b, a) };
                if !is_predator(predator_id) {
                    return;
                }
                let Some(prey) = self.prey.iter_mut().find(|p| p.core.id == prey_id) else {
                    return;
                };
                if !prey.is_alive() || prey.is_safe() {
                    return;
                }

                prey.alive = false;
                self.level.add_death_count();
                self.physics.remove_agent(prey_id);
                if let (Some(factory), Some(handle)) = (self.factory.as_mut(), prey.core.handle) {
                    factory.despawn(handle);
                }
                log::debug!("Prey {} caught by predator {}", prey_id.0, predator_id.0);
            }
        }
    }

    fn push_hud(&mut self) {
        if let Some(hud) = self.hud.as_mut() {
            let l = &self.level;
            hud.update_hud(l.current_level, l.target_count, l.live_count, l.death_count);
        }
    }

    fn win(&mut self) {
        let level = self.level.current_level;
        self.level.is_active = false;
        self.time_scale = 0.0;
        self.outcome = Some(LevelOutcome::Won);

        if let Some(prefs) = self.persistence.as_deref_mut() {
            BestLevel::record_win(prefs, level);
        }
        if let Some(hud) = self.hud.as_mut() {
            hud.show_win();
        }
        log::info!(
            "Level {} won ({}/{} safe, {} lost, {} ticks)",
            level,
            self.level.live_count,
            self.level.target_count,
            self.level.death_count,
            self.level.time_ticks
        );
    }

    fn lose(&mut self) {
        self.level.is_active = false;
        self.time_scale = 0.0;
        self.outcome = Some(LevelOutcome::Lost);

        if let Some(hud) = self.hud.as_mut() {
            hud.show_lose();
        }
        log::info!(
            "Level {} lost ({} of {} allowed deaths)",
            self.level.current_level,
            self.level.death_count,
            self.level.death_limit
        );
    }
}

fn core_ref<'a>(prey: &'a [Prey], predators: &'a [Predator], id: AgentId) -> Option<&'a AgentCore> {
    prey.iter()
        .map(|p| &p.core)
        .chain(predators.iter().map(|p| &p.core))
        .find(|core| core.id == id)
}

fn core_mut<'a>(prey: &'a mut [Prey], predators: &'a mut [Predator], id: AgentId) -> Option<&'a mut AgentCore> {
    prey.iter_mut()
        .map(|p| &mut p.core)
        .chain(predators.iter_mut().map(|p| &mut p.core))
        .find(|core| core.id == id)
}

fn receiver<'a>(
    prey: &'a mut [Prey],
    predators: &'a mut [Predator],
    id: AgentId,
) -> Option<&'a mut dyn StimulusReceiver> {
    if let Some(p) = prey.iter_mut().find(|p| p.core.id == id) {
        return Some(p as &mut dyn StimulusReceiver);
    }
    predators
        .iter_mut()
        .find(|p| p.core.id == id)
        .map(|p| p as &mut dyn StimulusReceiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::agent::PanicPhase;
    use crate::persistence::MemoryPrefs;
    use crate::sim::geometry::Rect;
    use crate::sim::physics::ArenaPhysics;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum HudCall {
        Update(u32, u32, u32, u32),
        Win,
        Lose,
        Reset,
    }

    struct RecordingHud(Rc<RefCell<Vec<HudCall>>>);

    impl Hud for RecordingHud {
        fn update_hud(&mut self, level: u32, target: u32, live: u32, death: u32) {
            self.0.borrow_mut().push(HudCall::Update(level, target, live, death));
        }
        fn show_win(&mut self) {
            self.0.borrow_mut().push(HudCall::Win);
        }
        fn show_lose(&mut self) {
            self.0.borrow_mut().push(HudCall::Lose);
        }
        fn reset(&mut self) {
            self.0.borrow_mut().push(HudCall::Reset);
        }
    }

    fn orchestrator() -> LevelOrchestrator {
        let settings = Settings::default();
        let physics = ArenaPhysics::new(Rect::from_half_extents(settings.arena_half_extents));
        LevelOrchestrator::new(settings, Box::new(physics))
    }

    /// A point on the opposite side of the map from the zone
    fn far_from_zone(orch: &LevelOrchestrator) -> Vec2 {
        let zone = orch.zone().expect("zone spawned");
        if zone.center.x > 0.0 { Vec2::new(-8.0, 0.0) } else { Vec2::new(8.0, 0.0) }
    }

    fn prey_ids(orch: &LevelOrchestrator) -> Vec<AgentId> {
        orch.prey().iter().map(|p| p.core.id).collect()
    }

    fn panicked(orch: &LevelOrchestrator, id: AgentId) -> bool {
        orch.prey()
            .iter()
            .find(|p| p.core.id == id)
            .is_some_and(|p| p.core.is_panicked())
    }

    #[test]
    fn test_inactive_until_started() {
        let mut orch = orchestrator();
        assert!(!orch.level().is_active);
        orch.tick(SIM_DT);
        assert_eq!(orch.level().time_ticks, 0);
        assert!(orch.prey().is_empty());
    }

    #[test]
    fn test_start_level_spawns_flock() {
        let mut orch = orchestrator();
        orch.start_level(5);

        assert_eq!(orch.prey().len(), 6);
        assert_eq!(orch.predators().len(), 1);
        assert_eq!(orch.level().target_count, 4);
        let zone = orch.zone().expect("zone spawned");
        assert!((zone.radius - 2.0 * 1.8).abs() < 1e-5);

        // Ids in spawn order: prey first, then predators
        assert_eq!(prey_ids(&orch), (1..=6).map(AgentId).collect::<Vec<_>>());
        assert_eq!(orch.predators()[0].core.id, AgentId(7));
    }

    #[test]
    fn test_start_level_is_reentrant() {
        let mut orch = orchestrator();
        orch.start_level(9);
        orch.start_level(9);
        assert_eq!(orch.prey().len(), 10);
        assert_eq!(orch.predators().len(), 5);
        assert_eq!(orch.level().live_count, 0);

        orch.start_level(2);
        assert_eq!(orch.prey().len(), 3);
        assert!(orch.predators().is_empty());
    }

    #[test]
    fn test_level_zero_clamps() {
        let mut orch = orchestrator();
        orch.start_level(0);
        assert_eq!(orch.level().current_level, 1);
        assert_eq!(orch.prey().len(), 2);
    }

    #[test]
    fn test_spawns_clear_of_zone() {
        let mut orch = orchestrator();
        orch.start_level(9);
        let zone = orch.zone().expect("zone spawned").clone();
        let bounds = orch.level().map_bounds;
        for prey in orch.prey() {
            assert!(bounds.contains(prey.core.pos));
            assert!(prey.core.pos.distance(zone.center) >= zone.radius + orch.settings().agent_padding - 1e-4);
        }
    }

    #[test]
    fn test_direct_hit_takes_precedence() {
        let mut orch = orchestrator();
        orch.start_level(2);
        let ids = prey_ids(&orch);
        let p = far_from_zone(&orch);
        orch.teleport_agent(ids[0], p);
        orch.teleport_agent(ids[1], p + Vec2::new(1.0, 0.0));
        orch.teleport_agent(ids[2], p + Vec2::new(0.0, 5.0));

        orch.tick_with_input(&TickInput { tap: Some(p) }, SIM_DT);

        assert!(panicked(&orch, ids[0]));
        // Within proximity range, but the direct hit consumed the tap
        assert!(!panicked(&orch, ids[1]));
        assert!(!panicked(&orch, ids[2]));
    }

    #[test]
    fn test_tap_panic_starts_with_full_duration() {
        let mut orch = orchestrator();
        orch.start_level(2);
        let ids = prey_ids(&orch);
        let p = far_from_zone(&orch);
        orch.teleport_agent(ids[0], p);

        orch.tick_with_input(&TickInput { tap: Some(p) }, SIM_DT);

        let duration = orch.settings().prey.panic_duration;
        let prey = orch.prey().iter().find(|prey| prey.core.id == ids[0]).expect("prey alive");
        assert_eq!(prey.core.phase, PanicPhase::Panicked { remaining: duration });
    }

    #[test]
    fn test_proximity_scares_everyone_in_range() {
        let mut orch = orchestrator();
        orch.start_level(2);
        let ids = prey_ids(&orch);
        let p = far_from_zone(&orch);
        orch.teleport_agent(ids[0], p);
        orch.teleport_agent(ids[1], p + Vec2::new(1.0, 0.0));
        orch.teleport_agent(ids[2], p + Vec2::new(0.0, 5.0));

        let tap = p + Vec2::new(0.0, -1.0);
        orch.tick_with_input(&TickInput { tap: Some(tap) }, SIM_DT);

        assert!(panicked(&orch, ids[0]));
        assert!(panicked(&orch, ids[1]));
        assert!(!panicked(&orch, ids[2]));

        // Fleeing straight away from the tap
        let first = &orch.prey()[0];
        assert!((first.core.heading - Vec2::Y).length() < 1e-5);
        assert_eq!(first.core.speed, orch.settings().prey.panic_speed());
    }

    #[test]
    fn test_tap_off_the_ground_is_ignored() {
        let mut orch = orchestrator();
        orch.start_level(3);
        orch.tick_with_input(
            &TickInput {
                tap: Some(Vec2::new(100.0, 100.0)),
            },
            SIM_DT,
        );
        assert!(orch.prey().iter().all(|p| !p.core.is_panicked()));
    }

    #[test]
    fn test_prey_in_zone_wins_level_one() {
        let hud_log = Rc::new(RefCell::new(Vec::new()));
        let mut orch = orchestrator()
            .with_hud(Box::new(RecordingHud(hud_log.clone())))
            .with_persistence(Box::new(MemoryPrefs::new()));
        orch.start_level(1);
        assert_eq!(hud_log.borrow()[0], HudCall::Reset);
        assert_eq!(hud_log.borrow()[1], HudCall::Update(1, 1, 0, 0));

        let center = orch.zone().expect("zone spawned").center;
        let id = orch.prey()[0].core.id;
        orch.teleport_agent(id, center);
        orch.tick(SIM_DT);

        assert_eq!(orch.outcome(), Some(LevelOutcome::Won));
        assert!(!orch.level().is_active);
        assert_eq!(orch.time_scale(), 0.0);
        assert!(orch.prey()[0].is_safe());

        let calls = hud_log.borrow();
        let n = calls.len();
        assert_eq!(calls[n - 2], HudCall::Update(1, 1, 1, 0));
        assert_eq!(calls[n - 1], HudCall::Win);
    }

    #[test]
    fn test_predator_contacts_lose_level() {
        let mut orch = orchestrator().with_persistence(Box::new(MemoryPrefs::new()));
        orch.start_level(5);
        let predator = orch.predators()[0].core.id;

        for kills in 1..=3 {
            let victim = orch.prey()[0].core.pos;
            orch.teleport_agent(predator, victim);
            orch.tick(SIM_DT);
            assert_eq!(orch.level().death_count, kills);
            assert_eq!(orch.prey().len(), 6 - kills as usize);
        }

        assert_eq!(orch.outcome(), Some(LevelOutcome::Lost));
        assert_eq!(orch.best_level(), BestLevel(1));

        // Frozen: further contacts are ignored
        let victim = orch.prey()[0].core.pos;
        orch.teleport_agent(predator, victim);
        orch.tick(SIM_DT);
        assert_eq!(orch.level().death_count, 3);
    }

    #[test]
    fn test_safe_prey_is_immune() {
        let mut orch = orchestrator();
        orch.start_level(5);
        let center = orch.zone().expect("zone spawned").center;
        let prey = orch.prey()[0].core.id;
        let predator = orch.predators()[0].core.id;

        orch.teleport_agent(prey, center);
        orch.tick(SIM_DT);
        assert!(orch.prey()[0].is_safe());

        let pos = orch.prey()[0].core.pos;
        orch.teleport_agent(predator, pos);
        orch.tick(SIM_DT);
        assert_eq!(orch.level().death_count, 0);
        assert_eq!(orch.prey().len(), 6);
    }

    #[test]
    fn test_win_records_best_level() {
        let mut orch = orchestrator().with_persistence(Box::new(MemoryPrefs::new()));
        orch.start_level(3);
        assert_eq!(orch.best_level(), BestLevel(1));

        // Level 3: 4 prey, target 2
        let center = orch.zone().expect("zone spawned").center;
        let ids = prey_ids(&orch);
        orch.teleport_agent(ids[0], center);
        orch.teleport_agent(ids[1], center);
        orch.tick(SIM_DT);

        assert_eq!(orch.outcome(), Some(LevelOutcome::Won));
        assert_eq!(orch.best_level(), BestLevel(3));

        // Replaying a lower level keeps the record
        orch.start_level(2);
        let center = orch.zone().expect("zone spawned").center;
        let ids = prey_ids(&orch);
        orch.teleport_agent(ids[0], center);
        orch.teleport_agent(ids[1], center);
        orch.tick(SIM_DT);
        assert_eq!(orch.outcome(), Some(LevelOutcome::Won));
        assert_eq!(orch.best_level(), BestLevel(3));
    }

    #[test]
    fn test_level_controls() {
        let mut orch = orchestrator();
        orch.start_level(4);
        orch.next_level();
        assert_eq!(orch.level().current_level, 5);
        assert_eq!(orch.predators().len(), 1);

        orch.add_death_count();
        orch.restart_level();
        assert_eq!(orch.level().current_level, 5);
        assert_eq!(orch.level().death_count, 0);

        orch.restart_game();
        assert_eq!(orch.level().current_level, 1);
        assert_eq!(orch.time_scale(), 1.0);
    }

    #[test]
    fn test_next_level_stops_at_highest() {
        let mut orch = orchestrator();
        orch.start_level(u32::MAX);
        assert_eq!(orch.prey().len(), 10);
        assert_eq!(orch.predators().len(), 5);

        orch.next_level();
        assert_eq!(orch.level().current_level, u32::MAX);
        assert!(orch.level().is_active);
    }

    #[test]
    fn test_walls_keep_agents_inside() {
        let mut orch = orchestrator();
        orch.start_level(9);
        for _ in 0..600 {
            orch.tick(SIM_DT);
            if !orch.level().is_active {
                break;
            }
        }
        let bounds = orch.level().map_bounds;
        for prey in orch.prey() {
            assert!(bounds.contains(prey.core.pos), "prey escaped: {:?}", prey.core.pos);
        }
        for predator in orch.predators() {
            assert!(bounds.contains(predator.core.pos));
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = orchestrator();
        let mut b = orchestrator();
        a.start_level(6);
        b.start_level(6);

        for i in 0..240 {
            let input = TickInput {
                tap: (i % 40 == 0).then(|| Vec2::new(i as f32 * 0.05 - 6.0, 1.0)),
            };
            a.tick_with_input(&input, SIM_DT);
            b.tick_with_input(&input, SIM_DT);
        }

        assert_eq!(a.level(), b.level());
        let positions = |o: &LevelOrchestrator| o.prey().iter().map(|p| p.core.pos).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
        for (pa, pb) in a.predators().iter().zip(b.predators()) {
            assert_eq!(pa.core.pos, pb.core.pos);
        }
    }
}
