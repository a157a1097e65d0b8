//! Game settings and tunables
//!
//! Persisted separately from progress. On native builds settings live in a
//! JSON file, on the web in LocalStorage.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-species movement and panic tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentTuning {
    /// Cruise speed (world units per second)
    pub base_speed: f32,
    /// Speed multiplier while panicked
    pub panic_multiplier: f32,
    /// Panic duration (seconds)
    pub panic_duration: f32,
    /// Collision body radius
    pub body_radius: f32,
}

impl AgentTuning {
    pub const PREY: Self = Self {
        base_speed: 3.0,
        panic_multiplier: 2.0,
        panic_duration: 1.0,
        body_radius: 0.5,
    };

    // Faster than prey
    pub const PREDATOR: Self = Self {
        base_speed: 4.0,
        panic_multiplier: 2.0,
        panic_duration: 1.0,
        body_radius: 0.5,
    };

    pub fn panic_speed(&self) -> f32 {
        self.base_speed * self.panic_multiplier
    }

    fn validated(self) -> Self {
        Self {
            base_speed: self.base_speed.max(0.0),
            panic_multiplier: self.panic_multiplier.max(1.0),
            panic_duration: self.panic_duration.max(0.0),
            body_radius: self.body_radius.max(0.01),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base RNG seed (mixed with the level number on every level start)
    pub seed: u64,
    /// Fatal contacts allowed before the level is lost
    pub death_limit: u32,
    /// Map half extents used when the host does not supply bounds
    pub arena_half_extents: Vec2,

    // === Agents ===
    pub prey: AgentTuning,
    pub predator: AgentTuning,

    // === Zone ===
    /// Zone radius at level 1 (scaled per level)
    pub zone_base_radius: f32,
    /// How quickly a safe prey turns back toward the zone center
    pub zone_steer_rate: f32,

    // === Stimuli ===
    /// Radius of the proximity stimulus around a ground tap
    pub proximity_radius: f32,
    /// Tolerance around agent bodies for a direct tap
    pub tap_pick_radius: f32,

    // === Spawning ===
    pub agent_padding: f32,
    pub zone_padding: f32,

    // === Predator steering ===
    /// Look-ahead distance of the zone avoidance probe
    pub avoid_probe_distance: f32,
    pub avoid_steer_rate: f32,
    /// Wander re-heading interval bounds (seconds)
    pub wander_interval: (f32, f32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            death_limit: 3,
            arena_half_extents: Vec2::new(12.0, 7.0),

            prey: AgentTuning::PREY,
            predator: AgentTuning::PREDATOR,

            zone_base_radius: 2.0,
            zone_steer_rate: 5.0,

            proximity_radius: 3.0,
            tap_pick_radius: 0.25,

            agent_padding: 1.0,
            zone_padding: 3.0,

            avoid_probe_distance: 5.0,
            avoid_steer_rate: 10.0,
            wander_interval: (1.0, 2.0),
        }
    }
}

impl Settings {
    /// Clamp every tunable into a usable range
    pub fn validated(mut self) -> Self {
        self.death_limit = self.death_limit.max(1);
        self.arena_half_extents = self.arena_half_extents.max(Vec2::splat(1.0));
        self.prey = self.prey.validated();
        self.predator = self.predator.validated();
        self.zone_base_radius = self.zone_base_radius.max(0.1);
        self.zone_steer_rate = self.zone_steer_rate.max(0.0);
        self.proximity_radius = self.proximity_radius.max(0.0);
        self.tap_pick_radius = self.tap_pick_radius.max(0.0);
        self.agent_padding = self.agent_padding.max(0.0);
        self.zone_padding = self.zone_padding.max(0.0);
        self.avoid_probe_distance = self.avoid_probe_distance.max(0.0);
        self.avoid_steer_rate = self.avoid_steer_rate.max(0.0);

        let (lo, hi) = self.wander_interval;
        let lo = lo.max(0.05);
        self.wander_interval = (lo, hi.max(lo));
        self
    }

    /// Parse settings from JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.validated(),
            Err(e) => {
                log::warn!("Malformed settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Settings contain only plain numbers; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) => {
                log::info!("No settings at {} ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), crate::persistence::PersistenceError> {
        std::fs::write(path, self.to_json())?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "herd_dash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.death_limit = 5;
        settings.prey.base_speed = 2.5;

        let parsed = Settings::from_json(&settings.to_json());
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = Settings::from_json(r#"{ "death_limit": 7 }"#);
        assert_eq!(parsed.death_limit, 7);
        assert_eq!(parsed.prey, AgentTuning::PREY);
        assert_eq!(parsed.proximity_radius, 3.0);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let parsed = Settings::from_json("{ not json");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_validated_clamps() {
        let settings = Settings {
            death_limit: 0,
            proximity_radius: -4.0,
            wander_interval: (2.0, 1.0),
            ..Default::default()
        }
        .validated();

        assert_eq!(settings.death_limit, 1);
        assert_eq!(settings.proximity_radius, 0.0);
        assert_eq!(settings.wander_interval, (2.0, 2.0));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("herd_dash_{}_settings.json", std::process::id()));
        let settings = Settings {
            seed: 42,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);

        let _ = std::fs::remove_file(&path);
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_panic_speed() {
        assert_eq!(AgentTuning::PREY.panic_speed(), 6.0);
        assert_eq!(AgentTuning::PREDATOR.panic_speed(), 8.0);
    }
}
