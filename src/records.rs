//! Best level record
//!
//! Stored as a single integer in the persistence collaborator. Only wins
//! update it.

use crate::consts::BEST_LEVEL_KEY;
use crate::persistence::Persistence;

/// Best level reached (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestLevel(pub u32);

impl BestLevel {
    /// Load the record, defaulting to level 1
    pub fn load(prefs: &dyn Persistence) -> Self {
        let raw = prefs.get_int(BEST_LEVEL_KEY, 1);
        Self(u32::try_from(raw).unwrap_or(1).max(1))
    }

    /// Check if a won level beats the record
    pub fn qualifies(&self, level: u32) -> bool {
        level > self.0
    }

    /// Record a win. Returns true if the stored value changed.
    pub fn record_win(prefs: &mut dyn Persistence, level: u32) -> bool {
        let best = Self::load(prefs);
        if !best.qualifies(level) {
            return false;
        }
        let value = i32::try_from(level).unwrap_or(i32::MAX);
        prefs.set_int(BEST_LEVEL_KEY, value);
        prefs.save();
        log::info!("New best level: {} (was {})", level, best.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPrefs;

    #[test]
    fn test_default_is_level_one() {
        let prefs = MemoryPrefs::new();
        assert_eq!(BestLevel::load(&prefs), BestLevel(1));
    }

    #[test]
    fn test_record_win_keeps_max() {
        let mut prefs = MemoryPrefs::new();
        assert!(BestLevel::record_win(&mut prefs, 3));
        assert_eq!(BestLevel::load(&prefs), BestLevel(3));

        // Lower level does not overwrite
        assert!(!BestLevel::record_win(&mut prefs, 2));
        assert_eq!(BestLevel::load(&prefs), BestLevel(3));
        assert_eq!(prefs.saves, 1);
    }

    #[test]
    fn test_garbage_value_reads_as_one() {
        let mut prefs = MemoryPrefs::new();
        prefs.set_int(BEST_LEVEL_KEY, -4);
        assert_eq!(BestLevel::load(&prefs), BestLevel(1));
    }
}
