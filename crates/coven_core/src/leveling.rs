//! Experience and level arithmetic.

use serde::{Deserialize, Serialize};

/// XP needed per level: reaching level `n + 1` takes `n * LEVEL_XP_STEP` xp.
pub const LEVEL_XP_STEP: i64 = 100;

/// A member's position on the level ladder.
///
/// Members without stored progress start at `(0, 0)`. Because the level 0
/// threshold is zero, their first XP gain promotes them to level 1.
///
/// # Examples
///
/// ```
/// use coven_core::LevelProgress;
///
/// let update = LevelProgress::default().apply_xp(10);
/// assert!(update.leveled_up);
/// assert_eq!(update.progress, LevelProgress { xp: 0, level: 1 });
///
/// let update = update.progress.apply_xp(10);
/// assert!(!update.leveled_up);
/// assert_eq!(update.progress.xp, 10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelProgress {
    /// XP accumulated towards the next level
    pub xp: i64,
    /// Current level
    pub level: i64,
}

/// Result of applying an XP change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpdate {
    /// Progress after the change
    pub progress: LevelProgress,
    /// Whether the change crossed the level threshold
    pub leveled_up: bool,
}

impl LevelProgress {
    /// Construct from stored values.
    pub fn new(xp: i64, level: i64) -> Self {
        Self { xp, level }
    }

    /// XP at which the current level rolls over.
    pub fn threshold(&self) -> i64 {
        self.level.saturating_mul(LEVEL_XP_STEP)
    }

    /// Add `delta` xp. Crossing the threshold resets xp to zero and raises
    /// the level by exactly one; any excess is discarded. XP never drops
    /// below zero.
    pub fn apply_xp(self, delta: i64) -> LevelUpdate {
        let xp = self.xp.saturating_add(delta).max(0);
        if xp >= self.threshold() {
            LevelUpdate {
                progress: Self {
                    xp: 0,
                    level: self.level.saturating_add(1),
                },
                leveled_up: true,
            }
        } else {
            LevelUpdate {
                progress: Self { xp, ..self },
                leveled_up: false,
            }
        }
    }

    /// Add `levels` (may be negative), keeping xp. Levels never drop below zero.
    pub fn add_levels(self, levels: i64) -> Self {
        Self {
            level: self.level.saturating_add(levels).max(0),
            ..self
        }
    }

    /// Replace the level, keeping xp.
    pub fn with_level(self, level: i64) -> Self {
        Self {
            level: level.max(0),
            ..self
        }
    }

    /// Replace the xp, keeping the level.
    pub fn with_xp(self, xp: i64) -> Self {
        Self {
            xp: xp.max(0),
            ..self
        }
    }
}
