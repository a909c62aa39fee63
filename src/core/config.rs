//! Engine tuning with documented constants
//!
//! Default values for relic definitions are collected here with explanations
//! of their purpose and how they interact with each other.

/// Tuning defaults applied to relic definitions that omit a field
///
/// These values have been tuned against the reference content set.
/// Changing them will affect gameplay pacing and feel.
#[derive(Debug, Clone)]
pub struct RelicTuning {
    /// Seconds between permitted uses of a relic
    ///
    /// While the cooldown is running, interaction attempts are silent
    /// no-ops. Long enough that spamming a relic is never the optimal
    /// play, short enough to stay usable mid-encounter.
    pub default_cooldown_secs: f32,

    /// Chance in [0,1) that an unprotected target takes the fail branch
    ///
    /// Roughly one use in three backfiring keeps the mechanic risky
    /// without making it feel purely punitive.
    pub default_fail_chance: f32,

    /// Healing applied to the target on the success branch
    pub default_heal_amount: f32,

    /// Damage applied to the target on the fail branch
    pub default_fail_damage: f32,

    /// Damage applied to the *user* when they lack the qualifying
    /// capability
    ///
    /// Self-harm rather than target-harm: unsanctioned users learn the
    /// rule without griefing their target.
    pub default_unsanctioned_damage: f32,
}

impl Default for RelicTuning {
    fn default() -> Self {
        Self {
            default_cooldown_secs: 12.0,
            default_fail_chance: 0.34,
            default_heal_amount: 20.0,
            default_fail_damage: 15.0,
            default_unsanctioned_damage: 10.0,
        }
    }
}

impl RelicTuning {
    /// Validate tuning invariants, returning a description of the first
    /// violation found.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.default_fail_chance) {
            return Err(format!(
                "default_fail_chance ({}) must be in [0, 1)",
                self.default_fail_chance
            ));
        }
        if self.default_cooldown_secs < 0.0 {
            return Err(format!(
                "default_cooldown_secs ({}) must be non-negative",
                self.default_cooldown_secs
            ));
        }
        if self.default_heal_amount < 0.0 || self.default_fail_damage < 0.0 {
            return Err("Effect magnitudes must be non-negative".into());
        }
        Ok(())
    }
}

// === GLOBAL TUNING ACCESS ===

use std::sync::OnceLock;

static TUNING: OnceLock<RelicTuning> = OnceLock::new();

/// Get the global tuning (initializes with defaults if not set)
pub fn tuning() -> &'static RelicTuning {
    TUNING.get_or_init(RelicTuning::default)
}

/// Set the global tuning (can only be called once)
///
/// Returns Err if tuning was already set.
pub fn set_tuning(tuning: RelicTuning) -> Result<(), RelicTuning> {
    TUNING.set(tuning)
}
