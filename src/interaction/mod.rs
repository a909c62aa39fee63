//! Interaction outcome resolution for relic items
//!
//! A relic reacts to a targeted interaction in three stages: the cooldown
//! gate, a pure decision over the world facts and one uniform draw, and a
//! side-effect-only application step against the host sinks. Splitting
//! decision from application keeps the branch selection deterministic and
//! unit-testable with a seeded rng.
//!
//! Every precondition failure is a silent no-op. Nothing here surfaces an
//! error to the user; a blocked attempt is indistinguishable from nothing
//! happening.

use rand::Rng;
use std::time::Duration;

use crate::cooldown::UseCooldown;
use crate::engine::{Audience, EffectSink, MessageParam, WorldView};
use crate::core::types::{DamageSpec, EntityId, GameTime};

/// Per-instance configuration of a relic's interaction behavior.
#[derive(Debug, Clone)]
pub struct RelicConfig {
    /// Chance in [0,1) that an unprotected target takes the fail branch
    pub fail_chance: f32,
    pub damage_on_fail: DamageSpec,
    pub damage_on_unsanctioned_use: DamageSpec,
    pub heal_on_success: DamageSpec,
    /// When set, users lacking `qualifying_capability` take the
    /// unauthorized branch instead of resolving an outcome on the target
    pub requires_sanctified_user: bool,
    pub qualifying_capability: String,
    /// Equipment slot whose occupant shields the target from the fail roll
    pub protective_slot: String,
    /// Tag exempting the target from the fail roll
    pub exempt_tag: String,
    /// Prefix composed into the four heal feedback keys
    pub message_prefix: String,
    /// Fixed key for the unauthorized-use warning
    pub unsanctioned_message: String,
    pub success_sound: String,
    pub fail_sound: String,
    pub unsanctioned_sound: String,
}

/// One targeted interaction event as delivered by the host.
///
/// Ephemeral; lives for exactly one resolution.
#[derive(Debug, Clone, Copy)]
pub struct InteractionAttempt {
    pub relic: EntityId,
    pub user: EntityId,
    pub target: Option<EntityId>,
    /// Pass-through reachability from the interaction source
    pub can_reach: bool,
    pub now: GameTime,
}

/// The resolved result of one interaction attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A precondition failed; applying this branch does nothing
    NoEligibleUser,
    /// The user was unqualified and takes the punitive delta themselves
    UnauthorizedUse { user: EntityId, damage: DamageSpec },
    /// The fail roll landed: the target takes damage
    Fail { target: EntityId, damage: DamageSpec },
    /// The target is healed
    Success { target: EntityId, heal: DamageSpec },
}

/// A relic item instance: interaction config plus its cooldown state.
#[derive(Debug, Clone)]
pub struct Relic {
    pub config: RelicConfig,
    pub cooldown: UseCooldown,
}

impl Relic {
    pub fn new(config: RelicConfig, cooldown: Duration) -> Self {
        Self {
            config,
            cooldown: UseCooldown::new(cooldown),
        }
    }

    /// Handle one targeted interaction event.
    ///
    /// Runs the cooldown gate, decides the outcome, applies its effects,
    /// and returns the chosen branch.
    pub fn on_after_interact(
        &mut self,
        attempt: InteractionAttempt,
        world: &impl WorldView,
        effects: &mut impl EffectSink,
        rng: &mut impl Rng,
    ) -> Outcome {
        if !attempt.can_reach {
            return Outcome::NoEligibleUser;
        }
        if !self.cooldown.try_begin_use(attempt.now) {
            tracing::debug!(relic = ?attempt.relic, "interaction gated by cooldown");
            return Outcome::NoEligibleUser;
        }
        effects.refresh_cooldown_display(
            attempt.relic,
            self.cooldown.last_use,
            self.cooldown.cooldown_end,
        );

        let outcome = decide_outcome(&self.config, attempt.user, attempt.target, world, rng);
        tracing::debug!(relic = ?attempt.relic, ?outcome, "interaction resolved");
        apply_outcome(&self.config, attempt.relic, attempt.user, &outcome, effects);
        outcome
    }
}

/// Pure branch selection: no mutation, no side effects.
///
/// Deterministic given the world facts and the rng's next draw.
pub fn decide_outcome(
    config: &RelicConfig,
    user: EntityId,
    target: Option<EntityId>,
    world: &impl WorldView,
    rng: &mut impl Rng,
) -> Outcome {
    let Some(target) = target else {
        return Outcome::NoEligibleUser;
    };
    if target == user || !world.has_vital_state(target) {
        return Outcome::NoEligibleUser;
    }

    if config.requires_sanctified_user
        && !world.has_capability(user, &config.qualifying_capability)
    {
        return Outcome::UnauthorizedUse {
            user,
            damage: config.damage_on_unsanctioned_use.clone(),
        };
    }

    // The fail roll only happens on targets that are neither shielded by
    // the protective slot nor carrying the exemption tag. Draw is in
    // [0,1); strictly-below comparison keeps fail_chance == 0 unreachable.
    if world.slot_entity(target, &config.protective_slot).is_none()
        && !world.has_tag(target, &config.exempt_tag)
        && rng.gen::<f32>() < config.fail_chance
    {
        return Outcome::Fail {
            target,
            damage: config.damage_on_fail.clone(),
        };
    }

    Outcome::Success {
        target,
        heal: config.heal_on_success.clone(),
    }
}

/// Apply the side effects of a chosen branch against the host sinks.
pub fn apply_outcome(
    config: &RelicConfig,
    relic: EntityId,
    user: EntityId,
    outcome: &Outcome,
    effects: &mut impl EffectSink,
) {
    match outcome {
        Outcome::NoEligibleUser => {}

        Outcome::UnauthorizedUse { user, damage } => {
            effects.show_message(
                Audience::Entity(*user),
                &config.unsanctioned_message,
                &[("user", MessageParam::Entity(*user))],
            );
            effects.play_sound(
                Audience::ObserversOf {
                    center: *user,
                    exclude: None,
                },
                &config.unsanctioned_sound,
            );
            effects.apply_delta(*user, damage, false);
        }

        Outcome::Fail { target, damage } => {
            show_pair(config, effects, relic, user, *target, "heal-fail");
            effects.play_sound(
                Audience::ObserversOf {
                    center: *target,
                    exclude: None,
                },
                &config.fail_sound,
            );
            effects.apply_delta(*target, damage, false);
        }

        Outcome::Success { target, heal } => {
            show_pair(config, effects, relic, user, *target, "heal-success");
            effects.play_sound(
                Audience::ObserversOf {
                    center: *target,
                    exclude: None,
                },
                &config.success_sound,
            );
            effects.apply_delta(*target, heal, true);
        }
    }
}

/// Emit the bystander/user message pair for a resolved branch.
///
/// Bystander feedback excludes the user, who gets a separately-worded
/// message of their own.
fn show_pair(
    config: &RelicConfig,
    effects: &mut impl EffectSink,
    relic: EntityId,
    user: EntityId,
    target: EntityId,
    stem: &str,
) {
    let others_key = format!("{}-{}-others", config.message_prefix, stem);
    effects.show_message(
        Audience::ObserversOf {
            center: user,
            exclude: Some(user),
        },
        &others_key,
        &[
            ("user", MessageParam::Entity(user)),
            ("target", MessageParam::Entity(target)),
            ("relic", MessageParam::Entity(relic)),
        ],
    );

    let self_key = format!("{}-{}-self", config.message_prefix, stem);
    effects.show_message(
        Audience::Entity(user),
        &self_key,
        &[
            ("target", MessageParam::Entity(target)),
            ("relic", MessageParam::Entity(relic)),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilitySet;
    use crate::core::types::Position;
    use ahash::AHashMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Facts {
        capabilities: AHashMap<EntityId, CapabilitySet>,
        vital: Vec<EntityId>,
        shielded: Vec<EntityId>,
        tagged: Vec<EntityId>,
    }

    impl Facts {
        fn new() -> Self {
            Self {
                capabilities: AHashMap::new(),
                vital: Vec::new(),
                shielded: Vec::new(),
                tagged: Vec::new(),
            }
        }
    }

    impl WorldView for Facts {
        fn has_capability(&self, entity: EntityId, token: &str) -> bool {
            self.capabilities
                .get(&entity)
                .is_some_and(|set| set.contains(token))
        }
        fn capabilities(&self, entity: EntityId) -> Option<&CapabilitySet> {
            self.capabilities.get(&entity)
        }
        fn capabilities_mut(&mut self, entity: EntityId) -> Option<&mut CapabilitySet> {
            self.capabilities.get_mut(&entity)
        }
        fn has_vital_state(&self, entity: EntityId) -> bool {
            self.vital.contains(&entity)
        }
        fn slot_entity(&self, entity: EntityId, _slot: &str) -> Option<EntityId> {
            self.shielded.contains(&entity).then(EntityId::new)
        }
        fn has_tag(&self, entity: EntityId, _tag: &str) -> bool {
            self.tagged.contains(&entity)
        }
        fn can_interact(&self, _entity: EntityId) -> bool {
            true
        }
        fn position(&self, _entity: EntityId) -> Option<Position> {
            Some(Position::default())
        }
    }

    fn test_config(fail_chance: f32) -> RelicConfig {
        RelicConfig {
            fail_chance,
            damage_on_fail: DamageSpec::new("blunt", 15.0),
            damage_on_unsanctioned_use: DamageSpec::new("holy", 10.0),
            heal_on_success: DamageSpec::new("heal", 20.0),
            requires_sanctified_user: true,
            qualifying_capability: "sanctified".into(),
            protective_slot: "head".into(),
            exempt_tag: "familiar".into(),
            message_prefix: "tome".into(),
            unsanctioned_message: "tome-sizzle".into(),
            success_sound: "sfx/chime".into(),
            fail_sound: "sfx/thud".into(),
            unsanctioned_sound: "sfx/sizzle".into(),
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn missing_target_is_silent() {
        let facts = Facts::new();
        let user = EntityId::new();
        let out = decide_outcome(&test_config(0.0), user, None, &facts, &mut rng());
        assert_eq!(out, Outcome::NoEligibleUser);
    }

    #[test]
    fn self_target_is_silent() {
        let mut facts = Facts::new();
        let user = EntityId::new();
        facts.vital.push(user);
        let out = decide_outcome(&test_config(0.0), user, Some(user), &facts, &mut rng());
        assert_eq!(out, Outcome::NoEligibleUser);
    }

    #[test]
    fn non_vital_target_is_silent() {
        let facts = Facts::new();
        let user = EntityId::new();
        let crate_entity = EntityId::new();
        let out = decide_outcome(
            &test_config(0.0),
            user,
            Some(crate_entity),
            &facts,
            &mut rng(),
        );
        assert_eq!(out, Outcome::NoEligibleUser);
    }

    #[test]
    fn unqualified_user_takes_self_harm_branch() {
        let mut facts = Facts::new();
        let user = EntityId::new();
        let target = EntityId::new();
        facts.vital.push(target);
        let out = decide_outcome(&test_config(0.0), user, Some(target), &facts, &mut rng());
        assert_eq!(
            out,
            Outcome::UnauthorizedUse {
                user,
                damage: DamageSpec::new("holy", 10.0)
            }
        );
    }

    #[test]
    fn zero_fail_chance_never_fails() {
        let mut facts = Facts::new();
        let user = EntityId::new();
        let target = EntityId::new();
        facts.vital.push(target);
        facts
            .capabilities
            .insert(user, ["sanctified"].into_iter().collect());

        let config = test_config(0.0);
        let mut rng = rng();
        for _ in 0..200 {
            let out = decide_outcome(&config, user, Some(target), &facts, &mut rng);
            assert!(matches!(out, Outcome::Success { .. }));
        }
    }

    #[test]
    fn near_certain_fail_chance_never_succeeds() {
        let mut facts = Facts::new();
        let user = EntityId::new();
        let target = EntityId::new();
        facts.vital.push(target);
        facts
            .capabilities
            .insert(user, ["sanctified"].into_iter().collect());

        // f32 draws in [0,1) land strictly below 1.0 - f32::EPSILON in
        // practice for any realistic sample count
        let config = test_config(1.0 - f32::EPSILON);
        let mut rng = rng();
        for _ in 0..200 {
            let out = decide_outcome(&config, user, Some(target), &facts, &mut rng);
            assert!(matches!(out, Outcome::Fail { .. }));
        }
    }

    #[test]
    fn protective_slot_skips_fail_roll() {
        let mut facts = Facts::new();
        let user = EntityId::new();
        let target = EntityId::new();
        facts.vital.push(target);
        facts.shielded.push(target);
        facts
            .capabilities
            .insert(user, ["sanctified"].into_iter().collect());

        let config = test_config(1.0 - f32::EPSILON);
        let out = decide_outcome(&config, user, Some(target), &facts, &mut rng());
        assert!(matches!(out, Outcome::Success { .. }));
    }

    #[test]
    fn exemption_tag_skips_fail_roll() {
        let mut facts = Facts::new();
        let user = EntityId::new();
        let target = EntityId::new();
        facts.vital.push(target);
        facts.tagged.push(target);
        facts
            .capabilities
            .insert(user, ["sanctified"].into_iter().collect());

        let config = test_config(1.0 - f32::EPSILON);
        let out = decide_outcome(&config, user, Some(target), &facts, &mut rng());
        assert!(matches!(out, Outcome::Success { .. }));
    }

    #[test]
    fn capability_not_required_when_flag_unset() {
        let mut facts = Facts::new();
        let user = EntityId::new();
        let target = EntityId::new();
        facts.vital.push(target);

        let mut config = test_config(0.0);
        config.requires_sanctified_user = false;
        let out = decide_outcome(&config, user, Some(target), &facts, &mut rng());
        assert!(matches!(out, Outcome::Success { .. }));
    }
}
