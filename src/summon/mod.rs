//! One-shot guarded summon
//!
//! Some relics can call a companion entity into the world exactly once. The
//! guard is a two-state machine: `Available` until the first successful
//! trigger, then `Consumed` forever. Registry interactions (spawn, action
//! retraction) are emitted as commands by the transition rather than called
//! inline, so the transition itself stays pure and testable.
//!
//! Two surfaces reach the trigger: a context-menu verb and an equip-granted
//! instant action. Both are only offered while `Available`, and both
//! re-check the state at trigger time to close the offer/invoke race.

use thiserror::Error;

use crate::engine::{EffectSink, WorldView};
use crate::core::types::{EntityId, Position};

/// Guard state of the summon. `Consumed` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummonState {
    Available,
    Consumed,
}

/// Why a trigger attempt was refused. All variants are handled locally as
/// silent no-ops; none reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("summon already consumed")]
    AlreadyConsumed,
    #[error("no summon template configured")]
    NoTemplate,
    #[error("user lacks the qualifying capability")]
    UserNotQualified,
    #[error("user cannot currently interact")]
    UserIncapacitated,
    #[error("no resolvable spawn location")]
    NoLocation,
}

/// Command emitted by a successful trigger, applied by [`run_summon`].
#[derive(Debug, Clone, PartialEq)]
pub enum SummonCommand {
    Spawn { template: String, at: Position },
    RetractAction { action: String },
}

/// A context-menu verb offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verb {
    pub text_key: String,
    pub priority: i32,
}

/// One-shot summon state owned by a relic instance.
#[derive(Debug, Clone)]
pub struct Summonable {
    pub template: Option<String>,
    pub requires_sanctified_user: bool,
    pub qualifying_capability: String,
    /// Action id registered with the host's action registry while the
    /// summon is still available
    pub action_id: String,
    state: SummonState,
}

impl Summonable {
    pub fn new(
        template: Option<String>,
        requires_sanctified_user: bool,
        qualifying_capability: impl Into<String>,
        action_id: impl Into<String>,
    ) -> Self {
        Self {
            template,
            requires_sanctified_user,
            qualifying_capability: qualifying_capability.into(),
            action_id: action_id.into(),
            state: SummonState::Available,
        }
    }

    pub fn state(&self) -> SummonState {
        self.state
    }

    /// Context-menu surface: the verb is only offered while the summon is
    /// still available and the user qualifies.
    pub fn offer_verb(&self, user: EntityId, world: &impl WorldView) -> Option<Verb> {
        if self.state == SummonState::Consumed || self.template.is_none() {
            return None;
        }
        if self.requires_sanctified_user && !world.has_capability(user, &self.qualifying_capability)
        {
            return None;
        }
        Some(Verb {
            text_key: "summon-verb".into(),
            priority: 2,
        })
    }

    /// Equip surface: the instant action is only granted while available.
    pub fn granted_action(&self) -> Option<&str> {
        match self.state {
            SummonState::Available => Some(&self.action_id),
            SummonState::Consumed => None,
        }
    }

    /// The single legal transition: `Available -> Consumed`.
    ///
    /// Every precondition failure leaves the state untouched. On success
    /// the spawn and retraction are returned as commands; the state change
    /// is already committed when they are handed back.
    pub fn trigger(
        &mut self,
        user: EntityId,
        world: &impl WorldView,
    ) -> Result<Vec<SummonCommand>, GuardError> {
        if self.state == SummonState::Consumed {
            return Err(GuardError::AlreadyConsumed);
        }
        let template = self.template.clone().ok_or(GuardError::NoTemplate)?;
        if self.requires_sanctified_user && !world.has_capability(user, &self.qualifying_capability)
        {
            return Err(GuardError::UserNotQualified);
        }
        if !world.can_interact(user) {
            return Err(GuardError::UserIncapacitated);
        }
        let at = world.position(user).ok_or(GuardError::NoLocation)?;

        self.state = SummonState::Consumed;
        Ok(vec![
            SummonCommand::Spawn { template, at },
            SummonCommand::RetractAction {
                action: self.action_id.clone(),
            },
        ])
    }
}

/// Funnel shared by both trigger surfaces: run the guarded transition and
/// apply its commands. Returns whether the summon happened.
pub fn run_summon(
    summonable: &mut Summonable,
    relic: EntityId,
    user: EntityId,
    world: &impl WorldView,
    effects: &mut impl EffectSink,
) -> bool {
    match summonable.trigger(user, world) {
        Ok(commands) => {
            for command in commands {
                match command {
                    SummonCommand::Spawn { template, at } => {
                        let spawned = effects.spawn(&template, at);
                        tracing::info!(?relic, ?spawned, template, "summon resolved");
                    }
                    SummonCommand::RetractAction { action } => {
                        effects.retract_action(relic, &action);
                    }
                }
            }
            true
        }
        Err(err) => {
            tracing::debug!(?relic, %err, "summon refused");
            false
        }
    }
}
