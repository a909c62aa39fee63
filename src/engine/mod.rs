//! Host engine collaborator interfaces
//!
//! Everything this core needs from the surrounding engine is expressed as a
//! trait here: world queries, and the sinks that carry out side effects
//! (feedback popups, vital-state deltas, audio, cooldown display, spawning,
//! action retraction). The host implements these once; tests use recording
//! doubles.

use crate::capability::CapabilitySet;
use crate::core::types::{DamageSpec, EntityId, GameTime, Position};

/// Who a message or sound is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Only this entity
    Entity(EntityId),
    /// Everyone observing `center`, optionally excluding one entity
    /// (used to keep bystander feedback from duplicating user feedback)
    ObserversOf {
        center: EntityId,
        exclude: Option<EntityId>,
    },
}

/// A substitution parameter for a localized message.
///
/// Display-name resolution happens host-side; this core only routes ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageParam {
    Entity(EntityId),
    Count(usize),
}

/// Read (and capability-write) access to the host's entity state.
pub trait WorldView {
    fn has_capability(&self, entity: EntityId, token: &str) -> bool;
    fn capabilities(&self, entity: EntityId) -> Option<&CapabilitySet>;
    fn capabilities_mut(&mut self, entity: EntityId) -> Option<&mut CapabilitySet>;

    /// Whether the entity has a vital state that deltas can act on
    /// (mobs and other alive things, not furniture).
    fn has_vital_state(&self, entity: EntityId) -> bool;

    /// Entity equipped in the named slot, if any.
    fn slot_entity(&self, entity: EntityId, slot: &str) -> Option<EntityId>;

    fn has_tag(&self, entity: EntityId, tag: &str) -> bool;

    /// Action-blocker check: can the entity currently interact at all
    /// (not incapacitated, not restrained)?
    fn can_interact(&self, entity: EntityId) -> bool;

    fn position(&self, entity: EntityId) -> Option<Position>;
}

/// Side-effect sink implemented by the host engine.
pub trait EffectSink {
    fn show_message(&mut self, audience: Audience, key: &str, params: &[(&str, MessageParam)]);

    fn apply_delta(&mut self, entity: EntityId, spec: &DamageSpec, is_heal: bool);

    fn play_sound(&mut self, audience: Audience, sound: &str);

    fn refresh_cooldown_display(&mut self, item: EntityId, start: GameTime, end: GameTime);

    fn spawn(&mut self, template: &str, at: Position) -> EntityId;

    fn retract_action(&mut self, item: EntityId, action: &str);
}
