//! Capability sets and the merge resolver
//!
//! A capability is an opaque permission token attached to an entity. The
//! merge resolver implements the one-directional absorb used by attuning
//! sigils: the source holder's set grows by union with the target's, and
//! feedback is classified by how many tokens were actually new.
//!
//! The union itself is a pure function over two immutable snapshots;
//! mutation happens in a single commit step so the idempotence and
//! commutativity properties stay independently testable.

use ahash::AHashSet;

use crate::engine::{Audience, EffectSink, MessageParam, WorldView};
use crate::core::types::EntityId;

/// Well-known capability tokens used by the reference content set.
pub mod tokens {
    /// Users allowed to wield sanctified relics without harm
    pub const SANCTIFIED: &str = "sanctified";
}

/// An unordered set of unique capability tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    tokens: AHashSet<String>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.tokens.insert(token.into())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Commit step of the merge: replace self with `union_of(self, other)`.
    ///
    /// Returns how many tokens were added. Absorbing the same set twice
    /// always returns 0 the second time.
    pub fn absorb(&mut self, other: &CapabilitySet) -> usize {
        let merged = union_of(self, other);
        let added = merged.len() - self.len();
        *self = merged;
        added
    }
}

impl<S: Into<String>> FromIterator<S> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Pure set union of two capability snapshots.
///
/// Commutative and idempotent as a value operation; holder mutation
/// direction is decided by the caller via [`CapabilitySet::absorb`].
pub fn union_of(a: &CapabilitySet, b: &CapabilitySet) -> CapabilitySet {
    CapabilitySet {
        tokens: a.tokens.union(&b.tokens).cloned().collect(),
    }
}

/// Result of a merge attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// One of the holders has no capability set; nothing happened and no
    /// feedback was produced.
    NotApplicable,
    /// The source holder absorbed the target's set.
    Merged { added: usize },
}

/// The merge-on-interact behavior of an attuning sigil.
///
/// Applying the sigil to another holder absorbs that holder's capabilities
/// into the sigil's own set. The message prefix lets content reskin the
/// feedback keys.
#[derive(Debug, Clone)]
pub struct CapabilityMerger {
    pub message_prefix: String,
}

impl CapabilityMerger {
    pub fn new(message_prefix: impl Into<String>) -> Self {
        Self {
            message_prefix: message_prefix.into(),
        }
    }

    /// Absorb `target`'s capabilities into `source` and report the result.
    ///
    /// Silent no-op when either holder lacks a capability set.
    pub fn on_interact(
        &self,
        world: &mut impl WorldView,
        source: EntityId,
        target: EntityId,
        effects: &mut impl EffectSink,
    ) -> MergeOutcome {
        let Some(target_set) = world.capabilities(target).cloned() else {
            return MergeOutcome::NotApplicable;
        };
        let Some(source_set) = world.capabilities_mut(source) else {
            return MergeOutcome::NotApplicable;
        };

        let added = source_set.absorb(&target_set);
        tracing::debug!(?source, ?target, added, "capability merge");

        let audience = Audience::ObserversOf {
            center: target,
            exclude: None,
        };
        let key = match added {
            0 => format!("{}-no-new", self.message_prefix),
            1 => format!("{}-added-one", self.message_prefix),
            _ => format!("{}-added-many", self.message_prefix),
        };
        let params = [
            ("holder", MessageParam::Entity(target)),
            ("count", MessageParam::Count(added)),
        ];
        effects.show_message(audience, &key, &params);

        MergeOutcome::Merged { added }
    }
}
