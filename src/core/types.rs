//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic simulation timestamp, measured from world start.
///
/// The host engine owns the clock; this core only compares and advances
/// timestamps it is handed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GameTime(pub Duration);

impl GameTime {
    pub const ZERO: GameTime = GameTime(Duration::ZERO);

    pub fn from_secs_f32(secs: f32) -> Self {
        Self(Duration::from_secs_f32(secs))
    }
}

impl Add<Duration> for GameTime {
    type Output = GameTime;
    fn add(self, rhs: Duration) -> GameTime {
        GameTime(self.0 + rhs)
    }
}

/// 2D world position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A single vital-state delta: what kind of damage (or healing) and how much.
///
/// Interpretation of `kind` is owned by the host's damage system; this core
/// treats it as opaque routing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageSpec {
    pub kind: String,
    pub amount: f32,
}

impl DamageSpec {
    pub fn new(kind: impl Into<String>, amount: f32) -> Self {
        Self {
            kind: kind.into(),
            amount,
        }
    }
}
