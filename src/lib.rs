//! Relic Engine - interaction-triggered, cooldown-gated effect resolution

pub mod capability;
pub mod cooldown;
pub mod core;
pub mod engine;
pub mod interaction;
pub mod loader;
pub mod summon;
