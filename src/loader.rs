//! Load relic definitions from JSON definition files
//!
//! Content ships relic prototypes as JSON; this module parses them into
//! typed definitions and instantiates live [`Relic`]/[`Summonable`] state
//! from them. Fields omitted by a definition fall back to the global
//! tuning defaults.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::capability::tokens;
use crate::core::config::tuning;
use crate::core::types::DamageSpec;
use crate::interaction::{Relic, RelicConfig};
use crate::summon::Summonable;

/// Errors that can occur when loading relic definitions
#[derive(Debug, Error)]
pub enum LoadError {
    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Referenced definition was not found in the registry
    #[error("Relic definition not found: {0}")]
    DefinitionNotFound(String),
    /// A definition failed validation
    #[error("Invalid relic definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },
    /// File I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn default_cooldown_secs() -> f32 {
    tuning().default_cooldown_secs
}

fn default_fail_chance() -> f32 {
    tuning().default_fail_chance
}

fn default_heal() -> DamageSpec {
    DamageSpec::new("heal", tuning().default_heal_amount)
}

fn default_fail_damage() -> DamageSpec {
    DamageSpec::new("blunt", tuning().default_fail_damage)
}

fn default_unsanctioned_damage() -> DamageSpec {
    DamageSpec::new("holy", tuning().default_unsanctioned_damage)
}

fn default_qualifying_capability() -> String {
    tokens::SANCTIFIED.into()
}

fn default_protective_slot() -> String {
    "head".into()
}

fn default_exempt_tag() -> String {
    "familiar".into()
}

fn default_true() -> bool {
    true
}

/// One relic prototype as it appears in a definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelicDefinition {
    pub id: String,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: f32,
    #[serde(default = "default_fail_chance")]
    pub fail_chance: f32,
    #[serde(default = "default_heal")]
    pub heal_on_success: DamageSpec,
    #[serde(default = "default_fail_damage")]
    pub damage_on_fail: DamageSpec,
    #[serde(default = "default_unsanctioned_damage")]
    pub damage_on_unsanctioned_use: DamageSpec,
    #[serde(default = "default_true")]
    pub requires_sanctified_user: bool,
    #[serde(default = "default_qualifying_capability")]
    pub qualifying_capability: String,
    #[serde(default = "default_protective_slot")]
    pub protective_slot: String,
    #[serde(default = "default_exempt_tag")]
    pub exempt_tag: String,
    pub message_prefix: String,
    #[serde(default)]
    pub unsanctioned_message: Option<String>,
    pub success_sound: String,
    pub fail_sound: String,
    pub unsanctioned_sound: String,
    #[serde(default)]
    pub summon: Option<SummonDefinition>,
}

/// Optional one-shot summon attached to a relic prototype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummonDefinition {
    pub template: String,
    #[serde(default = "default_true")]
    pub requires_sanctified_user: bool,
    pub action_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DefinitionFile {
    relics: Vec<RelicDefinition>,
}

/// Registry of parsed relic prototypes, keyed by id.
#[derive(Debug, Default)]
pub struct RelicRegistry {
    by_id: AHashMap<String, RelicDefinition>,
}

impl RelicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a definition file from a JSON string and add its relics.
    pub fn load_from_json(&mut self, json: &str) -> Result<usize, LoadError> {
        let file: DefinitionFile = serde_json::from_str(json)?;
        let count = file.relics.len();
        for definition in file.relics {
            validate(&definition)?;
            tracing::debug!(id = %definition.id, "loaded relic definition");
            self.by_id.insert(definition.id.clone(), definition);
        }
        Ok(count)
    }

    /// Parse a definition file from disk.
    pub fn load_from_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let content = std::fs::read_to_string(path)?;
        self.load_from_json(&content)
    }

    pub fn get(&self, id: &str) -> Option<&RelicDefinition> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Instantiate live item state from a prototype.
    pub fn instantiate(&self, id: &str) -> Result<(Relic, Option<Summonable>), LoadError> {
        let def = self
            .by_id
            .get(id)
            .ok_or_else(|| LoadError::DefinitionNotFound(id.to_string()))?;

        let config = RelicConfig {
            fail_chance: def.fail_chance,
            damage_on_fail: def.damage_on_fail.clone(),
            damage_on_unsanctioned_use: def.damage_on_unsanctioned_use.clone(),
            heal_on_success: def.heal_on_success.clone(),
            requires_sanctified_user: def.requires_sanctified_user,
            qualifying_capability: def.qualifying_capability.clone(),
            protective_slot: def.protective_slot.clone(),
            exempt_tag: def.exempt_tag.clone(),
            message_prefix: def.message_prefix.clone(),
            unsanctioned_message: def
                .unsanctioned_message
                .clone()
                .unwrap_or_else(|| format!("{}-sizzle", def.message_prefix)),
            success_sound: def.success_sound.clone(),
            fail_sound: def.fail_sound.clone(),
            unsanctioned_sound: def.unsanctioned_sound.clone(),
        };
        let relic = Relic::new(config, Duration::from_secs_f32(def.cooldown_secs));

        let summonable = def.summon.as_ref().map(|s| {
            // An empty template id counts as unconfigured; the guard will
            // refuse the trigger at runtime.
            let template = (!s.template.is_empty()).then(|| s.template.clone());
            Summonable::new(
                template,
                s.requires_sanctified_user,
                def.qualifying_capability.clone(),
                s.action_id.clone(),
            )
        });

        Ok((relic, summonable))
    }
}

fn validate(def: &RelicDefinition) -> Result<(), LoadError> {
    if !(0.0..1.0).contains(&def.fail_chance) {
        return Err(LoadError::InvalidDefinition {
            id: def.id.clone(),
            reason: format!("fail_chance ({}) must be in [0, 1)", def.fail_chance),
        });
    }
    if def.cooldown_secs < 0.0 {
        return Err(LoadError::InvalidDefinition {
            id: def.id.clone(),
            reason: format!("cooldown_secs ({}) must be non-negative", def.cooldown_secs),
        });
    }
    if def.message_prefix.is_empty() {
        return Err(LoadError::InvalidDefinition {
            id: def.id.clone(),
            reason: "message_prefix must not be empty".into(),
        });
    }
    Ok(())
}
