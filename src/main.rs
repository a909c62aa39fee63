//! Relic Engine - Demo Driver
//!
//! Wires a small in-memory world and console sinks through one scripted
//! scenario of each mechanic: the healing tome interaction, the attuning
//! sigil capability merge, and the one-shot familiar summon.

use relic_engine::capability::{tokens, CapabilityMerger, CapabilitySet};
use relic_engine::engine::{Audience, EffectSink, MessageParam, WorldView};
use relic_engine::interaction::InteractionAttempt;
use relic_engine::loader::RelicRegistry;
use relic_engine::core::types::{DamageSpec, EntityId, GameTime, Position};
use relic_engine::summon::run_summon;

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

const DEMO_DEFINITIONS: &str = r#"{
    "relics": [
        {
            "id": "healing_tome",
            "cooldown_secs": 12.0,
            "fail_chance": 0.34,
            "message_prefix": "tome",
            "success_sound": "sfx/relic/chime",
            "fail_sound": "sfx/relic/thud",
            "unsanctioned_sound": "sfx/relic/sizzle",
            "summon": {
                "template": "mob_familiar",
                "action_id": "summon_familiar"
            }
        }
    ]
}"#;

struct DemoWorld {
    names: AHashMap<EntityId, String>,
    capabilities: AHashMap<EntityId, CapabilitySet>,
    vital: Vec<EntityId>,
    positions: AHashMap<EntityId, Position>,
}

impl DemoWorld {
    fn new() -> Self {
        Self {
            names: AHashMap::new(),
            capabilities: AHashMap::new(),
            vital: Vec::new(),
            positions: AHashMap::new(),
        }
    }

    fn spawn_person(&mut self, name: &str) -> EntityId {
        let id = EntityId::new();
        self.names.insert(id, name.to_string());
        self.capabilities.insert(id, CapabilitySet::new());
        self.vital.push(id);
        self.positions.insert(id, Position::default());
        id
    }

    fn name(&self, id: EntityId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("???")
    }
}

impl WorldView for DemoWorld {
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
    fn slot_entity(&self, _entity: EntityId, _slot: &str) -> Option<EntityId> {
        None
    }
    fn has_tag(&self, _entity: EntityId, _tag: &str) -> bool {
        false
    }
    fn can_interact(&self, _entity: EntityId) -> bool {
        true
    }
    fn position(&self, entity: EntityId) -> Option<Position> {
        self.positions.get(&entity).copied()
    }
}

/// Console sink: prints every effect instead of dispatching to an engine.
struct ConsoleEffects {
    names: AHashMap<EntityId, String>,
}

impl ConsoleEffects {
    fn describe(&self, audience: Audience) -> String {
        match audience {
            Audience::Entity(e) => format!("[to {}]", self.name(e)),
            Audience::ObserversOf { center, exclude } => match exclude {
                Some(excluded) => {
                    format!("[near {}, except {}]", self.name(center), self.name(excluded))
                }
                None => format!("[near {}]", self.name(center)),
            },
        }
    }

    fn name(&self, id: EntityId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("???")
    }
}

impl EffectSink for ConsoleEffects {
    fn show_message(&mut self, audience: Audience, key: &str, params: &[(&str, MessageParam)]) {
        let rendered: Vec<String> = params
            .iter()
            .map(|(name, param)| match param {
                MessageParam::Entity(e) => format!("{name}={}", self.name(*e)),
                MessageParam::Count(n) => format!("{name}={n}"),
            })
            .collect();
        println!("  {} {} {{{}}}", self.describe(audience), key, rendered.join(", "));
    }

    fn apply_delta(&mut self, entity: EntityId, spec: &DamageSpec, is_heal: bool) {
        let verb = if is_heal { "heals" } else { "damages" };
        println!(
            "  {} {} for {} {}",
            verb, self.name(entity), spec.amount, spec.kind
        );
    }

    fn play_sound(&mut self, audience: Audience, sound: &str) {
        println!("  {} plays {sound}", self.describe(audience));
    }

    fn refresh_cooldown_display(&mut self, item: EntityId, start: GameTime, end: GameTime) {
        println!(
            "  cooldown display for {}: {:?} -> {:?}",
            self.name(item), start.0, end.0
        );
    }

    fn spawn(&mut self, template: &str, at: Position) -> EntityId {
        let id = EntityId::new();
        self.names.insert(id, template.to_string());
        println!("  spawns {template} at ({}, {})", at.x, at.y);
        id
    }

    fn retract_action(&mut self, item: EntityId, action: &str) {
        println!("  retracts action {action} from {}", self.name(item));
    }
}

fn main() -> relic_engine::core::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("relic_engine=debug")
        .init();

    tracing::info!("Relic Engine demo starting...");

    let mut registry = RelicRegistry::new();
    registry.load_from_json(DEMO_DEFINITIONS)?;

    let mut world = DemoWorld::new();
    let cleric = world.spawn_person("Vessa");
    let patient = world.spawn_person("Odo");
    world
        .capabilities_mut(cleric)
        .unwrap()
        .insert(tokens::SANCTIFIED);

    let tome = EntityId::new();
    world.names.insert(tome, "healing tome".into());
    let (mut relic, summonable) = registry.instantiate("healing_tome")?;
    let mut summonable = summonable.expect("demo relic carries a summon");

    let mut effects = ConsoleEffects {
        names: world.names.clone(),
    };
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    println!("\n=== unauthorized use ===");
    let attempt = InteractionAttempt {
        relic: tome,
        user: patient,
        target: Some(cleric),
        can_reach: true,
        now: GameTime::ZERO,
    };
    relic.on_after_interact(attempt, &world, &mut effects, &mut rng);

    println!("\n=== sanctified use, after cooldown ===");
    let attempt = InteractionAttempt {
        relic: tome,
        user: cleric,
        target: Some(patient),
        can_reach: true,
        now: GameTime::ZERO + Duration::from_secs(13),
    };
    relic.on_after_interact(attempt, &world, &mut effects, &mut rng);

    println!("\n=== immediate retry is silently gated ===");
    let attempt = InteractionAttempt {
        relic: tome,
        user: cleric,
        target: Some(patient),
        can_reach: true,
        now: GameTime::ZERO + Duration::from_secs(14),
    };
    relic.on_after_interact(attempt, &world, &mut effects, &mut rng);

    println!("\n=== attuning sigil merge ===");
    let sigil = EntityId::new();
    world.names.insert(sigil, "attuning sigil".into());
    world
        .capabilities
        .insert(sigil, ["engineering"].into_iter().collect());
    let keycard = EntityId::new();
    world.names.insert(keycard, "bridge keycard".into());
    world
        .capabilities
        .insert(keycard, ["engineering", "bridge", "armory"].into_iter().collect());
    effects.names = world.names.clone();

    let merger = CapabilityMerger::new("sigil");
    merger.on_interact(&mut world, sigil, keycard, &mut effects);
    merger.on_interact(&mut world, sigil, keycard, &mut effects);

    println!("\n=== familiar summon, twice ===");
    let first = run_summon(&mut summonable, tome, cleric, &world, &mut effects);
    let second = run_summon(&mut summonable, tome, cleric, &world, &mut effects);
    println!("  first: {first}, second: {second}");

    tracing::info!("demo complete");
    Ok(())
}
