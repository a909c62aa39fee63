//! Integration tests for the one-shot guarded summon surfaces

use relic_engine::capability::CapabilitySet;
use relic_engine::engine::{Audience, EffectSink, MessageParam, WorldView};
use relic_engine::loader::RelicRegistry;
use relic_engine::core::types::{DamageSpec, EntityId, GameTime, Position};
use relic_engine::summon::{run_summon, SummonState, Summonable};

use ahash::AHashMap;

const DEFINITIONS: &str = r#"{
    "relics": [
        {
            "id": "healing_tome",
            "message_prefix": "tome",
            "success_sound": "sfx/chime",
            "fail_sound": "sfx/thud",
            "unsanctioned_sound": "sfx/sizzle",
            "summon": {
                "template": "mob_familiar",
                "action_id": "summon_familiar"
            }
        }
    ]
}"#;

#[derive(Default)]
struct TestWorld {
    capabilities: AHashMap<EntityId, CapabilitySet>,
}

impl TestWorld {
    fn sanctified_user(&mut self) -> EntityId {
        let id = EntityId::new();
        self.capabilities
            .insert(id, ["sanctified"].into_iter().collect());
        id
    }
}

impl WorldView for TestWorld {
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
    fn has_vital_state(&self, _entity: EntityId) -> bool {
        true
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
    fn position(&self, _entity: EntityId) -> Option<Position> {
        Some(Position::new(1.0, 2.0))
    }
}

#[derive(Default)]
struct Recording {
    spawns: Vec<(String, Position)>,
    retractions: Vec<(EntityId, String)>,
}

impl EffectSink for Recording {
    fn show_message(&mut self, _: Audience, _: &str, _: &[(&str, MessageParam)]) {}
    fn apply_delta(&mut self, _: EntityId, _: &DamageSpec, _: bool) {}
    fn play_sound(&mut self, _: Audience, _: &str) {}
    fn refresh_cooldown_display(&mut self, _: EntityId, _: GameTime, _: GameTime) {}
    fn spawn(&mut self, template: &str, at: Position) -> EntityId {
        self.spawns.push((template.to_string(), at));
        EntityId::new()
    }
    fn retract_action(&mut self, item: EntityId, action: &str) {
        self.retractions.push((item, action.to_string()));
    }
}

fn load_summonable() -> Summonable {
    let mut registry = RelicRegistry::new();
    registry.load_from_json(DEFINITIONS).unwrap();
    registry.instantiate("healing_tome").unwrap().1.unwrap()
}

#[test]
fn summon_spawns_once_and_retracts_the_action() {
    let mut world = TestWorld::default();
    let user = world.sanctified_user();
    let tome = EntityId::new();

    let mut summonable = load_summonable();
    let mut effects = Recording::default();

    assert!(run_summon(&mut summonable, tome, user, &world, &mut effects));
    assert_eq!(
        effects.spawns,
        vec![("mob_familiar".to_string(), Position::new(1.0, 2.0))]
    );
    assert_eq!(
        effects.retractions,
        vec![(tome, "summon_familiar".to_string())]
    );
    assert_eq!(summonable.state(), SummonState::Consumed);
}

/// A second trigger attempt through either surface produces no spawn and no
/// state change.
#[test]
fn second_trigger_through_both_surfaces_does_nothing() {
    let mut world = TestWorld::default();
    let user = world.sanctified_user();
    let tome = EntityId::new();

    let mut summonable = load_summonable();
    let mut effects = Recording::default();
    assert!(run_summon(&mut summonable, tome, user, &world, &mut effects));

    // Verb surface: re-invoking after consumption is refused even if the
    // verb was offered before the first trigger landed.
    let mut late_verb = Recording::default();
    assert!(!run_summon(&mut summonable, tome, user, &world, &mut late_verb));
    assert!(late_verb.spawns.is_empty());
    assert!(late_verb.retractions.is_empty());

    // Action surface: same funnel, same refusal.
    let mut late_action = Recording::default();
    assert!(!run_summon(&mut summonable, tome, user, &world, &mut late_action));
    assert!(late_action.spawns.is_empty());

    assert_eq!(summonable.state(), SummonState::Consumed);
    assert_eq!(effects.spawns.len(), 1);
}

#[test]
fn surfaces_are_withdrawn_after_consumption() {
    let mut world = TestWorld::default();
    let user = world.sanctified_user();
    let tome = EntityId::new();

    let mut summonable = load_summonable();
    assert!(summonable.offer_verb(user, &world).is_some());
    assert_eq!(summonable.granted_action(), Some("summon_familiar"));

    let mut effects = Recording::default();
    run_summon(&mut summonable, tome, user, &world, &mut effects);

    assert!(summonable.offer_verb(user, &world).is_none());
    assert_eq!(summonable.granted_action(), None);
}

#[test]
fn unqualified_user_cannot_summon_or_see_the_verb() {
    let world = TestWorld::default();
    let stranger = EntityId::new();
    let tome = EntityId::new();

    let mut summonable = load_summonable();
    assert!(summonable.offer_verb(stranger, &world).is_none());

    let mut effects = Recording::default();
    assert!(!run_summon(
        &mut summonable,
        tome,
        stranger,
        &world,
        &mut effects
    ));
    assert!(effects.spawns.is_empty());
    assert_eq!(summonable.state(), SummonState::Available);
}
