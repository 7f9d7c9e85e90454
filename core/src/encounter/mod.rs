//! Live session state: the mutable aggregate for one candidate encounter.

pub mod entity;
pub mod stats;

use hashbrown::HashMap;
use serde::Serialize;

use crate::context::{Sym, empty_sym, serialize_sym};
use entity::Entity;
use stats::DamageStatistics;

/// Identity of the telemetry source's own character, tracked separately from
/// generic entity resolution because its id is reassigned on loading screens.
#[derive(Debug, Clone, Serialize)]
pub struct LocalPlayer {
    pub id: u64,
    #[serde(serialize_with = "serialize_sym")]
    pub name: Sym,
    pub gear_level: f32,
}

impl Default for LocalPlayer {
    fn default() -> Self {
        Self {
            id: 0,
            name: empty_sym(),
            gear_level: 0.0,
        }
    }
}

/// One candidate encounter: entity store plus session-wide aggregates.
///
/// Mutated only by the event handlers; finalized exactly once, after which it
/// is immutable and ready to hand off as the output aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: u64,
    /// Epoch ms of the first accepted damage event, 0 until then.
    pub first_packet: i64,
    /// Epoch ms of the most recent decoded record.
    pub last_packet: i64,
    pub paused: bool,
    pub finalized: bool,
    pub local: LocalPlayer,
    #[serde(serialize_with = "serialize_entities")]
    entities: HashMap<u64, Entity>,
    /// Display name → entity id, kept in sync on insert/realias. Used when
    /// an id is reassigned mid-session.
    #[serde(skip)]
    names: HashMap<Sym, u64>,
    pub damage_stats: DamageStatistics,
    #[serde(skip)]
    boss_alive: bool,
}

impl Session {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            first_packet: 0,
            last_packet: 0,
            paused: false,
            finalized: false,
            local: LocalPlayer::default(),
            entities: HashMap::new(),
            names: HashMap::new(),
            damage_stats: DamageStatistics::default(),
            boss_alive: false,
        }
    }

    // --- Entity store ---

    pub fn entity(&self, id: u64) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: u64) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Resolution policy shared by all handlers: id first, display name as
    /// fallback. Returns the id the entity is currently stored under.
    pub fn resolve_id(&self, id: u64, name: Sym) -> Option<u64> {
        if self.entities.contains_key(&id) {
            return Some(id);
        }
        self.names
            .get(&name)
            .copied()
            .filter(|known| self.entities.contains_key(known))
    }

    pub fn insert(&mut self, entity: Entity) {
        self.names.insert(entity.name, entity.id);
        self.entities.insert(entity.id, entity);
    }

    pub fn remove(&mut self, id: u64) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        if self.names.get(&entity.name) == Some(&id) {
            self.names.remove(&entity.name);
        }
        Some(entity)
    }

    /// Rename an entity in place, keeping the name index in sync so later
    /// records can still resolve it by its current name.
    pub fn rename(&mut self, id: u64, name: Sym) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        let old = entity.name;
        if old == name {
            return;
        }
        entity.name = name;
        if self.names.get(&old) == Some(&id) {
            self.names.remove(&old);
        }
        self.names.insert(name, id);
    }

    /// Re-key an entity under a new id (id reassignment after a loading
    /// screen, or a damage event naming a known entity by a fresh id).
    pub fn realias(&mut self, old_id: u64, new_id: u64) {
        if old_id == new_id {
            return;
        }
        if let Some(mut entity) = self.entities.remove(&old_id) {
            entity.id = new_id;
            self.names.insert(entity.name, new_id);
            self.entities.insert(new_id, entity);
        }
    }

    pub fn retain_entities<F: FnMut(&Entity) -> bool>(&mut self, mut keep: F) {
        self.entities.retain(|_, e| keep(e));
        let entities = &self.entities;
        self.names.retain(|_, id| entities.contains_key(id));
    }

    // --- Boss presence ---

    pub fn boss_alive(&self) -> bool {
        self.boss_alive
    }

    pub fn refresh_boss_alive(&mut self) {
        self.boss_alive = self
            .entities
            .values()
            .any(|e| e.kind.is_boss_grade() && e.is_alive());
    }

    /// The boss-grade entity with the largest max HP; the segmenter's
    /// validity heuristic is judged against it.
    pub fn primary_boss(&self) -> Option<&Entity> {
        self.entities
            .values()
            .filter(|e| e.kind.is_boss_grade())
            .max_by_key(|e| e.max_hp)
    }

    // --- Timing ---

    pub fn duration_ms(&self) -> i64 {
        if self.first_packet == 0 {
            return 0;
        }
        (self.last_packet - self.first_packet).max(0)
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms() as f64 / 1000.0
    }
}

/// Serialize the entity store as a list sorted by damage dealt, the shape
/// the persistence/transport collaborator expects.
fn serialize_entities<S>(map: &HashMap<u64, Entity>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut entities: Vec<&Entity> = map.values().collect();
    entities.sort_by(|a, b| {
        b.stats
            .damage_dealt
            .cmp(&a.stats.damage_dealt)
            .then(a.id.cmp(&b.id))
    });
    serializer.collect_seq(entities)
}
