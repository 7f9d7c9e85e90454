//! Event handlers: one state transition per decoded record type.
//!
//! A plain dispatch over a mutable [`Session`]; there are no independent
//! listeners inside the engine, so no publish/subscribe layer.

use std::sync::Arc;

use arklog_types::{EncounterTables, NpcGrade};

use crate::combat_log::{
    Buff, CounterAttack, Damage, Death, EnvironmentInit, Heal, HitOption, NewNpc, NewPlayer,
    Record, SkillStart,
};
use crate::context::{intern, lookup};
use crate::encounter::entity::{Entity, EntityKind, HP_UNKNOWN, SkillBreakdown};
use crate::encounter::{Session, stats};
use crate::game_data::class_for_skill;

/// Windowing behavior of the single engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Live ingestion: one session, phase transition finalizes it and
    /// suppresses further processing.
    #[default]
    SingleWindow,
    /// Batch extraction: the segmenter replays each window into a fresh
    /// session. Ghost-phase identity workarounds apply in this mode only.
    Segmented,
}

pub struct EventProcessor {
    mode: ProcessingMode,
    tables: Arc<EncounterTables>,
}

impl EventProcessor {
    pub fn new(mode: ProcessingMode, tables: Arc<EncounterTables>) -> Self {
        Self { mode, tables }
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    /// Apply one record to the session. A finalized session is immutable.
    pub fn process(&self, record: &Record, session: &mut Session) {
        if session.finalized {
            return;
        }
        session.last_packet = record.timestamp();

        match record {
            Record::EnvironmentInit(r) => self.on_environment_init(r, session),
            Record::PhaseTransition(_) => stats::finalize(session),
            Record::NewPlayer(r) => self.on_new_player(r, session),
            Record::NewNpc(r) => self.on_new_npc(r, session),
            Record::Death(r) => self.on_death(r, session),
            Record::SkillStart(r) => self.on_skill_start(r, session),
            Record::Damage(r) => self.on_damage(r, session),
            Record::Heal(r) => self.on_heal(r, session),
            Record::Buff(r) => self.on_buff(r, session),
            Record::CounterAttack(r) => self.on_counter_attack(r, session),
            // decoded for completeness, no statistical effect
            Record::SkillStage(_) | Record::BuffRemoved(_) => {}
        }
    }

    /// The client reloaded and ids were reassigned: remap the local player's
    /// id and reset boss HP to the unknown sentinel.
    fn on_environment_init(&self, record: &EnvironmentInit, session: &mut Session) {
        let old_id = session.local.id;
        if !lookup(record.local_player_name).is_empty() {
            session.local.name = record.local_player_name;
        }
        if record.gear_level > 0.0 {
            session.local.gear_level = record.gear_level;
        }
        session.local.id = record.local_player_id;

        if let Some(current) = session.resolve_id(old_id, session.local.name) {
            session.realias(current, record.local_player_id);
            tracing::debug!(old_id, new_id = record.local_player_id, "local player id remapped");
        }

        for entity in session.entities_mut() {
            if entity.kind.is_boss_grade() {
                entity.current_hp = HP_UNKNOWN;
            }
        }
        session.paused = false;
        session.refresh_boss_alive();
    }

    fn on_new_player(&self, record: &NewPlayer, session: &mut Session) {
        let resolved = session.resolve_id(record.id, record.name);
        if let Some(current) = resolved {
            session.realias(current, record.id);
        }

        if session.entity(record.id).is_none() {
            session.insert(Entity::new(record.id, record.name, EntityKind::Player));
        }
        let is_local = record.id == session.local.id;
        let local = session.local.clone();

        // the spawn record's own name for the local player is unreliable;
        // renames go through the session so the name index stays current
        let name = if is_local && !lookup(local.name).is_empty() {
            local.name
        } else {
            record.name
        };
        session.rename(record.id, name);

        let Some(entity) = session.entity_mut(record.id) else {
            return;
        };
        entity.kind = EntityKind::Player;
        entity.level = record.level;
        entity.gear_level = record.gear_level;
        entity.current_hp = record.current_hp;
        entity.max_hp = record.max_hp;
        if record.class_id != 0 {
            entity.class_id = record.class_id;
        } else if entity.class_id == 0 {
            // spawn record carries no class: fall back to any signature
            // skill this entity was already seen casting
            if let Some(class_id) = entity.skills.keys().find_map(|&id| class_for_skill(id)) {
                entity.class_id = class_id;
            }
        }
        if is_local && local.gear_level > 0.0 {
            entity.gear_level = local.gear_level;
        }
    }

    fn on_new_npc(&self, record: &NewNpc, session: &mut Session) {
        let (npc_type_id, name) = match self.tables.override_for(record.npc_type_id) {
            Some(ov) => {
                tracing::debug!(
                    npc_id = record.npc_type_id,
                    remap_to = ov.remap_to,
                    "applying npc identity override"
                );
                (ov.remap_to, intern(&ov.rename))
            }
            None => (record.npc_type_id, record.name),
        };

        let kind = match self.tables.grade(npc_type_id) {
            NpcGrade::Boss => EntityKind::Boss,
            NpcGrade::Guardian => EntityKind::Guardian,
            NpcGrade::Trash => EntityKind::Monster,
        };

        if kind == EntityKind::Monster {
            // trash is transient: tracked only once a damage/heal event
            // references it, so spawns alone never grow the session
            session.rename(record.id, name);
            if let Some(entity) = session.entity_mut(record.id) {
                entity.npc_type_id = Some(npc_type_id);
                entity.kind = kind;
                entity.max_hp = record.max_hp;
            }
            return;
        }

        let mut boss = Entity::new(record.id, name, kind);
        boss.npc_type_id = Some(npc_type_id);
        boss.current_hp = record.max_hp;
        boss.max_hp = record.max_hp;
        if let Some(existing) = session.entity(record.id) {
            boss.stats = existing.stats.clone();
            boss.skills = existing.skills.clone();
        }
        session.insert(boss);

        // a boss-grade spawn ends any ghost phase
        session.paused = false;
        session.refresh_boss_alive();
    }

    fn on_death(&self, record: &Death, session: &mut Session) {
        let Some(id) = session.resolve_id(record.id, record.name) else {
            return;
        };
        let Some(entity) = session.entity_mut(id) else {
            return;
        };

        match entity.kind {
            // bosses persist across intra-encounter HP resets
            EntityKind::Boss | EntityKind::Guardian => {}
            EntityKind::Player => entity.stats.deaths += 1,
            EntityKind::Monster | EntityKind::Unknown => {
                session.remove(id);
            }
        }
    }

    fn on_skill_start(&self, record: &SkillStart, session: &mut Session) {
        let Some(entity) = session.entity_mut(record.source_id) else {
            return;
        };
        entity.stats.casts += 1;
        entity.skill_mut(record.skill_id, record.skill_name).casts += 1;
    }

    fn on_damage(&self, record: &Damage, session: &mut Session) {
        // zero-id skills are effect ticks; attribute them to the effect
        let (skill_id, skill_name) = if record.skill_id != 0 {
            (record.skill_id, record.skill_name)
        } else {
            (record.skill_effect_id, record.skill_effect_name)
        };

        // resolve source, creating a placeholder for a first-seen actor
        let mut placeholder: Option<Entity> = None;
        let source_id = match session.resolve_id(record.source_id, record.source_name) {
            Some(id) => id,
            None => {
                placeholder = Some(Entity::placeholder(record.source_id, record.source_name));
                record.source_id
            }
        };

        // resolve target, aliasing its id on a name match; unresolvable
        // targets drop the event with no side effects
        let target_id = match session.resolve_id(record.target_id, record.target_name) {
            Some(id) => {
                session.realias(id, record.target_id);
                record.target_id
            }
            None => return,
        };

        // only boss-relevant combat is tallied
        let target_kind = match session.entity(target_id) {
            Some(t) => t.kind,
            None => return,
        };
        if matches!(target_kind, EntityKind::Monster | EntityKind::Unknown) {
            return;
        }
        if !session.boss_alive() || session.paused {
            return;
        }

        let Some(target) = session.entity_mut(target_id) else {
            return;
        };
        target.current_hp = record.current_hp;
        target.max_hp = record.max_hp;

        // overkill correction: tally only the lethal, in-bounds portion
        let mut damage = record.damage;
        if target_kind != EntityKind::Player && record.current_hp < 0 {
            damage = (damage + record.current_hp).max(0);
        }
        session.refresh_boss_alive();

        // lazy class resolution; promote placeholders once a class is known
        if let Some(mut pending) = placeholder.take() {
            if let Some(class_id) = class_for_skill(skill_id) {
                pending.class_id = class_id;
                pending.kind = EntityKind::Player;
            }
            session.insert(pending);
        } else if let Some(source) = session.entity_mut(source_id) {
            if source.class_id == 0
                && let Some(class_id) = class_for_skill(skill_id)
            {
                source.class_id = class_id;
                if source.kind == EntityKind::Unknown {
                    source.kind = EntityKind::Player;
                }
            }
        }

        let is_crit = record.modifier.flag.is_crit();
        let is_back = record.modifier.option == HitOption::BackAttack;
        let is_front = record.modifier.option == HitOption::FrontalAttack;

        let Some(source) = session.entity_mut(source_id) else {
            return;
        };
        let source_kind = source.kind;

        source.stats.hits += 1;
        source.stats.damage_dealt += damage;
        if is_crit {
            source.stats.crits += 1;
        }
        if is_back {
            source.stats.back_attacks += 1;
        }
        if is_front {
            source.stats.front_attacks += 1;
        }

        let skill = source.skill_mut(skill_id, skill_name);
        skill.hits += 1;
        skill.total_damage += damage;
        skill.max_damage = skill.max_damage.max(damage);
        if is_crit {
            skill.crits += 1;
        }
        if is_back {
            skill.back_attacks += 1;
        }
        if is_front {
            skill.front_attacks += 1;
        }
        if source_kind == EntityKind::Player {
            skill.breakdown.push(SkillBreakdown {
                timestamp: record.timestamp,
                damage,
                is_crit,
                is_back_attack: is_back,
                is_front_attack: is_front,
                target_id,
            });
        }
        let source_total = source.stats.damage_dealt;

        let Some(target) = session.entity_mut(target_id) else {
            return;
        };
        target.stats.damage_taken += damage;
        let target_total = target.stats.damage_taken;

        if source_kind == EntityKind::Player {
            session.damage_stats.total_damage_dealt += damage;
            session.damage_stats.top_damage_dealt =
                session.damage_stats.top_damage_dealt.max(source_total);
        }
        if target_kind == EntityKind::Player {
            session.damage_stats.total_damage_taken += damage;
            session.damage_stats.top_damage_taken =
                session.damage_stats.top_damage_taken.max(target_total);
        }

        if session.first_packet == 0 {
            session.first_packet = record.timestamp;
        }
    }

    fn on_heal(&self, record: &Heal, session: &mut Session) {
        let Some(id) = session.resolve_id(record.id, record.name) else {
            return;
        };
        if let Some(entity) = session.entity_mut(id) {
            entity.stats.healing_done += record.amount;
        }
    }

    /// Buffs carry no statistics; in batch mode a configured buff name marks
    /// the ghost phase of an overridden boss, during which damage belongs to
    /// nobody.
    fn on_buff(&self, record: &Buff, session: &mut Session) {
        if self.mode != ProcessingMode::Segmented {
            return;
        }
        if self.tables.holds_identity(lookup(record.buff_name)) {
            tracing::debug!(buff = lookup(record.buff_name), "ghost phase: pausing session");
            session.paused = true;
        }
    }

    fn on_counter_attack(&self, record: &CounterAttack, session: &mut Session) {
        let Some(id) = session.resolve_id(record.id, record.name) else {
            return;
        };
        if let Some(entity) = session.entity_mut(id) {
            entity.stats.counters += 1;
        }
    }
}
