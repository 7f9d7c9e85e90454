use hashbrown::HashMap;
use serde::Serialize;

use crate::context::{Sym, empty_sym, serialize_sym};

/// HP value meaning "unknown / reset", used for bosses across loading-screen
/// transitions and intra-encounter HP resets.
pub const HP_UNKNOWN: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EntityKind {
    #[default]
    Unknown,
    Monster,
    Boss,
    Guardian,
    Player,
}

impl EntityKind {
    /// Boss-grade entities persist across death events and HP resets.
    pub fn is_boss_grade(self) -> bool {
        matches!(self, EntityKind::Boss | EntityKind::Guardian)
    }
}

/// Immutable record of one damage tick.
#[derive(Debug, Clone, Serialize)]
pub struct SkillBreakdown {
    pub timestamp: i64,
    pub damage: i64,
    pub is_crit: bool,
    pub is_back_attack: bool,
    pub is_front_attack: bool,
    pub target_id: u64,
}

/// Per-skill counters plus the tick log (players only).
#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub id: u32,
    #[serde(serialize_with = "serialize_sym")]
    pub name: Sym,
    pub casts: u32,
    pub hits: u32,
    pub crits: u32,
    pub back_attacks: u32,
    pub front_attacks: u32,
    pub total_damage: i64,
    pub max_damage: i64,
    pub breakdown: Vec<SkillBreakdown>,
}

impl Skill {
    pub fn new(id: u32, name: Sym) -> Self {
        Self {
            id,
            name,
            casts: 0,
            hits: 0,
            crits: 0,
            back_attacks: 0,
            front_attacks: 0,
            total_damage: 0,
            max_damage: 0,
            breakdown: Vec::new(),
        }
    }
}

/// Per-entity aggregate counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub casts: u32,
    pub hits: u32,
    pub crits: u32,
    pub back_attacks: u32,
    pub front_attacks: u32,
    pub counters: u32,
    pub deaths: u32,
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub healing_done: i64,
    pub dps: f64,
    /// One cumulative DPS value per interval boundary (players only,
    /// filled by the finalizer; x-axis in `DamageStatistics::dps_intervals`).
    pub dps_series: Vec<f64>,
}

impl Stats {
    pub fn crit_rate(&self) -> f64 {
        if self.hits > 0 {
            self.crits as f64 / self.hits as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn back_attack_rate(&self) -> f64 {
        if self.hits > 0 {
            self.back_attacks as f64 / self.hits as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn front_attack_rate(&self) -> f64 {
        if self.hits > 0 {
            self.front_attacks as f64 / self.hits as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// One tracked actor within a session.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npc_type_id: Option<u64>,
    #[serde(serialize_with = "serialize_sym")]
    pub name: Sym,
    pub kind: EntityKind,
    pub class_id: u32,
    pub level: u32,
    pub gear_level: f32,
    pub current_hp: i64,
    pub max_hp: i64,
    pub skills: HashMap<u32, Skill>,
    pub stats: Stats,
}

impl Entity {
    pub fn new(id: u64, name: Sym, kind: EntityKind) -> Self {
        Self {
            id,
            npc_type_id: None,
            name,
            kind,
            class_id: 0,
            level: 0,
            gear_level: 0.0,
            current_hp: 0,
            max_hp: 0,
            skills: HashMap::new(),
            stats: Stats::default(),
        }
    }

    /// Stand-in for a damage source seen before its spawn record.
    pub fn placeholder(id: u64, name: Sym) -> Self {
        Self::new(id, name, EntityKind::Unknown)
    }

    pub fn skill_mut(&mut self, skill_id: u32, skill_name: Sym) -> &mut Skill {
        self.skills
            .entry(skill_id)
            .or_insert_with(|| Skill::new(skill_id, skill_name))
    }

    /// Alive for boss-presence purposes: positive HP, or HP not yet observed.
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0 || self.current_hp == HP_UNKNOWN
    }

    /// Whether any skill recorded combat activity. Entities without it are
    /// dropped at finalization.
    pub fn has_skill_activity(&self) -> bool {
        self.skills
            .values()
            .any(|s| s.casts > 0 || s.hits > 0 || s.total_damage > 0)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(0, empty_sym(), EntityKind::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rates_are_percentages_of_hits() {
        let mut stats = Stats::default();
        assert_eq!(stats.crit_rate(), 0.0);
        assert_eq!(stats.back_attack_rate(), 0.0);
        assert_eq!(stats.front_attack_rate(), 0.0);

        stats.hits = 8;
        stats.crits = 2;
        stats.back_attacks = 4;
        stats.front_attacks = 1;
        assert_eq!(stats.crit_rate(), 25.0);
        assert_eq!(stats.back_attack_rate(), 50.0);
        assert_eq!(stats.front_attack_rate(), 12.5);
    }
}
