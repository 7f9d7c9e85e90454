//! Shared configuration types for ARKLOG
//!
//! This crate contains the serializable classification tables consumed by the
//! engine (arklog-core) and supplied by the host application: which NPC
//! identifiers count as bosses or guardians, data-driven NPC identity
//! overrides, and the encounter validity threshold.

use serde::{Deserialize, Serialize};

/// Classification of an NPC identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcGrade {
    Trash,
    Boss,
    Guardian,
}

/// One zone grouping of encounter NPC identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneGroup {
    pub name: String,
    #[serde(default)]
    pub boss_ids: Vec<u64>,
    #[serde(default)]
    pub guardian_ids: Vec<u64>,
}

/// Data-driven replacement for a known telemetry quirk: an NPC identifier
/// whose spawn record carries the wrong name, spawned as a stand-in for a
/// boss that is temporarily out of the feed. The entity is renamed and its
/// NPC identifier remapped so classification and validity checks see the
/// real boss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcOverride {
    pub npc_id: u64,
    pub rename: String,
    pub remap_to: u64,
}

/// Static, externally supplied classification tables.
///
/// Read-only for the engine's lifetime. Loaded once at startup from TOML
/// (see `arklog-core::tables`) or built from [`EncounterTables::builtin`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterTables {
    #[serde(default)]
    pub zones: Vec<ZoneGroup>,
    #[serde(default)]
    pub npc_overrides: Vec<NpcOverride>,
    /// Buff names that signal the deferred-identity ("ghost") phase of an
    /// overridden boss. While such a buff is up, incoming damage belongs to
    /// nobody and the session is paused.
    #[serde(default)]
    pub identity_hold_buffs: Vec<String>,
    /// Fraction of the primary boss's max HP that must have been dealt to it
    /// for a batch window to count as a real encounter.
    #[serde(default = "default_clear_hp_ratio")]
    pub clear_hp_ratio: f64,
}

fn default_clear_hp_ratio() -> f64 {
    0.95
}

impl EncounterTables {
    /// Classify an NPC identifier against the zone groupings.
    pub fn grade(&self, npc_type_id: u64) -> NpcGrade {
        for zone in &self.zones {
            if zone.boss_ids.contains(&npc_type_id) {
                return NpcGrade::Boss;
            }
            if zone.guardian_ids.contains(&npc_type_id) {
                return NpcGrade::Guardian;
            }
        }
        NpcGrade::Trash
    }

    pub fn override_for(&self, npc_type_id: u64) -> Option<&NpcOverride> {
        self.npc_overrides.iter().find(|o| o.npc_id == npc_type_id)
    }

    pub fn holds_identity(&self, buff_name: &str) -> bool {
        self.identity_hold_buffs.iter().any(|b| b == buff_name)
    }

    /// Built-in table covering the common raid and guardian zones.
    /// Deployments with newer content ship their own TOML instead.
    pub fn builtin() -> Self {
        Self {
            zones: vec![
                ZoneGroup {
                    name: "Valtan Legion Raid".into(),
                    boss_ids: vec![480005, 480006, 480009, 480010],
                    guardian_ids: Vec::new(),
                },
                ZoneGroup {
                    name: "Vykas Legion Raid".into(),
                    boss_ids: vec![480208, 480209, 480210],
                    guardian_ids: Vec::new(),
                },
                ZoneGroup {
                    name: "Kakul-Saydon Legion Raid".into(),
                    boss_ids: vec![480601, 480611, 480621, 480631],
                    guardian_ids: Vec::new(),
                },
                ZoneGroup {
                    name: "Guardian Raids".into(),
                    boss_ids: Vec::new(),
                    guardian_ids: vec![
                        509006, 512002, 512004, 512006, 512008, 512011, 512012, 512013, 512014,
                        512015, 512017, 512019, 512020, 512022, 512023, 512025, 512027,
                    ],
                },
                ZoneGroup {
                    name: "Trial Grounds".into(),
                    boss_ids: Vec::new(),
                    guardian_ids: vec![620010, 620020, 620030, 620040, 620050, 620060],
                },
            ],
            npc_overrides: vec![NpcOverride {
                // Mid-fight stand-in spawned during the mirage phase; the feed
                // names it after the arena rather than the boss.
                npc_id: 480696,
                rename: "Saydon".into(),
                remap_to: 480611,
            }],
            identity_hold_buffs: vec!["Phantom Mirage".into()],
            clear_hp_ratio: default_clear_hp_ratio(),
        }
    }
}

impl Default for EncounterTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_classifies_boss_guardian_and_trash() {
        let tables = EncounterTables::builtin();
        assert_eq!(tables.grade(480005), NpcGrade::Boss);
        assert_eq!(tables.grade(512002), NpcGrade::Guardian);
        assert_eq!(tables.grade(12345), NpcGrade::Trash);
    }

    #[test]
    fn override_lookup_finds_configured_quirk() {
        let tables = EncounterTables::builtin();
        let ov = tables.override_for(480696).unwrap();
        assert_eq!(ov.rename, "Saydon");
        assert_eq!(ov.remap_to, 480611);
        assert!(tables.override_for(480611).is_none());
    }

    #[test]
    fn identity_hold_matches_exact_buff_name() {
        let tables = EncounterTables::builtin();
        assert!(tables.holds_identity("Phantom Mirage"));
        assert!(!tables.holds_identity("Phantom"));
    }
}
