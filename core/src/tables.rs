//! Classification table loading
//!
//! Loads the injected [`EncounterTables`] configuration from a TOML file.
//! The engine itself never reads files; hosts load tables once at startup
//! and hand the engine a shared reference.

use std::path::Path;

use arklog_types::EncounterTables;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read table file {path}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse table file {path}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
}

/// Load classification tables from a TOML file.
pub fn load_tables(path: &Path) -> Result<EncounterTables, TableError> {
    let content = std::fs::read_to_string(path).map_err(|source| TableError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| TableError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

#[cfg(test)]
mod tests {
    use arklog_types::{EncounterTables, NpcGrade};

    #[test]
    fn tables_round_trip_through_toml() {
        let toml_src = r#"
            clear_hp_ratio = 0.9
            identity_hold_buffs = ["Spectral Veil"]

            [[zones]]
            name = "Test Zone"
            boss_ids = [111]
            guardian_ids = [222]

            [[npc_overrides]]
            npc_id = 333
            rename = "Real Boss"
            remap_to = 111
        "#;
        let tables: EncounterTables = toml::from_str(toml_src).unwrap();
        assert_eq!(tables.clear_hp_ratio, 0.9);
        assert_eq!(tables.grade(111), NpcGrade::Boss);
        assert_eq!(tables.grade(222), NpcGrade::Guardian);
        assert_eq!(tables.grade(333), NpcGrade::Trash);
        assert_eq!(tables.override_for(333).unwrap().remap_to, 111);
        assert!(tables.holds_identity("Spectral Veil"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let tables: EncounterTables = toml::from_str("").unwrap();
        assert!(tables.zones.is_empty());
        assert_eq!(tables.clear_hp_ratio, 0.95);
    }
}
