//! Batch-mode encounter extraction: split a full multi-encounter log at
//! phase-transition boundaries and replay each window through a fresh session.

use std::sync::Arc;

use arklog_types::EncounterTables;

use crate::combat_log::{Record, decode_line};
use crate::encounter::{Session, stats};
use crate::events::{EventProcessor, ProcessingMode};

/// Result of one batch segmentation run. The window counts are the caller's
/// implicit data-quality signal.
#[derive(Debug, Default)]
pub struct Segmentation {
    /// Accepted encounters, in log order, each finalized.
    pub encounters: Vec<Session>,
    pub windows_found: usize,
    pub windows_parsed: usize,
    pub windows_dropped: usize,
}

/// Decode and segment a raw line stream. Undecodable lines are skipped, never
/// fatal.
pub fn segment_lines<'a, I>(lines: I, tables: Arc<EncounterTables>) -> Segmentation
where
    I: IntoIterator<Item = &'a str>,
{
    let records: Vec<Record> = lines.into_iter().filter_map(decode_line).collect();
    segment_records(&records, tables)
}

/// Segment an ordered record array.
///
/// Windows are `[0, b0], [b0+1, b1], …, [b_last+1, end]` where `b_i` are the
/// phase-transition indices, each boundary record closing its own window.
/// Every window is replayed through a fresh [`Session`]; acceptance requires
/// the primary boss to have taken at least `clear_hp_ratio` of its max HP,
/// which discriminates real kills and wipes from boss-adjacent noise.
pub fn segment_records(records: &[Record], tables: Arc<EncounterTables>) -> Segmentation {
    let processor = EventProcessor::new(ProcessingMode::Segmented, tables.clone());
    let mut result = Segmentation::default();
    let mut next_id: u64 = 1;

    let mut start = 0;
    while start < records.len() {
        let end = records[start..]
            .iter()
            .position(Record::is_phase_transition)
            .map(|offset| start + offset + 1)
            .unwrap_or(records.len());
        let window = &records[start..end];
        start = end;

        result.windows_found += 1;
        let mut session = Session::new(next_id);
        next_id += 1;

        for record in window {
            processor.process(record, &mut session);
        }
        // windows truncated by end of input never saw their transition
        if !session.finalized {
            stats::finalize(&mut session);
        }

        if is_valid_encounter(&session, &tables) {
            result.windows_parsed += 1;
            result.encounters.push(session);
        } else {
            result.windows_dropped += 1;
            tracing::debug!(
                window = result.windows_found,
                entities = session.entity_count(),
                "window dropped by boss-HP validity check"
            );
        }
    }

    result
}

fn is_valid_encounter(session: &Session, tables: &EncounterTables) -> bool {
    let Some(boss) = session.primary_boss() else {
        return false;
    };
    if boss.max_hp <= 0 {
        return false;
    }
    boss.stats.damage_taken as f64 >= tables.clear_hp_ratio * boss.max_hp as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    // One clean synthetic encounter: init, one player, one boss, damage
    // ticks summing to `dealt`, then the phase transition.
    fn encounter_lines(base_ts: i64, dealt: i64, max_hp: i64) -> Vec<String> {
        let mut lines = vec![
            format!("1|{}|11|Ayaya|1490.5", base_ts),
            format!("3|{}|11|Ayaya|102|60|1490.5|200000|200000", base_ts),
            format!("4|{}|9001|480005|Valtan|{}", base_ts + 100, max_hp),
        ];
        let ticks = 4;
        let mut remaining_hp = max_hp;
        let mut remaining = dealt;
        for i in 0..ticks {
            let hit = if i == ticks - 1 {
                remaining
            } else {
                dealt / ticks
            };
            remaining -= hit;
            remaining_hp -= hit;
            lines.push(format!(
                "8|{}|11|Ayaya|16140|Red Dust|0||9001|Valtan|{}|1|{}|{}|0",
                base_ts + 1_000 * (i as i64 + 1),
                hit,
                remaining_hp,
                max_hp,
            ));
        }
        lines.push(format!("2|{}|1", base_ts + 10_000));
        lines
    }

    fn segment(lines: &[String]) -> Segmentation {
        segment_lines(
            lines.iter().map(String::as_str),
            Arc::new(EncounterTables::builtin()),
        )
    }

    #[test]
    fn single_clean_encounter_round_trips() {
        let lines = encounter_lines(1_000_000, 1_000_000, 1_000_000);
        let result = segment(&lines);

        assert_eq!(result.windows_found, 1);
        assert_eq!(result.windows_parsed, 1);
        assert_eq!(result.windows_dropped, 0);

        let encounter = &result.encounters[0];
        assert!(encounter.finalized);
        assert_eq!(encounter.damage_stats.total_damage_dealt, 1_000_000);
        assert_eq!(encounter.entity(9001).unwrap().stats.damage_taken, 1_000_000);
    }

    #[test]
    fn validity_threshold_is_inclusive_at_95_percent() {
        // 94% of max HP: incidental boss-adjacent noise, dropped
        let result = segment(&encounter_lines(1_000_000, 940_000, 1_000_000));
        assert_eq!(result.windows_parsed, 0);
        assert_eq!(result.windows_dropped, 1);

        // exactly 95%: accepted
        let result = segment(&encounter_lines(1_000_000, 950_000, 1_000_000));
        assert_eq!(result.windows_parsed, 1);
        assert_eq!(result.windows_dropped, 0);
    }

    #[test]
    fn multi_encounter_log_splits_at_phase_transitions() {
        let mut lines = encounter_lines(1_000_000, 1_000_000, 1_000_000);
        lines.extend(encounter_lines(2_000_000, 500_000, 1_000_000)); // wiped early
        lines.extend(encounter_lines(3_000_000, 990_000, 1_000_000));
        let result = segment(&lines);

        assert_eq!(result.windows_found, 3);
        assert_eq!(result.windows_parsed, 2);
        assert_eq!(result.windows_dropped, 1);
        assert_eq!(result.encounters.len(), 2);
        // sessions are independent: ids and aggregates do not bleed
        assert_ne!(result.encounters[0].id, result.encounters[1].id);
        assert_eq!(result.encounters[1].damage_stats.total_damage_dealt, 990_000);
    }

    #[test]
    fn window_without_boss_is_dropped() {
        let lines = vec![
            "3|1000|11|Ayaya|102|60|1490.5|200000|200000".to_string(),
            "2|2000|1".to_string(),
        ];
        let result = segment(&lines);
        assert_eq!(result.windows_found, 1);
        assert_eq!(result.windows_dropped, 1);
        assert!(result.encounters.is_empty());
    }

    #[test]
    fn truncated_final_window_is_finalized_at_end_of_input() {
        let mut lines = encounter_lines(1_000_000, 1_000_000, 1_000_000);
        lines.pop(); // drop the phase transition
        let result = segment(&lines);

        assert_eq!(result.windows_found, 1);
        assert_eq!(result.windows_parsed, 1);
        assert!(result.encounters[0].finalized);
    }
}
