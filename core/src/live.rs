//! Streaming ingestion: one session, fed a line at a time.

use std::sync::Arc;

use arklog_types::EncounterTables;

use crate::combat_log::decode_line;
use crate::encounter::{Session, stats};
use crate::events::{EventProcessor, ProcessingMode};

/// Live front of the engine. Owns the current [`Session`] and exposes it for
/// mid-fight reads; a phase-transition record finalizes it in place.
pub struct LiveParser {
    processor: EventProcessor,
    session: Session,
    next_id: u64,
}

impl LiveParser {
    pub fn new(tables: Arc<EncounterTables>) -> Self {
        Self {
            processor: EventProcessor::new(ProcessingMode::SingleWindow, tables),
            session: Session::new(1),
            next_id: 2,
        }
    }

    /// Ingest one raw line. Undecodable lines are skipped; records after
    /// finalization are ignored until [`reset`](Self::reset).
    pub fn push_line(&mut self, line: &str) {
        if let Some(record) = decode_line(line) {
            self.processor.process(&record, &mut self.session);
        }
    }

    /// The in-progress (or finalized) session, readable at any point.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_finalized(&self) -> bool {
        self.session.finalized
    }

    /// Finalize at end of input. No-op when a phase transition already did.
    pub fn finish(&mut self) -> &Session {
        stats::finalize(&mut self.session);
        &self.session
    }

    /// Swap in a fresh session for the next encounter, returning the old one.
    pub fn reset(&mut self) -> Session {
        let fresh = Session::new(self.next_id);
        self.next_id += 1;
        std::mem::replace(&mut self.session, fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_finish_reset_cycle() {
        let mut parser = LiveParser::new(Arc::new(EncounterTables::builtin()));
        parser.push_line("3|1000|11|Ayaya|102|60|1490.5|200000|200000");
        parser.push_line("4|1001|9001|480005|Valtan|5000000");
        parser.push_line("8|2000|11|Ayaya|16140|Red Dust|0||9001|Valtan|1000|1|4999000|5000000|0");
        parser.push_line("not a record at all");

        assert!(!parser.is_finalized());
        assert_eq!(parser.session().damage_stats.total_damage_dealt, 1_000);

        let finished = parser.finish();
        assert!(finished.finalized);

        let old = parser.reset();
        assert_eq!(old.damage_stats.total_damage_dealt, 1_000);
        assert_ne!(parser.session().id, old.id);
        assert!(!parser.is_finalized());
        assert_eq!(parser.session().entity_count(), 0);
    }

    #[test]
    fn phase_transition_finalizes_mid_stream() {
        let mut parser = LiveParser::new(Arc::new(EncounterTables::builtin()));
        parser.push_line("3|1000|11|Ayaya|102|60|1490.5|200000|200000");
        parser.push_line("2|5000|1");
        assert!(parser.is_finalized());

        // ignored until reset
        parser.push_line("4|6000|9001|480005|Valtan|5000000");
        assert!(parser.session().entity(9001).is_none());
    }
}
