pub mod combat_log;
pub mod context;
pub mod encounter;
pub mod events;
pub mod game_data;
pub mod live;
pub mod segmenter;
pub mod tables;

// Re-exports for convenience
pub use combat_log::*;
pub use encounter::stats::{DPS_INTERVAL_MS, DamageStatistics};
pub use encounter::{LocalPlayer, Session};
pub use events::{EventProcessor, ProcessingMode};
pub use live::LiveParser;
pub use segmenter::{Segmentation, segment_lines, segment_records};
pub use tables::{TableError, load_tables};
