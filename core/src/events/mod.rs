mod processor;

pub use processor::{EventProcessor, ProcessingMode};
