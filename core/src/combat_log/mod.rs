mod decoder;
mod error;
mod record;
mod reader;

pub use decoder::decode_line;
pub use error::ReaderError;
pub use reader::LogReader;
pub use record::*;
