mod interner;

pub use interner::{Sym, empty_sym, intern, lookup, serialize_sym};
