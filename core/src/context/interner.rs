//! Global interner for entity, skill, and buff names.
//!
//! Telemetry feeds repeat the same handful of display names millions of
//! times; a 4-byte key beats an owned String in every hot map.

use lasso::{Spur, ThreadedRodeo};
use std::sync::OnceLock;

/// Interned name key.
pub type Sym = Spur;

static NAMES: OnceLock<ThreadedRodeo> = OnceLock::new();
static EMPTY: OnceLock<Spur> = OnceLock::new();

fn names() -> &'static ThreadedRodeo {
    NAMES.get_or_init(ThreadedRodeo::default)
}

/// Intern a name, returning its key.
pub fn intern(s: &str) -> Sym {
    names().get_or_intern(s)
}

/// Key for the empty string. `Spur::default()` collides with the first
/// interned string, so always go through this.
#[inline]
pub fn empty_sym() -> Sym {
    *EMPTY.get_or_init(|| names().get_or_intern(""))
}

/// Resolve a key back to its name.
pub fn lookup(key: Sym) -> &'static str {
    names().resolve(&key)
}

/// Serialize a `Sym` as its resolved string, for the output aggregate.
pub fn serialize_sym<S>(key: &Sym, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(lookup(*key))
}
