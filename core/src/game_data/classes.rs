//! Character class identification data

use phf::phf_map;

static CLASS_NAMES: phf::Map<u32, &'static str> = phf_map! {
    101u32 => "Warrior",
    102u32 => "Berserker",
    103u32 => "Destroyer",
    104u32 => "Gunlancer",
    105u32 => "Paladin",
    201u32 => "Mage",
    202u32 => "Arcanist",
    203u32 => "Summoner",
    204u32 => "Bard",
    205u32 => "Sorceress",
    301u32 => "Martial Artist",
    302u32 => "Wardancer",
    303u32 => "Scrapper",
    304u32 => "Soulfist",
    305u32 => "Glaivier",
    312u32 => "Striker",
    401u32 => "Assassin",
    402u32 => "Deathblade",
    403u32 => "Shadowhunter",
    404u32 => "Reaper",
    501u32 => "Gunner",
    502u32 => "Sharpshooter",
    503u32 => "Deadeye",
    504u32 => "Artillerist",
    505u32 => "Machinist",
    512u32 => "Gunslinger",
    601u32 => "Specialist",
    602u32 => "Artist",
    603u32 => "Aeromancer",
};

/// Display name for a class identifier, `"Unknown"` if unmapped.
pub fn class_name(class_id: u32) -> &'static str {
    CLASS_NAMES.get(&class_id).copied().unwrap_or("Unknown")
}
