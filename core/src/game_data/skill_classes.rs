//! Skill identifier → class identifier fallback table
//!
//! Used when a player's spawn record carries class 0: the first attributable
//! signature skill pins down the class. Only signature skills (unique to one
//! class) belong here.

use phf::phf_map;

static SKILL_TO_CLASS: phf::Map<u32, u32> = phf_map! {
    // Berserker
    16140u32 => 102u32, 16145u32 => 102u32, 16640u32 => 102u32,
    // Destroyer
    18030u32 => 103u32, 18150u32 => 103u32,
    // Gunlancer
    17200u32 => 104u32, 17230u32 => 104u32,
    // Paladin
    36050u32 => 105u32, 36080u32 => 105u32, 36170u32 => 105u32,
    // Arcanist
    19030u32 => 202u32, 19090u32 => 202u32,
    // Summoner
    20310u32 => 203u32, 20311u32 => 203u32,
    // Bard
    21140u32 => 204u32, 21170u32 => 204u32, 21250u32 => 204u32,
    // Sorceress
    37100u32 => 205u32, 37160u32 => 205u32, 37350u32 => 205u32,
    // Wardancer
    22340u32 => 302u32, 22360u32 => 302u32,
    // Scrapper
    23230u32 => 303u32, 23320u32 => 303u32,
    // Soulfist
    24200u32 => 304u32, 24290u32 => 304u32,
    // Glaivier
    34590u32 => 305u32, 34600u32 => 305u32,
    // Striker
    39110u32 => 312u32, 39160u32 => 312u32,
    // Deathblade
    25038u32 => 402u32, 25400u32 => 402u32,
    // Shadowhunter
    27860u32 => 403u32, 27960u32 => 403u32,
    // Reaper
    26040u32 => 404u32, 26110u32 => 404u32,
    // Sharpshooter
    28120u32 => 502u32, 28170u32 => 502u32,
    // Deadeye
    29100u32 => 503u32, 29160u32 => 503u32,
    // Artillerist
    30260u32 => 504u32, 30310u32 => 504u32,
    // Machinist
    35100u32 => 505u32, 35160u32 => 505u32,
    // Gunslinger
    38110u32 => 512u32, 38160u32 => 512u32,
    // Artist
    31050u32 => 602u32, 31220u32 => 602u32,
    // Aeromancer
    32040u32 => 603u32, 32140u32 => 603u32,
};

/// Class identifier for a signature skill, if known.
pub fn class_for_skill(skill_id: u32) -> Option<u32> {
    SKILL_TO_CLASS.get(&skill_id).copied()
}
