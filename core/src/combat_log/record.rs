use crate::context::Sym;

/// Hit result, from the low four bits of the damage modifier field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitFlag {
    #[default]
    Normal,
    Critical,
    Miss,
    Invincible,
    Dot,
    Immune,
    ImmuneSilenced,
    FontSilenced,
    DotCritical,
    Dodge,
    Reflect,
    DamageShare,
    DodgeHit,
    Unknown,
}

impl HitFlag {
    pub fn from_bits(bits: i64) -> Self {
        match bits {
            0 => HitFlag::Normal,
            1 => HitFlag::Critical,
            2 => HitFlag::Miss,
            3 => HitFlag::Invincible,
            4 => HitFlag::Dot,
            5 => HitFlag::Immune,
            6 => HitFlag::ImmuneSilenced,
            7 => HitFlag::FontSilenced,
            8 => HitFlag::DotCritical,
            9 => HitFlag::Dodge,
            10 => HitFlag::Reflect,
            11 => HitFlag::DamageShare,
            12 => HitFlag::DodgeHit,
            _ => HitFlag::Unknown,
        }
    }

    /// Exact-match crit semantics: Critical or DotCritical, nothing else.
    pub fn is_crit(self) -> bool {
        matches!(self, HitFlag::Critical | HitFlag::DotCritical)
    }
}

/// Attack position, from the next three bits of the modifier (offset by one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitOption {
    #[default]
    None,
    BackAttack,
    FrontalAttack,
    FlankAttack,
}

impl HitOption {
    pub fn from_bits(bits: i64) -> Self {
        match bits - 1 {
            0 => HitOption::BackAttack,
            1 => HitOption::FrontalAttack,
            2 => HitOption::FlankAttack,
            _ => HitOption::None,
        }
    }
}

/// Decoded damage modifier bit field.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitModifier {
    pub flag: HitFlag,
    pub option: HitOption,
}

impl HitModifier {
    pub fn decode(modifier: i64) -> Self {
        Self {
            flag: HitFlag::from_bits(modifier & 0xF),
            option: HitOption::from_bits((modifier >> 4) & 0x7),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvironmentInit {
    pub timestamp: i64,
    pub local_player_id: u64,
    pub local_player_name: Sym,
    pub gear_level: f32,
}

#[derive(Debug, Clone)]
pub struct PhaseTransition {
    pub timestamp: i64,
    pub phase_code: i64,
}

#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub timestamp: i64,
    pub id: u64,
    pub name: Sym,
    pub class_id: u32,
    pub level: u32,
    pub gear_level: f32,
    pub current_hp: i64,
    pub max_hp: i64,
}

#[derive(Debug, Clone)]
pub struct NewNpc {
    pub timestamp: i64,
    pub id: u64,
    pub npc_type_id: u64,
    pub name: Sym,
    pub max_hp: i64,
}

#[derive(Debug, Clone)]
pub struct Death {
    pub timestamp: i64,
    pub id: u64,
    pub name: Sym,
    pub source_id: u64,
}

#[derive(Debug, Clone)]
pub struct SkillStart {
    pub timestamp: i64,
    pub source_id: u64,
    pub skill_id: u32,
    pub skill_name: Sym,
}

#[derive(Debug, Clone)]
pub struct SkillStage {
    pub timestamp: i64,
    pub source_id: u64,
    pub skill_id: u32,
    pub stage: u32,
}

#[derive(Debug, Clone)]
pub struct Damage {
    pub timestamp: i64,
    pub source_id: u64,
    pub source_name: Sym,
    pub skill_id: u32,
    pub skill_name: Sym,
    pub skill_effect_id: u32,
    pub skill_effect_name: Sym,
    pub target_id: u64,
    pub target_name: Sym,
    pub damage: i64,
    pub modifier: HitModifier,
    pub current_hp: i64,
    pub max_hp: i64,
    pub shield: i64,
}

#[derive(Debug, Clone)]
pub struct Heal {
    pub timestamp: i64,
    pub id: u64,
    pub name: Sym,
    pub amount: i64,
}

#[derive(Debug, Clone)]
pub struct Buff {
    pub timestamp: i64,
    pub instance_id: u64,
    pub buff_id: u32,
    pub buff_name: Sym,
    pub source_id: u64,
    pub target_id: u64,
    pub stack_count: u32,
}

#[derive(Debug, Clone)]
pub struct BuffRemoved {
    pub timestamp: i64,
    pub instance_id: u64,
}

#[derive(Debug, Clone)]
pub struct CounterAttack {
    pub timestamp: i64,
    pub id: u64,
    pub name: Sym,
    pub target_id: u64,
}

/// One decoded telemetry record.
#[derive(Debug, Clone)]
pub enum Record {
    EnvironmentInit(EnvironmentInit),
    PhaseTransition(PhaseTransition),
    NewPlayer(NewPlayer),
    NewNpc(NewNpc),
    Death(Death),
    SkillStart(SkillStart),
    SkillStage(SkillStage),
    Damage(Damage),
    Heal(Heal),
    Buff(Buff),
    BuffRemoved(BuffRemoved),
    CounterAttack(CounterAttack),
}

impl Record {
    pub fn timestamp(&self) -> i64 {
        match self {
            Record::EnvironmentInit(r) => r.timestamp,
            Record::PhaseTransition(r) => r.timestamp,
            Record::NewPlayer(r) => r.timestamp,
            Record::NewNpc(r) => r.timestamp,
            Record::Death(r) => r.timestamp,
            Record::SkillStart(r) => r.timestamp,
            Record::SkillStage(r) => r.timestamp,
            Record::Damage(r) => r.timestamp,
            Record::Heal(r) => r.timestamp,
            Record::Buff(r) => r.timestamp,
            Record::BuffRemoved(r) => r.timestamp,
            Record::CounterAttack(r) => r.timestamp,
        }
    }

    pub fn is_phase_transition(&self) -> bool {
        matches!(self, Record::PhaseTransition(_))
    }
}
