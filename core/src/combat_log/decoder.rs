use super::*;
use crate::context::intern;
use memchr::memchr_iter;

#[cfg(test)]
mod tests;

const DELIMITER: u8 = b'|';

macro_rules! parse_u64 {
    ($s:expr) => {
        $s.trim().parse::<u64>().unwrap_or_default()
    };
}
macro_rules! parse_i64 {
    ($s:expr) => {
        $s.trim().parse::<i64>().unwrap_or_default()
    };
}
macro_rules! parse_u32 {
    ($s:expr) => {
        $s.trim().parse::<u32>().unwrap_or_default()
    };
}

/// Locale-tolerant float parse: accepts `,` as decimal separator.
/// Falls back to `default` on failure, never raises.
pub fn parse_f32_or(s: &str, default: f32) -> f32 {
    let s = s.trim();
    match s.parse::<f32>() {
        Ok(v) => v,
        Err(_) => s.replacen(',', ".", 1).parse::<f32>().unwrap_or(default),
    }
}

/// Decode one raw record. Returns `None` for empty lines, unknown type tags,
/// and lines too short to carry a tag — decoding never aborts the stream.
pub fn decode_line(line: &str) -> Option<Record> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let bytes = line.as_bytes();
    let mut fields: Vec<&str> = Vec::with_capacity(16);
    let mut start = 0;
    for pos in memchr_iter(DELIMITER, bytes) {
        fields.push(&line[start..pos]);
        start = pos + 1;
    }
    fields.push(&line[start..]);

    // field accessor: absent positional fields read as empty, so short or
    // garbled lines decode with defaulted values instead of failing
    let f = |i: usize| fields.get(i).copied().unwrap_or("");

    let tag = f(0).trim().parse::<u32>().ok()?;
    let timestamp = parse_i64!(f(1));

    let record = match tag {
        1 => Record::EnvironmentInit(EnvironmentInit {
            timestamp,
            local_player_id: parse_u64!(f(2)),
            local_player_name: intern(f(3)),
            gear_level: parse_f32_or(f(4), 0.0),
        }),
        2 => Record::PhaseTransition(PhaseTransition {
            timestamp,
            phase_code: parse_i64!(f(2)),
        }),
        3 => Record::NewPlayer(NewPlayer {
            timestamp,
            id: parse_u64!(f(2)),
            name: intern(f(3)),
            class_id: parse_u32!(f(4)),
            level: parse_u32!(f(5)),
            gear_level: parse_f32_or(f(6), 0.0),
            current_hp: parse_i64!(f(7)),
            max_hp: parse_i64!(f(8)),
        }),
        4 => Record::NewNpc(NewNpc {
            timestamp,
            id: parse_u64!(f(2)),
            npc_type_id: parse_u64!(f(3)),
            name: intern(f(4)),
            max_hp: parse_i64!(f(5)),
        }),
        5 => Record::Death(Death {
            timestamp,
            id: parse_u64!(f(2)),
            name: intern(f(3)),
            source_id: parse_u64!(f(4)),
        }),
        6 => Record::SkillStart(SkillStart {
            timestamp,
            source_id: parse_u64!(f(2)),
            skill_id: parse_u32!(f(3)),
            skill_name: intern(f(4)),
        }),
        7 => Record::SkillStage(SkillStage {
            timestamp,
            source_id: parse_u64!(f(2)),
            skill_id: parse_u32!(f(3)),
            stage: parse_u32!(f(4)),
        }),
        8 => Record::Damage(Damage {
            timestamp,
            source_id: parse_u64!(f(2)),
            source_name: intern(f(3)),
            skill_id: parse_u32!(f(4)),
            skill_name: intern(f(5)),
            skill_effect_id: parse_u32!(f(6)),
            skill_effect_name: intern(f(7)),
            target_id: parse_u64!(f(8)),
            target_name: intern(f(9)),
            damage: parse_i64!(f(10)),
            modifier: HitModifier::decode(parse_i64!(f(11))),
            current_hp: parse_i64!(f(12)),
            max_hp: parse_i64!(f(13)),
            shield: parse_i64!(f(14)),
        }),
        9 => Record::Heal(Heal {
            timestamp,
            id: parse_u64!(f(2)),
            name: intern(f(3)),
            amount: parse_i64!(f(4)),
        }),
        10 => Record::Buff(Buff {
            timestamp,
            instance_id: parse_u64!(f(2)),
            buff_id: parse_u32!(f(3)),
            buff_name: intern(f(4)),
            source_id: parse_u64!(f(5)),
            target_id: parse_u64!(f(6)),
            stack_count: parse_u32!(f(7)),
        }),
        11 => Record::BuffRemoved(BuffRemoved {
            timestamp,
            instance_id: parse_u64!(f(2)),
        }),
        12 => Record::CounterAttack(CounterAttack {
            timestamp,
            id: parse_u64!(f(2)),
            name: intern(f(3)),
            target_id: parse_u64!(f(4)),
        }),
        _ => return None,
    };

    Some(record)
}
