use super::*;
use crate::context::lookup;

#[test]
fn test_decode_new_player() {
    let line = "3|1700000001000|101|Ayaka|102|60|1540.5|250000|250000";
    let result = decode_line(line);
    assert!(result.is_some());

    let Some(Record::NewPlayer(player)) = result else {
        panic!("expected NewPlayer");
    };
    assert_eq!(player.timestamp, 1700000001000);
    assert_eq!(player.id, 101);
    assert_eq!(lookup(player.name), "Ayaka");
    assert_eq!(player.class_id, 102);
    assert_eq!(player.level, 60);
    assert_eq!(player.gear_level, 1540.5);
    assert_eq!(player.max_hp, 250000);
}

#[test]
fn test_decode_new_npc() {
    let line = "4|1700000002000|9001|512002|Kungelanium|84000000";
    let Some(Record::NewNpc(npc)) = decode_line(line) else {
        panic!("expected NewNpc");
    };
    assert_eq!(npc.id, 9001);
    assert_eq!(npc.npc_type_id, 512002);
    assert_eq!(lookup(npc.name), "Kungelanium");
    assert_eq!(npc.max_hp, 84000000);
}

#[test]
fn test_decode_damage() {
    let line = "8|1700000003000|101|Ayaka|16140|Red Dust|161401|Red Dust Burst|9001|Kungelanium|52340|17|83947660|84000000|0";
    let Some(Record::Damage(dmg)) = decode_line(line) else {
        panic!("expected Damage");
    };
    assert_eq!(dmg.source_id, 101);
    assert_eq!(dmg.skill_id, 16140);
    assert_eq!(lookup(dmg.skill_name), "Red Dust");
    assert_eq!(dmg.target_id, 9001);
    assert_eq!(dmg.damage, 52340);
    // 17 = 0x11: hit flag Critical, hit option bits 1 -> BackAttack
    assert_eq!(dmg.modifier.flag, HitFlag::Critical);
    assert_eq!(dmg.modifier.option, HitOption::BackAttack);
    assert_eq!(dmg.current_hp, 83947660);
}

#[test]
fn test_decode_modifier_dot_critical_no_position() {
    let Some(Record::Damage(dmg)) =
        decode_line("8|1|1|a|2|b|3|c|4|d|100|8|0|0|0")
    else {
        panic!("expected Damage");
    };
    assert_eq!(dmg.modifier.flag, HitFlag::DotCritical);
    assert!(dmg.modifier.flag.is_crit());
    assert_eq!(dmg.modifier.option, HitOption::None);
}

#[test]
fn test_decode_modifier_frontal_normal() {
    // 0x20: flag 0 (Normal), option bits 2 -> FrontalAttack
    let Some(Record::Damage(dmg)) =
        decode_line("8|1|1|a|2|b|3|c|4|d|100|32|0|0|0")
    else {
        panic!("expected Damage");
    };
    assert_eq!(dmg.modifier.flag, HitFlag::Normal);
    assert!(!dmg.modifier.flag.is_crit());
    assert_eq!(dmg.modifier.option, HitOption::FrontalAttack);
}

#[test]
fn test_decode_malformed_numeric_fields_default_to_zero() {
    let line = "8|garbage|xx|Ayaka|oops|Red Dust|?|?|yy|Boss|not-a-number|zz|-|-|-";
    let Some(Record::Damage(dmg)) = decode_line(line) else {
        panic!("expected Damage");
    };
    assert_eq!(dmg.timestamp, 0);
    assert_eq!(dmg.source_id, 0);
    assert_eq!(dmg.damage, 0);
    assert_eq!(dmg.modifier.flag, HitFlag::Normal);
}

#[test]
fn test_decode_truncated_line_defaults_missing_fields() {
    let Some(Record::Heal(heal)) = decode_line("9|1700000004000|101") else {
        panic!("expected Heal");
    };
    assert_eq!(heal.id, 101);
    assert_eq!(lookup(heal.name), "");
    assert_eq!(heal.amount, 0);
}

#[test]
fn test_decode_unknown_tag_is_skipped() {
    assert!(decode_line("99|1700000005000|whatever").is_none());
    assert!(decode_line("abc|123").is_none());
}

#[test]
fn test_decode_empty_and_whitespace_lines_are_skipped() {
    assert!(decode_line("").is_none());
    assert!(decode_line("   \t  ").is_none());
    assert!(decode_line("\r\n").is_none());
}

#[test]
fn test_decode_counter_attack() {
    let Some(Record::CounterAttack(counter)) = decode_line("12|1700000006000|101|Ayaka|9001")
    else {
        panic!("expected CounterAttack");
    };
    assert_eq!(counter.id, 101);
    assert_eq!(counter.target_id, 9001);
}

#[test]
fn test_parse_f32_accepts_comma_decimal_separator() {
    assert_eq!(parse_f32_or("1540,5", 0.0), 1540.5);
    assert_eq!(parse_f32_or("1540.5", 0.0), 1540.5);
    assert_eq!(parse_f32_or("junk", 7.0), 7.0);
}

#[test]
fn test_decode_environment_init_with_comma_gear_level() {
    let Some(Record::EnvironmentInit(init)) = decode_line("1|1700000000000|777|Ayaka|1557,5")
    else {
        panic!("expected EnvironmentInit");
    };
    assert_eq!(init.local_player_id, 777);
    assert_eq!(init.gear_level, 1557.5);
}
