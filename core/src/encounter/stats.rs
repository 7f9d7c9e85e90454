//! Statistics finalizer: run once per session, at the phase transition or
//! end of input.

use serde::Serialize;

use super::Session;
use super::entity::EntityKind;

/// Fixed width of one DPS time bucket.
pub const DPS_INTERVAL_MS: i64 = 5000;

/// Encounter-wide damage aggregate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DamageStatistics {
    pub total_damage_dealt: i64,
    pub top_damage_dealt: i64,
    pub total_damage_taken: i64,
    pub top_damage_taken: i64,
    pub dps: f64,
    /// Shared x-axis for every entity's `dps_series`, in ms offsets from the
    /// session start. The final boundary is clipped to the exact duration.
    pub dps_intervals: Vec<i64>,
}

/// Finalize a session: filter inactive entities, compute aggregate and
/// per-player DPS, and build the time-bucketed DPS series. Idempotent — a
/// finalized session is immutable.
pub fn finalize(session: &mut Session) {
    if session.finalized {
        return;
    }

    // Entities with zero combat activity are noise, not signal.
    session.retain_entities(|e| {
        e.kind.is_boss_grade() || (e.kind == EntityKind::Player && e.has_skill_activity())
    });

    let duration_ms = session.duration_ms();
    let secs = duration_ms as f64 / 1000.0;

    session.damage_stats.dps = if duration_ms > 0 {
        session.damage_stats.total_damage_dealt as f64 / secs
    } else {
        0.0
    };

    let intervals = bucket_boundaries(duration_ms);
    let first_packet = session.first_packet;

    for entity in session.entities_mut() {
        if entity.kind != EntityKind::Player {
            continue;
        }

        entity.stats.dps = if duration_ms > 0 {
            entity.stats.damage_dealt as f64 / secs
        } else {
            0.0
        };

        // Cumulative-DPS value per boundary, from the per-skill tick logs.
        let mut ticks: Vec<(i64, i64)> = entity
            .skills
            .values()
            .flat_map(|s| s.breakdown.iter().map(|b| (b.timestamp, b.damage)))
            .collect();
        ticks.sort_unstable_by_key(|(ts, _)| *ts);

        let mut series = Vec::with_capacity(intervals.len());
        let mut cumulative = 0i64;
        let mut next_tick = 0usize;
        for &boundary in &intervals {
            while next_tick < ticks.len() && ticks[next_tick].0 - first_packet <= boundary {
                cumulative += ticks[next_tick].1;
                next_tick += 1;
            }
            let value = if boundary > 0 {
                round2(cumulative as f64 / (boundary as f64 / 1000.0))
            } else {
                0.0
            };
            series.push(value);
        }
        entity.stats.dps_series = series;
    }

    session.damage_stats.dps_intervals = intervals;
    session.finalized = true;
}

/// Bucket boundaries `[0, 5000, 10000, …, duration]`, with the final bucket
/// clipped to the exact remaining duration. Length is
/// `ceil(duration / 5000) + 1`.
fn bucket_boundaries(duration_ms: i64) -> Vec<i64> {
    let mut boundaries = vec![0];
    let mut t = DPS_INTERVAL_MS;
    while t < duration_ms {
        boundaries.push(t);
        t += DPS_INTERVAL_MS;
    }
    if duration_ms > 0 {
        boundaries.push(duration_ms);
    }
    boundaries
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
