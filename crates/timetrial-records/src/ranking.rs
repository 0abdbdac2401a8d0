//! The record ranking policy.

use chrono::{DateTime, Utc};

use crate::events::PlayerAchievedRecord;
use crate::record::Record;

/// Merges an achievement into an existing record collection.
///
/// Players hold at most one record per map. A new achievement replaces the
/// existing record for its (player, map) pair only when its duration is
/// strictly faster; on a tie the record already held stands. Without an
/// existing record the achievement is inserted as-is. The returned
/// collection is sorted ascending by duration (equal durations keep their
/// prior order, so replay produces identical output).
///
/// Pure and total: no error conditions, and applying the same achievement
/// twice yields the same collection as applying it once.
#[must_use]
pub fn upsert(
    records: &[Record],
    achievement: &PlayerAchievedRecord,
    achieved_at: DateTime<Utc>,
) -> Vec<Record> {
    let mut updated: Vec<Record> = Vec::with_capacity(records.len() + 1);
    let mut found = false;

    for record in records {
        if record.player_id == achievement.player_id && record.map_id == achievement.map_id {
            found = true;
            if achievement.duration_ms < record.duration_ms {
                updated.push(Record {
                    player_id: achievement.player_id,
                    map_id: achievement.map_id,
                    achieved_at,
                    duration_ms: achievement.duration_ms,
                });
            } else {
                updated.push(record.clone());
            }
        } else {
            updated.push(record.clone());
        }
    }

    if !found {
        updated.push(Record {
            player_id: achievement.player_id,
            map_id: achievement.map_id,
            achieved_at,
            duration_ms: achievement.duration_ms,
        });
    }

    updated.sort_by_key(|record| record.duration_ms);
    updated
}
