//! The record derived fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Best known completion time for one (player, map) pair.
///
/// Records are never created or destroyed directly — they are computed by
/// folding achievement events. A superseded record is discarded, not
/// retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The player who holds the record.
    pub player_id: Uuid,
    /// The map the record was set on.
    pub map_id: Uuid,
    /// When the recorded run happened.
    pub achieved_at: DateTime<Utc>,
    /// Completion time in milliseconds.
    pub duration_ms: i64,
}
