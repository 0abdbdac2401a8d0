//! The achievement event payload shared by the map and player contexts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type for a player achieving a completion time on a map.
pub const PLAYER_ACHIEVED_RECORD_EVENT_TYPE: &str = "record.player_achieved";

/// Emitted when a player completes a map run.
///
/// May be appended to a map stream or a player stream; both projections
/// consume it. The run timestamp is the envelope's `occurred_at`. Duration
/// validity (e.g. a negative value) is a producer-side concern — the fold
/// accepts whatever was appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAchievedRecord {
    /// The map the run was completed on.
    pub map_id: Uuid,
    /// The player who completed the run.
    pub player_id: Uuid,
    /// Completion time in milliseconds.
    pub duration_ms: i64,
}
