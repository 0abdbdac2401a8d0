//! The player career projection.

use serde::Serialize;
use timetrial_records::{Record, ranking};
use uuid::Uuid;

use super::events::{PlayerEvent, PlayerEventKind};

/// Current state of one player: their name and best record per map.
///
/// A pure value derived by folding the player's merged timeline; fully
/// reconstructible from empty state on every replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerProjection {
    /// The player identifier.
    pub player_id: Uuid,
    /// The player's name.
    pub player_name: String,
    /// Best record per map, sorted ascending by duration.
    pub records: Vec<Record>,
}

impl PlayerProjection {
    /// Applies one event to the projection state.
    ///
    /// Total over any event sequence: a repeated registration leaves the
    /// state unchanged, achievements before registration are skipped, and
    /// achievements about another player are skipped so the record
    /// collection stays scoped to this player.
    #[must_use]
    pub fn apply(state: Option<Self>, event: &PlayerEvent) -> Option<Self> {
        match (&event.kind, state) {
            (PlayerEventKind::PlayerRegistered(registered), None) => Some(Self {
                player_id: registered.player_id,
                player_name: registered.player_name.clone(),
                records: Vec::new(),
            }),
            (PlayerEventKind::PlayerRegistered(_), Some(state)) => Some(state),
            (PlayerEventKind::RecordAchieved(achievement), Some(mut state)) => {
                if achievement.player_id == state.player_id {
                    state.records = ranking::upsert(
                        &state.records,
                        achievement,
                        event.metadata.occurred_at,
                    );
                }
                Some(state)
            }
            (PlayerEventKind::RecordAchieved(_), None) => None,
        }
    }

    /// Folds an ordered event sequence into the current projection state.
    ///
    /// Returns `None` when the sequence never registered the player.
    pub fn fold<'a>(events: impl IntoIterator<Item = &'a PlayerEvent>) -> Option<Self> {
        events.into_iter().fold(None, Self::apply)
    }
}
