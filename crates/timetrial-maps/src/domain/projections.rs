//! The map leaderboard projection.

use serde::Serialize;
use timetrial_records::{Record, ranking};
use uuid::Uuid;

use super::events::{MapEvent, MapEventKind};

/// Current state of one map: its name and the ranked record collection.
///
/// A pure value derived by folding the map's stream; fully reconstructible
/// from empty state on every replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapProjection {
    /// The map identifier.
    pub map_id: Uuid,
    /// The map's name.
    pub map_name: String,
    /// Records on this map, sorted ascending by duration.
    pub records: Vec<Record>,
}

impl MapProjection {
    /// Applies one event to the projection state.
    ///
    /// Total over any event sequence: a repeated `MapAdded` leaves the
    /// state unchanged, an achievement before the map exists is skipped,
    /// and achievements carrying a foreign `map_id` are skipped so the
    /// record collection stays scoped to this map.
    #[must_use]
    pub fn apply(state: Option<Self>, event: &MapEvent) -> Option<Self> {
        match (&event.kind, state) {
            (MapEventKind::MapAdded(added), None) => Some(Self {
                map_id: added.map_id,
                map_name: added.map_name.clone(),
                records: Vec::new(),
            }),
            (MapEventKind::MapAdded(_), Some(state)) => Some(state),
            (MapEventKind::RecordAchieved(achievement), Some(mut state)) => {
                if achievement.map_id == state.map_id {
                    state.records = ranking::upsert(
                        &state.records,
                        achievement,
                        event.metadata.occurred_at,
                    );
                }
                Some(state)
            }
            (MapEventKind::RecordAchieved(_), None) => None,
        }
    }

    /// Folds an ordered event sequence into the current projection state.
    ///
    /// Returns `None` when the sequence never initialized the map.
    pub fn fold<'a>(events: impl IntoIterator<Item = &'a MapEvent>) -> Option<Self> {
        events.into_iter().fold(None, Self::apply)
    }
}
