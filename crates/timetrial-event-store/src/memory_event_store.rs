//! In-memory implementation of the `EventRepository` trait.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use timetrial_core::error::DomainError;
use timetrial_core::repository::{EventRepository, StoredEvent};
use timetrial_maps::application::query_handlers::MapNameIndex;
use timetrial_maps::domain::events::{MAP_ADDED_EVENT_TYPE, MapAdded};
use timetrial_players::application::query_handlers::PlayerStreamIndex;
use timetrial_records::{PLAYER_ACHIEVED_RECORD_EVENT_TYPE, PlayerAchievedRecord};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    /// Append-only event streams keyed by aggregate id.
    streams: HashMap<Uuid, Vec<StoredEvent>>,
    /// Secondary index: map name to map stream id.
    map_names: HashMap<String, Uuid>,
    /// Secondary index: player id to the streams carrying that player's
    /// achievement events.
    player_streams: HashMap<Uuid, BTreeSet<Uuid>>,
}

/// Secondary-index update derived from an appended event.
enum IndexOp {
    MapName(String, Uuid),
    PlayerStream(Uuid, Uuid),
}

/// In-memory event store.
///
/// Streams are append-only and ordered; both secondary indexes are
/// maintained at append time by routing on the event type, so source
/// streams are never rewritten to serve a lookup. A batch is validated in
/// full before any event lands, keeping appends all-or-nothing.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    inner: Mutex<Inner>,
}

impl MemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipes all streams and indexes. Used by data-seeding tooling only.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn reset_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.streams.clear();
        inner.map_names.clear();
        inner.player_streams.clear();
        tracing::debug!("event store reset");
    }
}

/// Derives the index update, if any, an event contributes.
fn index_op(event: &StoredEvent) -> Result<Option<IndexOp>, DomainError> {
    match event.event_type.as_str() {
        MAP_ADDED_EVENT_TYPE => {
            let added: MapAdded = decode_payload(event)?;
            Ok(Some(IndexOp::MapName(added.map_name, added.map_id)))
        }
        PLAYER_ACHIEVED_RECORD_EVENT_TYPE => {
            let achievement: PlayerAchievedRecord = decode_payload(event)?;
            Ok(Some(IndexOp::PlayerStream(
                achievement.player_id,
                event.aggregate_id,
            )))
        }
        _ => Ok(None),
    }
}

fn decode_payload<T: serde::de::DeserializeOwned>(event: &StoredEvent) -> Result<T, DomainError> {
    serde_json::from_value(event.payload.clone()).map_err(|e| {
        DomainError::Validation(format!(
            "malformed {} payload on stream {}: {e}",
            event.event_type, event.aggregate_id
        ))
    })
}

#[async_trait]
impl EventRepository for MemoryEventStore {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut inner = self.inner.lock().unwrap();

        let stream = inner.streams.entry(aggregate_id).or_default();
        let current_version = stream.last().map_or(0, |event| event.sequence_number);
        if current_version != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual: current_version,
            });
        }

        let mut next_sequence = current_version + 1;
        let mut last_occurred_at = stream.last().map(|event| event.occurred_at);
        let mut index_ops = Vec::new();
        for event in events {
            if event.aggregate_id != aggregate_id {
                return Err(DomainError::Validation(format!(
                    "event {} targets stream {} but was appended to {aggregate_id}",
                    event.event_id, event.aggregate_id
                )));
            }
            if event.sequence_number != next_sequence {
                return Err(DomainError::Validation(format!(
                    "non-contiguous sequence number {} on stream {aggregate_id}, expected {next_sequence}",
                    event.sequence_number
                )));
            }
            if last_occurred_at.is_some_and(|previous| event.occurred_at < previous) {
                return Err(DomainError::Validation(format!(
                    "event {} timestamp precedes the stream head of {aggregate_id}",
                    event.event_id
                )));
            }
            if let Some(op) = index_op(event)? {
                index_ops.push(op);
            }
            next_sequence += 1;
            last_occurred_at = Some(event.occurred_at);
        }

        stream.extend(events.iter().cloned());
        for op in index_ops {
            match op {
                IndexOp::MapName(map_name, map_id) => {
                    inner.map_names.insert(map_name, map_id);
                }
                IndexOp::PlayerStream(player_id, stream_id) => {
                    inner
                        .player_streams
                        .entry(player_id)
                        .or_default()
                        .insert(stream_id);
                }
            }
        }
        tracing::debug!(%aggregate_id, appended = events.len(), "events appended");
        Ok(())
    }
}

#[async_trait]
impl MapNameIndex for MemoryEventStore {
    async fn map_id_by_name(&self, map_name: &str) -> Result<Option<Uuid>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.map_names.get(map_name).copied())
    }
}

#[async_trait]
impl PlayerStreamIndex for MemoryEventStore {
    async fn streams_for_player(&self, player_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .player_streams
            .get(&player_id)
            .map(|streams| streams.iter().copied().collect())
            .unwrap_or_default())
    }
}
