//! Domain events for the Map context.

use serde::{Deserialize, Serialize};
use timetrial_core::error::DomainError;
use timetrial_core::event::{DomainEvent, EventMetadata};
use timetrial_core::repository::StoredEvent;
use timetrial_records::{PLAYER_ACHIEVED_RECORD_EVENT_TYPE, PlayerAchievedRecord};
use uuid::Uuid;

/// Event type for map creation.
pub const MAP_ADDED_EVENT_TYPE: &str = "map.added";

/// Emitted when a map is added. The first event of every map stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapAdded {
    /// The map identifier.
    pub map_id: Uuid,
    /// The map's name.
    pub map_name: String,
}

/// Event payload variants the Map context folds.
#[derive(Debug, Clone)]
pub enum MapEventKind {
    /// A map has been added.
    MapAdded(MapAdded),
    /// A player achieved a completion time on this map.
    RecordAchieved(PlayerAchievedRecord),
}

/// Domain event envelope for the Map context.
#[derive(Debug, Clone)]
pub struct MapEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: MapEventKind,
}

impl MapEvent {
    /// Decodes a stored event into a map event.
    ///
    /// Returns `Ok(None)` for event types this context does not know —
    /// unknown events are skipped during replay, not rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a known event type carries
    /// a payload that fails to deserialize.
    pub fn from_stored(stored: &StoredEvent) -> Result<Option<Self>, DomainError> {
        let kind = match stored.event_type.as_str() {
            MAP_ADDED_EVENT_TYPE => MapEventKind::MapAdded(decode(stored)?),
            PLAYER_ACHIEVED_RECORD_EVENT_TYPE => MapEventKind::RecordAchieved(decode(stored)?),
            _ => return Ok(None),
        };
        Ok(Some(Self {
            metadata: metadata_of(stored),
            kind,
        }))
    }
}

impl DomainEvent for MapEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            MapEventKind::MapAdded(_) => MAP_ADDED_EVENT_TYPE,
            MapEventKind::RecordAchieved(_) => PLAYER_ACHIEVED_RECORD_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        match &self.kind {
            MapEventKind::MapAdded(payload) => {
                serde_json::to_value(payload).expect("MapAdded serialization is infallible")
            }
            MapEventKind::RecordAchieved(payload) => serde_json::to_value(payload)
                .expect("PlayerAchievedRecord serialization is infallible"),
        }
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

fn decode<T: serde::de::DeserializeOwned>(stored: &StoredEvent) -> Result<T, DomainError> {
    serde_json::from_value(stored.payload.clone()).map_err(|e| {
        DomainError::Infrastructure(format!(
            "event {} deserialization failed: {e}",
            stored.event_type
        ))
    })
}

fn metadata_of(stored: &StoredEvent) -> EventMetadata {
    EventMetadata {
        event_id: stored.event_id,
        event_type: stored.event_type.clone(),
        aggregate_id: stored.aggregate_id,
        sequence_number: stored.sequence_number,
        correlation_id: stored.correlation_id,
        causation_id: stored.causation_id,
        occurred_at: stored.occurred_at,
    }
}
