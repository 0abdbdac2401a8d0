//! Domain events for the Player context.

use serde::{Deserialize, Serialize};
use timetrial_core::error::DomainError;
use timetrial_core::event::{DomainEvent, EventMetadata};
use timetrial_core::repository::StoredEvent;
use timetrial_records::{PLAYER_ACHIEVED_RECORD_EVENT_TYPE, PlayerAchievedRecord};
use uuid::Uuid;

/// Event type for player registration.
pub const PLAYER_REGISTERED_EVENT_TYPE: &str = "player.registered";

/// Emitted when a player registers. The first event of every player stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRegistered {
    /// The player identifier.
    pub player_id: Uuid,
    /// The player's name.
    pub player_name: String,
}

/// Event payload variants the Player context folds.
#[derive(Debug, Clone)]
pub enum PlayerEventKind {
    /// A player has registered.
    PlayerRegistered(PlayerRegistered),
    /// The player achieved a completion time on a map.
    RecordAchieved(PlayerAchievedRecord),
}

/// Domain event envelope for the Player context.
///
/// Achievement events keep the metadata of the stream they were appended
/// to, so `metadata.aggregate_id` may name a map stream rather than the
/// player's own.
#[derive(Debug, Clone)]
pub struct PlayerEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlayerEventKind,
}

impl PlayerEvent {
    /// Decodes a stored event into a player event.
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
            PLAYER_REGISTERED_EVENT_TYPE => PlayerEventKind::PlayerRegistered(decode(stored)?),
            PLAYER_ACHIEVED_RECORD_EVENT_TYPE => PlayerEventKind::RecordAchieved(decode(stored)?),
            _ => return Ok(None),
        };
        Ok(Some(Self {
            metadata: metadata_of(stored),
            kind,
        }))
    }

    /// Returns the player identity this event speaks about.
    #[must_use]
    pub fn player_id(&self) -> Uuid {
        match &self.kind {
            PlayerEventKind::PlayerRegistered(registered) => registered.player_id,
            PlayerEventKind::RecordAchieved(achievement) => achievement.player_id,
        }
    }
}

impl DomainEvent for PlayerEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            PlayerEventKind::PlayerRegistered(_) => PLAYER_REGISTERED_EVENT_TYPE,
            PlayerEventKind::RecordAchieved(_) => PLAYER_ACHIEVED_RECORD_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        match &self.kind {
            PlayerEventKind::PlayerRegistered(payload) => serde_json::to_value(payload)
                .expect("PlayerRegistered serialization is infallible"),
            PlayerEventKind::RecordAchieved(payload) => serde_json::to_value(payload)
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
