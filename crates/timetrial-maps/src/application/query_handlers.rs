//! Query handlers for the Map context.
//!
//! Each query replays the map's stream from the event store and folds it
//! into the current projection state. No projection state is cached — two
//! replays of the same history produce identical projections.

use async_trait::async_trait;
use timetrial_core::error::DomainError;
use timetrial_core::repository::EventRepository;
use uuid::Uuid;

use crate::domain::events::MapEvent;
use crate::domain::projections::MapProjection;

/// Store-layer port resolving map names to stream identifiers.
///
/// The secondary name index is maintained by the store, not derived here.
#[async_trait]
pub trait MapNameIndex: Send + Sync {
    /// Looks up the map stream id registered under `map_name`.
    async fn map_id_by_name(&self, map_name: &str) -> Result<Option<Uuid>, DomainError>;
}

/// Retrieves a map projection by its stream id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the stream is empty or was
/// never initialized by a `MapAdded` event, and
/// `DomainError::Infrastructure` if a stored payload fails to decode.
pub async fn get_map_by_id(
    map_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<MapProjection, DomainError> {
    let stored_events = repo.load_events(map_id).await?;

    let mut events = Vec::with_capacity(stored_events.len());
    for stored in &stored_events {
        if let Some(event) = MapEvent::from_stored(stored)? {
            events.push(event);
        }
    }
    tracing::debug!(%map_id, replayed = events.len(), "replaying map stream");

    MapProjection::fold(&events).ok_or(DomainError::AggregateNotFound(map_id))
}

/// Retrieves a map projection by its name.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no map is registered under
/// the name; otherwise as [`get_map_by_id`].
pub async fn get_map_by_name(
    map_name: &str,
    index: &dyn MapNameIndex,
    repo: &dyn EventRepository,
) -> Result<MapProjection, DomainError> {
    let map_id = index
        .map_id_by_name(map_name)
        .await?
        .ok_or_else(|| DomainError::AggregateNotFound(Uuid::nil()))?;
    get_map_by_id(map_id, repo).await
}
