//! Query handlers for the Player context.
//!
//! The player projection is a multi-stream fold: registrations live on the
//! player's own stream while achievements are appended to map streams. The
//! handler gathers every contributing stream, filters to events about the
//! requested player, merges them into one deterministic timeline, and folds.
//! Source streams are never mutated and no projection state is cached.

use async_trait::async_trait;
use timetrial_core::error::DomainError;
use timetrial_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

use crate::domain::events::{PlayerEvent, PlayerEventKind};
use crate::domain::projections::PlayerProjection;

/// Store-layer port resolving a player identity to the streams that carry
/// achievement events for that player.
///
/// The secondary index is maintained by the store at append time; the
/// player's own stream is implicit and not listed.
#[async_trait]
pub trait PlayerStreamIndex: Send + Sync {
    /// Returns the stream ids contributing achievement events for `player_id`.
    async fn streams_for_player(&self, player_id: Uuid) -> Result<Vec<Uuid>, DomainError>;
}

/// Retrieves a player projection by the player's id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the player was never
/// registered, and `DomainError::Infrastructure` if a stored payload fails
/// to decode.
pub async fn get_player_by_id(
    player_id: Uuid,
    index: &dyn PlayerStreamIndex,
    repo: &dyn EventRepository,
) -> Result<PlayerProjection, DomainError> {
    let mut stored = repo.load_events(player_id).await?;
    for stream_id in index.streams_for_player(player_id).await? {
        if stream_id == player_id {
            continue;
        }
        stored.extend(repo.load_events(stream_id).await?);
    }

    let timeline = assemble_timeline(player_id, &stored)?;
    tracing::debug!(%player_id, replayed = timeline.len(), "replaying player timeline");

    PlayerProjection::fold(&timeline).ok_or(DomainError::AggregateNotFound(player_id))
}

/// Builds the player's logical timeline from physically separate streams.
///
/// Keeps only events about `player_id`, then orders them ascending by
/// timestamp. At equal timestamps registrations sort before achievements;
/// remaining ties break by source stream and append order, so the merge is
/// deterministic for any input arrangement.
fn assemble_timeline(
    player_id: Uuid,
    stored: &[StoredEvent],
) -> Result<Vec<PlayerEvent>, DomainError> {
    let mut events = Vec::with_capacity(stored.len());
    for item in stored {
        if let Some(event) = PlayerEvent::from_stored(item)?
            && event.player_id() == player_id
        {
            events.push(event);
        }
    }
    events.sort_by_key(|event| {
        (
            event.metadata.occurred_at,
            kind_rank(event),
            event.metadata.aggregate_id,
            event.metadata.sequence_number,
        )
    });
    Ok(events)
}

fn kind_rank(event: &PlayerEvent) -> u8 {
    match event.kind {
        PlayerEventKind::PlayerRegistered(_) => 0,
        PlayerEventKind::RecordAchieved(_) => 1,
    }
}
