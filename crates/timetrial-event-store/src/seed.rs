//! Sample-data seeding for demos and integration tests.

use chrono::{DateTime, Utc};
use timetrial_core::error::DomainError;
use timetrial_core::event::{EventMetadata, to_stored};
use timetrial_core::repository::EventRepository;
use timetrial_maps::domain::events::{MAP_ADDED_EVENT_TYPE, MapAdded, MapEvent, MapEventKind};
use timetrial_players::domain::events::{
    PLAYER_REGISTERED_EVENT_TYPE, PlayerEvent, PlayerEventKind, PlayerRegistered,
};
use timetrial_records::{PLAYER_ACHIEVED_RECORD_EVENT_TYPE, PlayerAchievedRecord};
use uuid::Uuid;

use crate::MemoryEventStore;

/// Identities created by [`seed_sample_data`].
#[derive(Debug)]
pub struct SeedSummary {
    /// The seeded map stream ids, in creation order.
    pub map_ids: Vec<Uuid>,
    /// The seeded player stream ids, in registration order.
    pub player_ids: Vec<Uuid>,
}

const MAP_NAMES: [&str; 2] = ["jump_beef", "jump_ice"];
const PLAYER_NAMES: [&str; 5] = ["Alice", "Bob", "Charlie", "David", "Eve"];

/// Resets the store and appends the canonical sample history: two maps,
/// five players, and one completed run per (player, map) pair appended to
/// the map streams with strictly increasing timestamps.
///
/// # Errors
///
/// Returns `DomainError` if any append is rejected by the store.
pub async fn seed_sample_data(store: &MemoryEventStore) -> Result<SeedSummary, DomainError> {
    store.reset_all();
    let correlation_id = Uuid::new_v4();

    // Maps.
    let map_ids: Vec<Uuid> = MAP_NAMES.iter().map(|_| Uuid::new_v4()).collect();
    let mut created_at = 521_529;
    for (&map_name, &map_id) in MAP_NAMES.iter().zip(&map_ids) {
        let event = MapEvent {
            metadata: metadata(map_id, MAP_ADDED_EVENT_TYPE, 1, correlation_id, at(created_at)),
            kind: MapEventKind::MapAdded(MapAdded {
                map_id,
                map_name: map_name.to_owned(),
            }),
        };
        store.append_events(map_id, 0, &[to_stored(&event)]).await?;
        created_at += 25_000;
    }

    // Players.
    let player_ids: Vec<Uuid> = PLAYER_NAMES.iter().map(|_| Uuid::new_v4()).collect();
    let mut registered_at = 556_329;
    for (&player_name, &player_id) in PLAYER_NAMES.iter().zip(&player_ids) {
        let event = PlayerEvent {
            metadata: metadata(
                player_id,
                PLAYER_REGISTERED_EVENT_TYPE,
                1,
                correlation_id,
                at(registered_at),
            ),
            kind: PlayerEventKind::PlayerRegistered(PlayerRegistered {
                player_id,
                player_name: player_name.to_owned(),
            }),
        };
        store
            .append_events(player_id, 0, &[to_stored(&event)])
            .await?;
        registered_at += 10_000;
    }

    // Completed runs, appended to the map streams. Every player finished
    // both maps; durations descend with registration order.
    let mut run_at = 616_329;
    let mut base_secs = 1000;
    for &map_id in &map_ids {
        let mut batch = Vec::new();
        let mut sequence = 2;
        let mut duration_secs = base_secs;
        for &player_id in &player_ids {
            let event = MapEvent {
                metadata: metadata(
                    map_id,
                    PLAYER_ACHIEVED_RECORD_EVENT_TYPE,
                    sequence,
                    correlation_id,
                    at(run_at),
                ),
                kind: MapEventKind::RecordAchieved(PlayerAchievedRecord {
                    map_id,
                    player_id,
                    duration_ms: duration_secs * 1000,
                }),
            };
            batch.push(to_stored(&event));
            sequence += 1;
            duration_secs -= 100;
            run_at += 10_000;
        }
        store.append_events(map_id, 1, &batch).await?;
        base_secs -= 500;
    }

    tracing::info!(
        maps = map_ids.len(),
        players = player_ids.len(),
        "sample data seeded"
    );
    Ok(SeedSummary {
        map_ids,
        player_ids,
    })
}

fn metadata(
    aggregate_id: Uuid,
    event_type: &str,
    sequence_number: i64,
    correlation_id: Uuid,
    occurred_at: DateTime<Utc>,
) -> EventMetadata {
    EventMetadata {
        event_id: Uuid::new_v4(),
        event_type: event_type.to_owned(),
        aggregate_id,
        sequence_number,
        correlation_id,
        causation_id: correlation_id,
        occurred_at,
    }
}

fn at(unix_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds, 0).expect("seed timestamps are in range")
}
