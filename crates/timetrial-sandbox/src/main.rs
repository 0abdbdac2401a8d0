//! Time Trial sandbox entry point.
//!
//! Seeds the in-memory event store with the canonical sample history,
//! replays every projection, appends one live run, and logs the resulting
//! leaderboards.

use std::error::Error;

use timetrial_core::clock::{Clock, SystemClock};
use timetrial_core::event::{EventMetadata, to_stored};
use timetrial_core::repository::EventRepository;
use timetrial_event_store::MemoryEventStore;
use timetrial_event_store::seed::seed_sample_data;
use timetrial_maps::application::query_handlers::get_map_by_name;
use timetrial_maps::domain::events::{MapEvent, MapEventKind};
use timetrial_players::application::query_handlers::get_player_by_id;
use timetrial_records::{PLAYER_ACHIEVED_RECORD_EVENT_TYPE, PlayerAchievedRecord};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Time Trial sandbox");

    let store = MemoryEventStore::new();
    let summary = seed_sample_data(&store).await?;

    for map_name in ["jump_beef", "jump_ice"] {
        let projection = get_map_by_name(map_name, &store, &store).await?;
        tracing::info!(
            map = %projection.map_name,
            leaderboard = %serde_json::to_string(&projection.records)?,
            "map leaderboard"
        );
    }

    for player_id in &summary.player_ids {
        let projection = get_player_by_id(*player_id, &store, &store).await?;
        tracing::info!(
            player = %projection.player_name,
            records = %serde_json::to_string(&projection.records)?,
            "player records"
        );
    }

    // Alice posts a live personal best on jump_beef.
    let clock = SystemClock;
    let map_id = summary.map_ids[0];
    let alice = summary.player_ids[0];
    let version = store
        .load_events(map_id)
        .await?
        .last()
        .map_or(0, |event| event.sequence_number);
    let correlation_id = Uuid::new_v4();
    let run = MapEvent {
        metadata: EventMetadata {
            event_id: Uuid::new_v4(),
            event_type: PLAYER_ACHIEVED_RECORD_EVENT_TYPE.to_owned(),
            aggregate_id: map_id,
            sequence_number: version + 1,
            correlation_id,
            causation_id: correlation_id,
            occurred_at: clock.now(),
        },
        kind: MapEventKind::RecordAchieved(PlayerAchievedRecord {
            map_id,
            player_id: alice,
            duration_ms: 550_000,
        }),
    };
    store.append_events(map_id, version, &[to_stored(&run)]).await?;

    let projection = get_map_by_name("jump_beef", &store, &store).await?;
    tracing::info!(
        map = %projection.map_name,
        leaderboard = %serde_json::to_string(&projection.records)?,
        "map leaderboard after live run"
    );

    Ok(())
}
