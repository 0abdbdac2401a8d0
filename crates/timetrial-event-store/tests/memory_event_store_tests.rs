//! Integration tests for the in-memory event store and the full
//! store-to-projection query flow.

use chrono::{DateTime, Utc};
use timetrial_core::clock::Clock;
use timetrial_core::error::DomainError;
use timetrial_core::repository::{EventRepository, StoredEvent};
use timetrial_test_support::FixedClock;
use timetrial_event_store::MemoryEventStore;
use timetrial_event_store::seed::seed_sample_data;
use timetrial_maps::application::query_handlers::{MapNameIndex, get_map_by_id, get_map_by_name};
use timetrial_maps::domain::events::{MAP_ADDED_EVENT_TYPE, MapAdded};
use timetrial_players::application::query_handlers::{PlayerStreamIndex, get_player_by_id};
use timetrial_records::{PLAYER_ACHIEVED_RECORD_EVENT_TYPE, PlayerAchievedRecord};
use uuid::Uuid;

fn at(unix_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds, 0).unwrap()
}

fn stored(
    aggregate_id: Uuid,
    sequence_number: i64,
    occurred_at: DateTime<Utc>,
    event_type: &str,
    payload: serde_json::Value,
) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id,
        event_type: event_type.to_owned(),
        payload,
        sequence_number,
        correlation_id: Uuid::new_v4(),
        causation_id: Uuid::new_v4(),
        occurred_at,
    }
}

fn map_added(map_id: Uuid, map_name: &str, occurred_at: DateTime<Utc>) -> StoredEvent {
    stored(
        map_id,
        1,
        occurred_at,
        MAP_ADDED_EVENT_TYPE,
        serde_json::to_value(MapAdded {
            map_id,
            map_name: map_name.to_owned(),
        })
        .unwrap(),
    )
}

fn achievement(
    map_id: Uuid,
    player_id: Uuid,
    duration_ms: i64,
    sequence_number: i64,
    occurred_at: DateTime<Utc>,
) -> StoredEvent {
    stored(
        map_id,
        sequence_number,
        occurred_at,
        PLAYER_ACHIEVED_RECORD_EVENT_TYPE,
        serde_json::to_value(PlayerAchievedRecord {
            map_id,
            player_id,
            duration_ms,
        })
        .unwrap(),
    )
}

#[tokio::test]
async fn test_append_then_load_preserves_append_order() {
    let store = MemoryEventStore::new();
    let map_id = Uuid::new_v4();
    let player_id = Uuid::new_v4();

    store
        .append_events(map_id, 0, &[map_added(map_id, "jump_beef", at(100))])
        .await
        .unwrap();
    store
        .append_events(
            map_id,
            1,
            &[
                achievement(map_id, player_id, 900_000, 2, at(200)),
                achievement(map_id, player_id, 800_000, 3, at(300)),
            ],
        )
        .await
        .unwrap();

    let events = store.load_events(map_id).await.unwrap();
    let sequences: Vec<i64> = events.iter().map(|e| e.sequence_number).collect();
    assert_eq!(sequences, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_load_unknown_stream_returns_empty() {
    let store = MemoryEventStore::new();

    let events = store.load_events(Uuid::new_v4()).await.unwrap();

    assert!(events.is_empty());
}

#[tokio::test]
async fn test_append_with_stale_version_is_rejected() {
    let store = MemoryEventStore::new();
    let map_id = Uuid::new_v4();
    store
        .append_events(map_id, 0, &[map_added(map_id, "jump_beef", at(100))])
        .await
        .unwrap();

    let result = store
        .append_events(
            map_id,
            0,
            &[achievement(map_id, Uuid::new_v4(), 900_000, 2, at(200))],
        )
        .await;

    match result.unwrap_err() {
        DomainError::ConcurrencyConflict {
            aggregate_id,
            expected,
            actual,
        } => {
            assert_eq!(aggregate_id, map_id);
            assert_eq!(expected, 0);
            assert_eq!(actual, 1);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_append_with_gap_in_sequence_is_rejected() {
    let store = MemoryEventStore::new();
    let map_id = Uuid::new_v4();
    store
        .append_events(map_id, 0, &[map_added(map_id, "jump_beef", at(100))])
        .await
        .unwrap();

    let result = store
        .append_events(
            map_id,
            1,
            &[achievement(map_id, Uuid::new_v4(), 900_000, 5, at(200))],
        )
        .await;

    assert!(matches!(result.unwrap_err(), DomainError::Validation(_)));
}

#[tokio::test]
async fn test_append_with_rewound_timestamp_is_rejected() {
    let store = MemoryEventStore::new();
    let map_id = Uuid::new_v4();
    store
        .append_events(map_id, 0, &[map_added(map_id, "jump_beef", at(500))])
        .await
        .unwrap();

    let result = store
        .append_events(
            map_id,
            1,
            &[achievement(map_id, Uuid::new_v4(), 900_000, 2, at(400))],
        )
        .await;

    assert!(matches!(result.unwrap_err(), DomainError::Validation(_)));
}

#[tokio::test]
async fn test_append_to_foreign_stream_is_rejected() {
    let store = MemoryEventStore::new();
    let map_id = Uuid::new_v4();
    let other_stream = Uuid::new_v4();

    let result = store
        .append_events(other_stream, 0, &[map_added(map_id, "jump_beef", at(100))])
        .await;

    assert!(matches!(result.unwrap_err(), DomainError::Validation(_)));
}

#[tokio::test]
async fn test_unknown_event_types_are_stored_but_not_indexed() {
    let store = MemoryEventStore::new();
    let stream_id = Uuid::new_v4();

    store
        .append_events(
            stream_id,
            0,
            &[stored(
                stream_id,
                1,
                at(100),
                "map.retired",
                serde_json::json!({ "reason": "rotation" }),
            )],
        )
        .await
        .unwrap();

    assert_eq!(store.load_events(stream_id).await.unwrap().len(), 1);
    assert!(
        store
            .map_id_by_name("map.retired")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_map_name_index_resolves_registered_names() {
    let store = MemoryEventStore::new();
    let map_id = Uuid::new_v4();
    store
        .append_events(map_id, 0, &[map_added(map_id, "jump_beef", at(100))])
        .await
        .unwrap();

    assert_eq!(
        store.map_id_by_name("jump_beef").await.unwrap(),
        Some(map_id)
    );
    assert_eq!(store.map_id_by_name("jump_ice").await.unwrap(), None);
}

#[tokio::test]
async fn test_player_stream_index_collects_contributing_streams() {
    let store = MemoryEventStore::new();
    let player_id = Uuid::new_v4();
    let map1 = Uuid::new_v4();
    let map2 = Uuid::new_v4();
    for (map_id, name) in [(map1, "jump_beef"), (map2, "jump_ice")] {
        store
            .append_events(map_id, 0, &[map_added(map_id, name, at(100))])
            .await
            .unwrap();
        store
            .append_events(
                map_id,
                1,
                &[achievement(map_id, player_id, 900_000, 2, at(200))],
            )
            .await
            .unwrap();
    }

    let mut streams = store.streams_for_player(player_id).await.unwrap();
    streams.sort();
    let mut expected = vec![map1, map2];
    expected.sort();
    assert_eq!(streams, expected);
}

#[tokio::test]
async fn test_reset_all_clears_streams_and_indexes() {
    let store = MemoryEventStore::new();
    let summary = seed_sample_data(&store).await.unwrap();

    store.reset_all();

    assert!(
        store
            .load_events(summary.map_ids[0])
            .await
            .unwrap()
            .is_empty()
    );
    assert!(store.map_id_by_name("jump_beef").await.unwrap().is_none());
    assert!(
        store
            .streams_for_player(summary.player_ids[0])
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_seeded_map_leaderboard_is_ranked_fastest_first() {
    let store = MemoryEventStore::new();
    let summary = seed_sample_data(&store).await.unwrap();

    let projection = get_map_by_id(summary.map_ids[0], &store).await.unwrap();

    assert_eq!(projection.map_name, "jump_beef");
    let durations: Vec<i64> = projection.records.iter().map(|r| r.duration_ms).collect();
    assert_eq!(
        durations,
        vec![600_000, 700_000, 800_000, 900_000, 1_000_000]
    );
}

#[tokio::test]
async fn test_seeded_map_is_queryable_by_name() {
    let store = MemoryEventStore::new();
    let summary = seed_sample_data(&store).await.unwrap();

    let projection = get_map_by_name("jump_ice", &store, &store).await.unwrap();

    assert_eq!(projection.map_id, summary.map_ids[1]);
    assert_eq!(projection.records.len(), 5);
    assert_eq!(projection.records[0].duration_ms, 100_000);
}

#[tokio::test]
async fn test_seeded_player_projection_spans_both_maps() {
    let store = MemoryEventStore::new();
    let summary = seed_sample_data(&store).await.unwrap();

    let alice = summary.player_ids[0];
    let projection = get_player_by_id(alice, &store, &store).await.unwrap();

    assert_eq!(projection.player_name, "Alice");
    assert_eq!(projection.records.len(), 2);
    assert_eq!(projection.records[0].map_id, summary.map_ids[1]);
    assert_eq!(projection.records[0].duration_ms, 500_000);
    assert_eq!(projection.records[1].map_id, summary.map_ids[0]);
    assert_eq!(projection.records[1].duration_ms, 1_000_000);
}

#[tokio::test]
async fn test_repeated_replay_yields_identical_projections() {
    let store = MemoryEventStore::new();
    let summary = seed_sample_data(&store).await.unwrap();

    let first = get_map_by_id(summary.map_ids[0], &store).await.unwrap();
    let second = get_map_by_id(summary.map_ids[0], &store).await.unwrap();
    let player_first = get_player_by_id(summary.player_ids[4], &store, &store)
        .await
        .unwrap();
    let player_second = get_player_by_id(summary.player_ids[4], &store, &store)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(player_first, player_second);
}

#[tokio::test]
async fn test_faster_rerun_displaces_seeded_record() {
    let store = MemoryEventStore::new();
    let summary = seed_sample_data(&store).await.unwrap();
    let map_id = summary.map_ids[0];
    let alice = summary.player_ids[0];

    // Alice improves her jump_beef time; the stream is at version 6 after
    // creation plus five runs.
    let clock = FixedClock(at(800_000));
    store
        .append_events(
            map_id,
            6,
            &[achievement(map_id, alice, 550_000, 7, clock.now())],
        )
        .await
        .unwrap();

    let projection = get_map_by_id(map_id, &store).await.unwrap();
    assert_eq!(projection.records[0].player_id, alice);
    assert_eq!(projection.records[0].duration_ms, 550_000);
    assert_eq!(projection.records.len(), 5);
}
