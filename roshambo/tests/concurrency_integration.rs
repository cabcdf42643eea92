//! Concurrency tests for the room registry.
//!
//! Many tasks race to join, leave and play in the same rooms; the room
//! invariants must hold once everything settles.

use roshambo::{RegistryError, RoomRegistry, ServerMessage, game::PlayerId};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinSet};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_admit_exactly_two() {
    let registry = Arc::new(RoomRegistry::default());
    let mut tasks = JoinSet::new();

    for i in 0..20 {
        let registry = registry.clone();
        tasks.spawn(async move {
            let (transport, outbound) = registry.transport();
            let result = registry
                .add_player("crowded", Some(&format!("p{i}")), transport)
                .await;
            (result, outbound)
        });
    }

    let mut admitted = 0;
    let mut rejected = 0;
    let mut receivers = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (result, outbound) = joined.unwrap();
        match result {
            Ok(_) => {
                admitted += 1;
                receivers.push(outbound);
            }
            Err(RegistryError::RoomFull(_)) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(admitted, 2);
    assert_eq!(rejected, 18);
    assert_eq!(registry.room_count().await, 1);
    assert_eq!(
        registry.room_state("crowded").await.unwrap().players.len(),
        2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_join_leave_churn_never_leaves_empty_rooms() {
    let registry = Arc::new(RoomRegistry::default());
    let mut tasks = JoinSet::new();

    for i in 0..40 {
        let registry = registry.clone();
        let room_id = format!("room-{}", i % 4);
        tasks.spawn(async move {
            let (transport, _outbound) = registry.transport();
            match registry.add_player(&room_id, None, transport).await {
                Ok(joined) => {
                    tokio::task::yield_now().await;
                    registry
                        .remove_player(&room_id, joined.player_id)
                        .await
                        .unwrap();
                }
                Err(RegistryError::RoomFull(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        });
    }

    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }

    // Everyone left, so every room must be gone.
    assert!(registry.list_rooms().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_choices_resolve_once() {
    let registry = Arc::new(RoomRegistry::default());

    let mut players: Vec<(PlayerId, mpsc::Receiver<ServerMessage>)> = Vec::new();
    for name in ["alice", "bob"] {
        let (transport, outbound) = registry.transport();
        let joined = registry
            .add_player("duel", Some(name), transport)
            .await
            .unwrap();
        players.push((joined.player_id, outbound));
    }

    for _ in 0..10 {
        let mut tasks = JoinSet::new();
        for (player_id, _) in &players {
            let registry = registry.clone();
            let player_id = *player_id;
            tasks.spawn(async move { registry.submit_choice("duel", player_id, "rock").await });
        }

        let mut resolved = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap().unwrap().is_some() {
                resolved += 1;
            }
        }
        assert_eq!(resolved, 1);
    }

    let state = registry.room_state("duel").await.unwrap();
    assert_eq!(state.round_results.len(), 10);
    assert!(state.round_results.iter().all(|outcome| outcome.is_tie()));

    for (_, outbound) in &mut players {
        let mut results = 0;
        while let Ok(message) = outbound.try_recv() {
            if matches!(message, ServerMessage::RoundResult(_)) {
                results += 1;
            }
        }
        assert_eq!(results, 10);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reads_of_other_rooms_complete_during_churn() {
    let registry = Arc::new(RoomRegistry::default());
    let mut seated = Vec::new();
    for name in ["alice", "bob"] {
        let (transport, outbound) = registry.transport();
        registry
            .add_player("steady", Some(name), transport)
            .await
            .unwrap();
        seated.push(outbound);
    }

    let mut churn = JoinSet::new();
    for i in 0..40 {
        let registry = registry.clone();
        churn.spawn(async move {
            let room_id = format!("busy-{}", i % 4);
            let (transport, _outbound) = registry.transport();
            if let Ok(joined) = registry.add_player(&room_id, None, transport).await {
                registry
                    .remove_player(&room_id, joined.player_id)
                    .await
                    .unwrap();
            }
        });
    }

    let reads = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        for _ in 0..50 {
            let snapshot = registry.room_state("steady").await.unwrap();
            assert_eq!(snapshot.players.len(), 2);
            tokio::task::yield_now().await;
        }
    });
    reads.await.expect("reads stalled behind joins and leaves");

    while let Some(result) = churn.join_next().await {
        result.unwrap();
    }
    assert_eq!(registry.list_rooms().await, ["steady"]);
}
