//! End-to-end queue flows through the session facade
//!
//! Drives the same path the application does: booking confirmation →
//! `add_to_queue` → dashboard transitions → stats/display reads.

use std::sync::Arc;

use queue_engine::config::QueueConfig;
use queue_engine::queue::{
    JoinQueueInput, QueueEntryUpdate, QueueSession, QueueStatus, QueueStore,
};

const SLOT_MINUTES: u32 = 15;

fn create_session() -> QueueSession {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    QueueSession::new(Arc::new(QueueStore::new(QueueConfig::with_slot_minutes(
        SLOT_MINUTES,
    ))))
}

fn booking(salon_id: &str, name: &str) -> JoinQueueInput {
    JoinQueueInput {
        salon_id: salon_id.to_string(),
        booking_id: format!("booking-{}", name.to_lowercase()),
        customer_name: name.to_string(),
        customer_phone: "+34 600 123 456".to_string(),
        service_id: "svc-cut".to_string(),
        service_name: "Cut".to_string(),
        notes: None,
    }
}

/// Drive an entry along the strict chain up to `target`
async fn advance_to(session: &QueueSession, salon_id: &str, entry_id: &str, target: QueueStatus) {
    for status in [
        QueueStatus::Called,
        QueueStatus::InService,
        QueueStatus::Completed,
    ] {
        session
            .update_queue_entry(salon_id, entry_id, QueueEntryUpdate::status(status))
            .await;
        assert!(
            session.error().is_none(),
            "transition to {status} failed: {:?}",
            session.error()
        );
        if status == target {
            break;
        }
    }
}

fn waiting_positions(session: &QueueSession, salon_id: &str) -> Vec<u32> {
    let mut positions: Vec<u32> = session
        .queue_for_salon(salon_id)
        .iter()
        .filter(|e| e.status == QueueStatus::Waiting)
        .map(|e| e.position)
        .collect();
    positions.sort_unstable();
    positions
}

// ============================================================================
// Scenario A: first customer in an empty salon
// ============================================================================

#[tokio::test]
async fn first_customer_waits_zero_minutes() {
    let session = create_session();

    let entry = session
        .add_to_queue(booking("salon-a", "Ana"))
        .await
        .expect("add should succeed");

    assert_eq!(entry.position, 1);
    assert_eq!(entry.total_in_queue, 1);
    assert_eq!(entry.estimated_wait_minutes, 0);
    assert_eq!(entry.status, QueueStatus::Waiting);
}

// ============================================================================
// Scenario B: three customers queue in order
// ============================================================================

#[tokio::test]
async fn three_customers_get_positions_in_join_order() {
    let session = create_session();

    let c1 = session.add_to_queue(booking("salon-b", "C1")).await.unwrap();
    let c2 = session.add_to_queue(booking("salon-b", "C2")).await.unwrap();
    let c3 = session.add_to_queue(booking("salon-b", "C3")).await.unwrap();

    assert_eq!(c1.position, 1);
    assert_eq!(c2.position, 2);
    assert_eq!(c3.position, 3);
    assert_eq!(c3.total_in_queue, 3);

    // Monotonic estimate: wait never decreases with position
    let entries = session.queue_for_salon("salon-b");
    for window in entries.windows(2) {
        assert!(window[1].estimated_wait_minutes >= window[0].estimated_wait_minutes);
    }
}

// ============================================================================
// Scenario C: completing the head of the line shifts everyone up
// ============================================================================

#[tokio::test]
async fn completing_head_repositions_and_updates_stats() {
    let session = create_session();

    let c1 = session.add_to_queue(booking("salon-c", "C1")).await.unwrap();
    let c2 = session.add_to_queue(booking("salon-c", "C2")).await.unwrap();
    let c3 = session.add_to_queue(booking("salon-c", "C3")).await.unwrap();
    assert_eq!(session.queue_stats("salon-c").unwrap().total_waiting, 3);

    advance_to(&session, "salon-c", &c1.id, QueueStatus::Completed).await;

    let entries = session.queue_for_salon("salon-c");
    let by_id = |id: &str| entries.iter().find(|e| e.id == id).unwrap();
    assert_eq!(by_id(&c2.id).position, 1);
    assert_eq!(by_id(&c2.id).estimated_wait_minutes, 0);
    assert_eq!(by_id(&c3.id).position, 2);
    assert_eq!(by_id(&c3.id).estimated_wait_minutes, SLOT_MINUTES);

    let stats = session.queue_stats("salon-c").unwrap();
    assert_eq!(stats.total_waiting, 2);
    assert_eq!(stats.total_completed, 1);
}

// ============================================================================
// Scenario D: completing a WAITING entry directly is rejected
// ============================================================================

#[tokio::test]
async fn skipping_the_chain_is_rejected() {
    let session = create_session();

    session.add_to_queue(booking("salon-d", "C1")).await.unwrap();
    let c2 = session.add_to_queue(booking("salon-d", "C2")).await.unwrap();

    session
        .update_queue_entry(
            "salon-d",
            &c2.id,
            QueueEntryUpdate::status(QueueStatus::Completed),
        )
        .await;

    let message = session.error().expect("facade should store the failure");
    assert!(message.contains("Invalid status transition"));

    // C2 is untouched and still holds position 2
    let entries = session.queue_for_salon("salon-d");
    let c2_after = entries.iter().find(|e| e.id == c2.id).unwrap();
    assert_eq!(c2_after.status, QueueStatus::Waiting);
    assert_eq!(c2_after.position, 2);
}

// ============================================================================
// Scenario E: removing a nonexistent entry degrades gracefully
// ============================================================================

#[tokio::test]
async fn remove_missing_entry_stores_error_and_clears_loading() {
    let session = create_session();

    session.remove_from_queue("salon-e", "no-such-entry").await;

    let message = session.error().expect("error should be populated");
    assert!(!message.is_empty());
    assert!(!session.is_loading());
}

// ============================================================================
// Dense positions under a realistic mixed day
// ============================================================================

#[tokio::test]
async fn positions_stay_dense_through_a_busy_afternoon() {
    let session = create_session();
    let salon = "salon-busy";

    let mut ids = Vec::new();
    for name in ["Ana", "Bea", "Carla", "Dana", "Eva", "Fay"] {
        ids.push(session.add_to_queue(booking(salon, name)).await.unwrap().id);
    }
    assert_eq!(waiting_positions(&session, salon), vec![1, 2, 3, 4, 5, 6]);

    // Ana is served, Carla cancels, Bea never shows up
    advance_to(&session, salon, &ids[0], QueueStatus::InService).await;
    session.remove_from_queue(salon, &ids[2]).await;
    session
        .update_queue_entry(salon, &ids[1], QueueEntryUpdate::status(QueueStatus::NoShow))
        .await;
    assert!(session.error().is_none());

    assert_eq!(waiting_positions(&session, salon), vec![1, 2, 3]);

    let stats = session.queue_stats(salon).unwrap();
    assert_eq!(stats.total_waiting, 3);
    assert_eq!(stats.total_in_service, 1);

    // Stats consistency: aggregate matches a direct count
    let waiting_count = session
        .queue_for_salon(salon)
        .iter()
        .filter(|e| e.status == QueueStatus::Waiting)
        .count() as u32;
    assert_eq!(stats.total_waiting, waiting_count);
}

// ============================================================================
// Idempotent refresh
// ============================================================================

#[tokio::test]
async fn refresh_twice_yields_identical_queue() {
    let session = create_session();
    let salon = "salon-refresh";

    for name in ["Ana", "Bea", "Carla"] {
        session.add_to_queue(booking(salon, name)).await.unwrap();
    }

    session.refresh_queue(salon).await;
    let first: Vec<_> = session
        .queue_for_salon(salon)
        .into_iter()
        .map(|e| (e.id, e.position, e.total_in_queue, e.estimated_wait_minutes))
        .collect();

    session.refresh_queue(salon).await;
    let second: Vec<_> = session
        .queue_for_salon(salon)
        .into_iter()
        .map(|e| (e.id, e.position, e.total_in_queue, e.estimated_wait_minutes))
        .collect();

    assert_eq!(first, second);
    assert!(session.error().is_none());
}

// ============================================================================
// Salon isolation
// ============================================================================

#[tokio::test]
async fn operations_never_leak_across_salons() {
    let session = create_session();

    let left = session.add_to_queue(booking("salon-l", "Ana")).await.unwrap();
    session.add_to_queue(booking("salon-r", "Zoe")).await.unwrap();

    advance_to(&session, "salon-l", &left.id, QueueStatus::Completed).await;

    // salon-r is untouched
    let right = session.queue_for_salon("salon-r");
    assert_eq!(right.len(), 1);
    assert_eq!(right[0].position, 1);
    assert_eq!(right[0].status, QueueStatus::Waiting);
    assert_eq!(session.queue_stats("salon-r").unwrap().total_waiting, 1);
    assert_eq!(session.queue_stats("salon-l").unwrap().total_completed, 1);
}

// ============================================================================
// Real-time channel: a viewer store mirrors the owner via events
// ============================================================================

#[tokio::test]
async fn viewer_session_mirrors_owner_through_events() {
    let owner = create_session();
    let viewer = create_session();
    let mut rx = owner.store().subscribe();

    let entry = owner.add_to_queue(booking("salon-rt", "Ana")).await.unwrap();
    owner
        .update_queue_entry(
            "salon-rt",
            &entry.id,
            QueueEntryUpdate::status(QueueStatus::Called),
        )
        .await;

    while let Ok(event) = rx.try_recv() {
        viewer.apply_external(event);
    }

    let mirrored = viewer.queue_for_salon("salon-rt");
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored[0].status, QueueStatus::Called);
    assert_eq!(
        viewer.queue_stats("salon-rt").unwrap().total_waiting,
        owner.queue_stats("salon-rt").unwrap().total_waiting
    );
}
