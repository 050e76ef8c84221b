//! Capacity under concurrent registrations
//!
//! `attendee_limit + k` distinct users register at the same time; exactly
//! `attendee_limit` must succeed and the rest must see `EventFull`.

use chrono::NaiveDate;
use domain_events::*;
use std::sync::Arc;
use test_utils::{TestDataBuilder, assertions::assert_distinct};
use tokio::task::JoinSet;

fn seed(attendee_limit: u32) -> NewEvent {
    NewEvent {
        title: "Storage Engines Deep Dive".to_string(),
        description: String::new(),
        date: NaiveDate::from_ymd_opt(2026, 11, 12).unwrap(),
        time: "17:30".to_string(),
        format: EventFormat::InPerson,
        location: "Berlin".to_string(),
        attendee_limit,
        status: EventStatus::Published,
        tags: vec![],
        instructor: Instructor {
            id: "inst-1".to_string(),
            name: "Mira".to_string(),
            title: String::new(),
            bio: String::new(),
            avatar: None,
        },
        external_link: None,
        meeting_link: None,
    }
}

async fn race(attendee_limit: u32, extra: usize, builder: TestDataBuilder) {
    let repo = InMemoryEventRepository::new();
    let service = Arc::new(EventService::new(repo.clone()));
    let event_id = service
        .reset_seed_events(vec![seed(attendee_limit)])
        .await
        .unwrap()
        .remove(0)
        .id;

    let mut tasks = JoinSet::new();
    for user_id in builder.user_ids(attendee_limit as usize + extra) {
        let service = Arc::clone(&service);
        let event_id = event_id.clone();
        tasks.spawn(async move { service.register(&event_id, &user_id).await });
    }

    let mut successes = 0;
    let mut full = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => successes += 1,
            Err(EventError::EventFull { .. }) => full += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, attendee_limit as usize);
    assert_eq!(full, extra);
    assert_eq!(repo.write_count(), attendee_limit as usize);

    let event = service.get_event(&event_id, None).await.unwrap();
    assert_eq!(event.participants, attendee_limit);
    assert_eq!(event.spots_left, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_never_exceed_limit() {
    race(5, 20, TestDataBuilder::from_test_name("never_exceed_limit")).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_seat_goes_to_exactly_one_user() {
    race(1, 9, TestDataBuilder::from_test_name("single_seat")).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicates_register_once() {
    let repo = InMemoryEventRepository::new();
    let service = Arc::new(EventService::new(repo.clone()));
    let event_id = service
        .reset_seed_events(vec![seed(10)])
        .await
        .unwrap()
        .remove(0)
        .id;

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let event_id = event_id.clone();
        tasks.spawn(async move { service.register(&event_id, "same-user").await });
    }

    let mut registered = Vec::new();
    let mut duplicates = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(event) => registered.push(event),
            Err(EventError::AlreadyRegistered { .. }) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(registered.len(), 1);
    assert_eq!(duplicates, 7);
    assert_distinct(&registered[0].registered_users, "registered users");
    assert_eq!(repo.write_count(), 1);
}
