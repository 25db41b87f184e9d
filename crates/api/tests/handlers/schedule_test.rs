use axum::http::StatusCode;
use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use slotwise_api::services::in_flight::EntityKey;
use slotwise_backend::mock::MockBackend;
use slotwise_core::{
    errors::ScheduleError,
    models::schedule::{AddSlotResponse, EndTimeOptionsResponse, ScheduleDraftResponse},
};
use uuid::Uuid;

use crate::test_utils::{build_state, slot, test_server, test_server_with_state};

#[tokio::test]
async fn test_end_time_options_close_with_last_minute() {
    let server = test_server(MockBackend::new());

    let response = server
        .get("/api/schedule/end-times")
        .add_query_param("start", "22:30")
        .add_query_param("granularity", 30)
        .await;

    response.assert_status_ok();
    let body: EndTimeOptionsResponse = response.json();
    let options: Vec<String> = body.options.iter().map(ToString::to_string).collect();
    assert_eq!(options, vec!["23:00", "23:30", "23:59"]);
}

#[tokio::test]
async fn test_end_time_options_reject_bad_start() {
    let server = test_server(MockBackend::new());

    let response = server
        .get("/api/schedule/end-times")
        .add_query_param("start", "9:00")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "validation");
}

#[tokio::test]
async fn test_schedule_is_loaded_once_and_sorted() {
    let pro_id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_schedule()
        .with(eq(pro_id))
        .times(1)
        .returning(|_| {
            Ok(vec![
                slot(3, "14:00", "15:00"),
                slot(1, "11:00", "12:00"),
                slot(1, "09:00", "10:00"),
            ])
        });
    let server = test_server(backend);

    server.get(&format!("/api/pros/{}/schedule", pro_id)).await;
    let response = server.get(&format!("/api/pros/{}/schedule", pro_id)).await;

    response.assert_status_ok();
    let draft: ScheduleDraftResponse = response.json();
    assert!(!draft.dirty);
    assert_eq!(draft.days.len(), 2);
    assert_eq!(draft.days[0].day_of_week.index(), 1);
    let starts: Vec<String> = draft.days[0]
        .slots
        .iter()
        .map(|s| s.start_time.to_string())
        .collect();
    assert_eq!(starts, vec!["09:00", "11:00"]);
}

#[tokio::test]
async fn test_add_slot_uses_local_weekday_and_stays_local() {
    let pro_id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend.expect_fetch_schedule().returning(|_| Ok(vec![]));
    backend.expect_create_schedule().never();
    backend.expect_replace_schedule().never();
    let server = test_server(backend);

    // 23:00 on Monday in UTC-5 is already Tuesday in UTC.
    let response = server
        .post(&format!("/api/pros/{}/schedule/slots", pro_id))
        .json(&json!({ "date": "2025-03-10T23:00:00-05:00" }))
        .await;

    response.assert_status_ok();
    let body: AddSlotResponse = response.json();
    assert_eq!(body.slot.day_of_week.index(), 1);
    assert_eq!(body.slot.start_time.to_string(), "09:00");
    assert_eq!(body.slot.end_time.to_string(), "10:00");
    assert!(body.schedule.dirty);
}

#[tokio::test]
async fn test_add_slot_skips_taken_time() {
    let pro_id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_schedule()
        .returning(|_| Ok(vec![slot(1, "09:00", "10:00")]));
    let server = test_server(backend);

    let response = server
        .post(&format!("/api/pros/{}/schedule/slots", pro_id))
        .json(&json!({ "date": "2025-03-10" }))
        .await;

    response.assert_status_ok();
    let body: AddSlotResponse = response.json();
    assert_eq!(body.slot.start_time.to_string(), "10:00");
    assert_eq!(body.schedule.days[0].slots.len(), 2);
}

#[tokio::test]
async fn test_first_save_creates_schedule() {
    let pro_id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend.expect_fetch_schedule().returning(|_| Ok(vec![]));
    backend
        .expect_create_schedule()
        .withf(move |id, slots| *id == pro_id && slots.len() == 1)
        .times(1)
        .returning(|_, _| Ok(()));
    backend.expect_replace_schedule().never();
    let server = test_server(backend);

    server
        .post(&format!("/api/pros/{}/schedule/slots", pro_id))
        .json(&json!({ "date": "2025-03-12" }))
        .await
        .assert_status_ok();

    let response = server
        .post(&format!("/api/pros/{}/schedule/save", pro_id))
        .await;

    response.assert_status_ok();
    let draft: ScheduleDraftResponse = response.json();
    assert!(!draft.dirty);
    assert!(!draft.saving);
    assert_eq!(draft.days[0].day_of_week.index(), 3);
}

#[tokio::test]
async fn test_later_save_replaces_schedule_with_current_payload() {
    let pro_id = Uuid::new_v4();
    let existing = slot(2, "08:00", "12:00");
    let existing_id = existing.id;
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_schedule()
        .returning(move |_| Ok(vec![existing.clone()]));
    backend
        .expect_replace_schedule()
        .withf(move |_, slots| {
            slots.len() == 1 && slots[0].id == existing_id && slots[0].end_time.to_string() == "11:00"
        })
        .times(1)
        .returning(|_, _| Ok(()));
    backend.expect_create_schedule().never();
    let server = test_server(backend);

    server
        .patch(&format!("/api/pros/{}/schedule/slots/{}", pro_id, existing_id))
        .json(&json!({ "field": "end_time", "value": "11:00" }))
        .await
        .assert_status_ok();

    server
        .post(&format!("/api/pros/{}/schedule/save", pro_id))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_failed_save_rolls_back_local_edits() {
    let pro_id = Uuid::new_v4();
    let existing = slot(2, "08:00", "12:00");
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_schedule()
        .returning(move |_| Ok(vec![existing.clone()]));
    backend
        .expect_replace_schedule()
        .with(eq(pro_id), always())
        .returning(|_, _| Err(ScheduleError::Transport(eyre::eyre!("backend down"))));
    let server = test_server(backend);

    server
        .post(&format!("/api/pros/{}/schedule/slots", pro_id))
        .json(&json!({ "date": "2025-03-11" }))
        .await
        .assert_status_ok();

    let response = server
        .post(&format!("/api/pros/{}/schedule/save", pro_id))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["kind"], "transport");

    let draft: ScheduleDraftResponse = server
        .get(&format!("/api/pros/{}/schedule", pro_id))
        .await
        .json();
    assert!(!draft.dirty);
    assert!(!draft.saving);
    assert_eq!(draft.days[0].slots.len(), 1);
}

#[tokio::test]
async fn test_update_slot_rejects_overlap_and_bad_values() {
    let pro_id = Uuid::new_v4();
    let first = slot(1, "09:00", "10:00");
    let second = slot(1, "10:00", "11:00");
    let second_id = second.id;
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_schedule()
        .returning(move |_| Ok(vec![first.clone(), second.clone()]));
    let server = test_server(backend);
    let path = format!("/api/pros/{}/schedule/slots/{}", pro_id, second_id);

    let overlap = server
        .patch(&path)
        .json(&json!({ "field": "start_time", "value": "09:30" }))
        .await;
    overlap.assert_status(StatusCode::CONFLICT);

    let empty = server
        .patch(&path)
        .json(&json!({ "field": "end_time", "value": "10:00" }))
        .await;
    empty.assert_status(StatusCode::BAD_REQUEST);

    let malformed = server
        .patch(&path)
        .json(&json!({ "field": "end_time", "value": "25:00" }))
        .await;
    malformed.assert_status(StatusCode::BAD_REQUEST);

    let missing = server
        .patch(&format!("/api/pros/{}/schedule/slots/{}", pro_id, Uuid::new_v4()))
        .json(&json!({ "field": "end_time", "value": "12:00" }))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);

    let draft: ScheduleDraftResponse = server
        .get(&format!("/api/pros/{}/schedule", pro_id))
        .await
        .json();
    assert!(!draft.dirty);
}

#[tokio::test]
async fn test_remove_unknown_slot_is_noop() {
    let pro_id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_schedule()
        .returning(|_| Ok(vec![slot(4, "09:00", "10:00")]));
    let server = test_server(backend);

    let response = server
        .delete(&format!("/api/pros/{}/schedule/slots/{}", pro_id, Uuid::new_v4()))
        .await;

    response.assert_status_ok();
    let draft: ScheduleDraftResponse = response.json();
    assert!(!draft.dirty);
    assert_eq!(draft.days[0].slots.len(), 1);
}

#[tokio::test]
async fn test_slot_taken_checks_same_weekday() {
    let pro_id = Uuid::new_v4();
    let existing = slot(1, "09:00", "10:00");
    let existing_id = existing.id;
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_schedule()
        .returning(move |_| Ok(vec![existing.clone()]));
    let server = test_server(backend);
    let path = format!("/api/pros/{}/schedule/taken", pro_id);

    let taken = |day: u8, start: &'static str| {
        server
            .get(&path)
            .add_query_param("day", day)
            .add_query_param("start", start)
    };

    assert_eq!(taken(1, "09:30").await.json::<Value>()["taken"], true);
    assert_eq!(taken(1, "10:00").await.json::<Value>()["taken"], false);
    assert_eq!(taken(2, "09:30").await.json::<Value>()["taken"], false);

    let excluded = server
        .get(&path)
        .add_query_param("day", 1)
        .add_query_param("start", "09:30")
        .add_query_param("exclude", existing_id)
        .await;
    assert_eq!(excluded.json::<Value>()["taken"], false);

    taken(7, "09:00").await.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_discard_drops_local_edits() {
    let pro_id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend.expect_fetch_schedule().returning(|_| Ok(vec![]));
    let server = test_server(backend);

    server
        .post(&format!("/api/pros/{}/schedule/slots", pro_id))
        .json(&json!({ "date": "2025-03-10" }))
        .await
        .assert_status_ok();

    let response = server
        .post(&format!("/api/pros/{}/schedule/discard", pro_id))
        .await;

    response.assert_status_ok();
    let draft: ScheduleDraftResponse = response.json();
    assert!(!draft.dirty);
    assert!(draft.days.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_second_save_while_saving_is_rejected() {
    let pro_id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend.expect_fetch_schedule().never();
    backend.expect_create_schedule().never();
    backend.expect_replace_schedule().never();
    let state = build_state(backend);

    let _guard = state
        .in_flight
        .try_acquire(EntityKey::ScheduleSave(pro_id))
        .unwrap();
    let server = test_server_with_state(state.clone());

    let response = server
        .post(&format!("/api/pros/{}/schedule/save", pro_id))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "conflict");
}
