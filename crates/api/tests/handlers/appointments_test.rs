use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::http::StatusCode;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::Value;
use slotwise_api::services::{appointments::AppointmentBook, in_flight::InFlight};
use slotwise_backend::mock::MockBackend;
use slotwise_core::{
    errors::{ErrorKind, ScheduleError},
    models::{
        appointment::{AgendaResponse, AppointmentStatus, TransitionResponse},
        session::{Session, SessionDuration, SessionNature},
    },
    scheduling::lifecycle::AppointmentAction,
};
use uuid::Uuid;

use crate::test_utils::{appointment, build_state, test_server, test_server_with_state};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap()
}

fn agenda_path(pro_id: Uuid) -> String {
    format!("/api/pros/{}/appointments/agenda", pro_id)
}

#[tokio::test]
async fn test_agenda_buckets_by_status_and_end_time() {
    let pro_id = Uuid::new_v4();
    let running = appointment(
        pro_id,
        AppointmentStatus::Confirmed,
        now() - Duration::minutes(20),
        Some("45m"),
    );
    let finished = appointment(
        pro_id,
        AppointmentStatus::Confirmed,
        now() - Duration::minutes(60),
        Some("30m"),
    );
    let old_request = appointment(
        pro_id,
        AppointmentStatus::Pending,
        now() - Duration::days(3),
        None,
    );
    let cancelled = appointment(
        pro_id,
        AppointmentStatus::Cancelled,
        now() + Duration::days(1),
        None,
    );
    let mut calendar = appointment(pro_id, AppointmentStatus::Confirmed, now(), None);
    calendar.kind = Some("calendar".to_string());

    let records = vec![
        running.clone(),
        finished.clone(),
        old_request.clone(),
        cancelled.clone(),
        calendar,
    ];
    let mut backend = MockBackend::new();
    backend
        .expect_list_appointments()
        .times(1)
        .returning(move |_| Ok(records.clone()));
    backend
        .expect_list_sessions()
        .with(eq(pro_id))
        .returning(|_| Ok(vec![]));
    let server = test_server(backend);

    let response = server
        .get(&agenda_path(pro_id))
        .add_query_param("now", now().to_rfc3339())
        .await;

    response.assert_status_ok();
    let agenda: AgendaResponse = response.json();
    assert_eq!(agenda.confirmed_upcoming, vec![running]);
    assert_eq!(agenda.pending_upcoming, vec![old_request]);
    assert_eq!(agenda.historic, vec![cancelled, finished]);
    assert_eq!(agenda.refresh_at, Some(now() + Duration::minutes(25)));
}

#[tokio::test]
async fn test_agenda_crosses_into_historic_at_end_time() {
    let pro_id = Uuid::new_v4();
    let session = appointment(pro_id, AppointmentStatus::Confirmed, now(), Some("45m"));
    let records = vec![session.clone()];
    let mut backend = MockBackend::new();
    // Second request is served from the cached snapshot.
    backend
        .expect_list_appointments()
        .times(1)
        .returning(move |_| Ok(records.clone()));
    backend.expect_list_sessions().never();
    let server = test_server(backend);

    let before: AgendaResponse = server
        .get(&agenda_path(pro_id))
        .add_query_param("now", (now() + Duration::minutes(44)).to_rfc3339())
        .await
        .json();
    let after: AgendaResponse = server
        .get(&agenda_path(pro_id))
        .add_query_param("now", (now() + Duration::minutes(45)).to_rfc3339())
        .await
        .json();

    assert_eq!(before.confirmed_upcoming.len(), 1);
    assert!(before.historic.is_empty());
    assert!(after.confirmed_upcoming.is_empty());
    assert_eq!(after.historic, vec![session]);
    assert_eq!(after.refresh_at, None);
}

#[tokio::test]
async fn test_agenda_falls_back_to_session_catalogue() {
    let pro_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();
    let mut booked = appointment(
        pro_id,
        AppointmentStatus::Confirmed,
        now() - Duration::minutes(50),
        None,
    );
    booked.session_id = Some(session_id);
    let records = vec![booked];
    let mut backend = MockBackend::new();
    backend
        .expect_list_appointments()
        .returning(move |_| Ok(records.clone()));
    backend.expect_list_sessions().returning(move |_| {
        Ok(vec![Session {
            id: session_id,
            pro_id,
            price: 120.0,
            session_type: SessionDuration::Minutes60.to_string(),
            session_nature: SessionNature::OneTime,
            is_active: true,
            extra: Default::default(),
        }])
    });
    let server = test_server(backend);

    let agenda: AgendaResponse = server
        .get(&agenda_path(pro_id))
        .add_query_param("now", now().to_rfc3339())
        .await
        .json();

    assert_eq!(agenda.confirmed_upcoming.len(), 1);
    assert_eq!(agenda.refresh_at, Some(now() + Duration::minutes(10)));
}

#[tokio::test]
async fn test_agenda_tolerates_non_standard_catalogue_entries() {
    let pro_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();
    let mut booked = appointment(
        pro_id,
        AppointmentStatus::Confirmed,
        now() - Duration::minutes(60),
        None,
    );
    booked.session_id = Some(session_id);
    let records = vec![booked];
    let mut backend = MockBackend::new();
    backend
        .expect_list_appointments()
        .returning(move |_| Ok(records.clone()));
    backend.expect_list_sessions().times(1).returning(move |_| {
        let session = |id: Uuid, session_type: &str| Session {
            id,
            pro_id,
            price: 150.0,
            session_type: session_type.to_string(),
            session_nature: SessionNature::OneTime,
            is_active: true,
            extra: Default::default(),
        };
        Ok(vec![session(Uuid::new_v4(), "45m"), session(session_id, "90m")])
    });
    let server = test_server(backend);

    let response = server
        .get(&agenda_path(pro_id))
        .add_query_param("now", now().to_rfc3339())
        .await;

    response.assert_status_ok();
    let agenda: AgendaResponse = response.json();
    assert_eq!(agenda.confirmed_upcoming.len(), 1);
    assert_eq!(agenda.refresh_at, Some(now() + Duration::minutes(30)));
}

#[tokio::test]
async fn test_confirm_pending_appointment() {
    let pro_id = Uuid::new_v4();
    let pending = appointment(pro_id, AppointmentStatus::Pending, now(), None);
    let id = pending.id;
    let records = vec![pending];
    let mut backend = MockBackend::new();
    backend
        .expect_list_appointments()
        .returning(move |_| Ok(records.clone()));
    backend
        .expect_update_appointment_status()
        .with(eq(id), eq(AppointmentStatus::Confirmed))
        .times(1)
        .returning(|_, _| Ok(()));
    let server = test_server(backend);

    let response = server
        .post(&format!("/api/pros/{}/appointments/{}/confirm", pro_id, id))
        .await;

    response.assert_status_ok();
    let body: TransitionResponse = response.json();
    assert_eq!(body.id, id);
    assert_eq!(body.status, AppointmentStatus::Confirmed);
}

#[test_log::test(tokio::test)]
async fn test_confirm_cancelled_appointment_is_rejected_without_backend_call() {
    let pro_id = Uuid::new_v4();
    let cancelled = appointment(pro_id, AppointmentStatus::Cancelled, now(), None);
    let id = cancelled.id;
    let records = vec![cancelled];
    let mut backend = MockBackend::new();
    backend
        .expect_list_appointments()
        .returning(move |_| Ok(records.clone()));
    backend.expect_update_appointment_status().never();
    let server = test_server(backend);

    let response = server
        .post(&format!("/api/pros/{}/appointments/{}/confirm", pro_id, id))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["kind"], "transition");
}

#[tokio::test]
async fn test_cancel_confirmed_appointment_refreshes_snapshot() {
    let pro_id = Uuid::new_v4();
    let confirmed = appointment(pro_id, AppointmentStatus::Confirmed, now(), Some("30m"));
    let id = confirmed.id;
    let mut after_cancel = confirmed.clone();
    after_cancel.status = AppointmentStatus::Cancelled;

    let mut backend = MockBackend::new();
    let mut fetches = 0;
    backend
        .expect_list_appointments()
        .times(2)
        .returning(move |_| {
            fetches += 1;
            if fetches == 1 {
                Ok(vec![confirmed.clone()])
            } else {
                Ok(vec![after_cancel.clone()])
            }
        });
    backend
        .expect_update_appointment_status()
        .with(eq(id), eq(AppointmentStatus::Cancelled))
        .times(1)
        .returning(|_, _| Ok(()));
    backend.expect_list_sessions().returning(|_| Ok(vec![]));
    let server = test_server(backend);

    server
        .post(&format!("/api/pros/{}/appointments/{}/cancel", pro_id, id))
        .await
        .assert_status_ok();

    let agenda: AgendaResponse = server
        .get(&agenda_path(pro_id))
        .add_query_param("now", now().to_rfc3339())
        .await
        .json();
    assert!(agenda.confirmed_upcoming.is_empty());
    assert_eq!(agenda.historic.len(), 1);
    assert_eq!(agenda.historic[0].status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn test_fetch_overtaken_by_invalidation_is_not_cached() {
    let pro_id = Uuid::new_v4();
    let pending = appointment(pro_id, AppointmentStatus::Pending, now(), None);
    let id = pending.id;
    let mut cancelled = pending.clone();
    cancelled.status = AppointmentStatus::Cancelled;

    let book = Arc::new(AppointmentBook::new(Duration::minutes(5)));
    let fetches = Arc::new(AtomicUsize::new(0));
    let mut backend = MockBackend::new();
    {
        let book = Arc::clone(&book);
        let fetches = Arc::clone(&fetches);
        backend.expect_list_appointments().returning(move |_| {
            if fetches.fetch_add(1, Ordering::SeqCst) == 0 {
                // A cancel settles while this list is still on the wire.
                book.invalidate(pro_id);
                Ok(vec![pending.clone()])
            } else {
                Ok(vec![cancelled.clone()])
            }
        });
    }
    backend.expect_update_appointment_status().never();

    let first = book.list(&backend, pro_id, None).await.unwrap();
    assert_eq!(first[0].status, AppointmentStatus::Pending);

    let second = book.list(&backend, pro_id, None).await.unwrap();
    assert_eq!(second[0].status, AppointmentStatus::Cancelled);

    let err = book
        .transition(&backend, &InFlight::new(), pro_id, id, AppointmentAction::Confirm)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transition);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_transition_on_unknown_appointment_is_not_found() {
    let pro_id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend.expect_list_appointments().returning(|_| Ok(vec![]));
    backend.expect_update_appointment_status().never();
    let server = test_server(backend);

    let response = server
        .post(&format!(
            "/api/pros/{}/appointments/{}/cancel",
            pro_id,
            Uuid::new_v4()
        ))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_backend_rejection_leaves_status_unchanged() {
    let pro_id = Uuid::new_v4();
    let pending = appointment(pro_id, AppointmentStatus::Pending, now(), None);
    let id = pending.id;
    let records = vec![pending];
    let mut backend = MockBackend::new();
    backend
        .expect_list_appointments()
        .times(1)
        .returning(move |_| Ok(records.clone()));
    backend
        .expect_update_appointment_status()
        .times(1)
        .returning(|_, _| Err(ScheduleError::Transport(eyre::eyre!("connection reset"))));
    backend.expect_list_sessions().returning(|_| Ok(vec![]));
    let server = test_server(backend);

    server
        .post(&format!("/api/pros/{}/appointments/{}/confirm", pro_id, id))
        .await
        .assert_status(StatusCode::BAD_GATEWAY);

    let agenda: AgendaResponse = server
        .get(&agenda_path(pro_id))
        .add_query_param("now", now().to_rfc3339())
        .await
        .json();
    assert_eq!(agenda.pending_upcoming.len(), 1);
    assert_eq!(agenda.pending_upcoming[0].status, AppointmentStatus::Pending);
}

#[test_log::test(tokio::test)]
async fn test_second_action_on_busy_appointment_is_rejected() {
    let pro_id = Uuid::new_v4();
    let id = Uuid::new_v4();
    let mut backend = MockBackend::new();
    backend.expect_list_appointments().never();
    backend.expect_update_appointment_status().never();
    let state = build_state(backend);

    let _guard = state
        .in_flight
        .try_acquire(slotwise_api::services::in_flight::EntityKey::Appointment(id))
        .unwrap();
    let server = test_server_with_state(state.clone());

    let response = server
        .post(&format!("/api/pros/{}/appointments/{}/confirm", pro_id, id))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "conflict");
}
