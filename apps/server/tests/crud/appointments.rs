//! Appointment scheduling and day-window query tests.

use crate::support::{appointment_payload, assert_status, id_of, TestApp};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

#[tokio::test]
async fn create_appends_reference_to_patient() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/appointments"),
            appointment_payload("2030-05-10T00:00:00Z"),
        )
        .await?;

    assert_status(status, StatusCode::CREATED, "create appointment");
    assert_eq!(body["data"]["status"], "Scheduled");
    assert_eq!(body["data"]["patient"]["cardNumber"], 100);
    let appointment_id = id_of(&body["data"])?;

    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    let held = patient["data"]["appointments"].as_array().unwrap();
    assert_eq!(held, &vec![json!(appointment_id)]);
    Ok(())
}

#[tokio::test]
async fn create_for_unknown_patient_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/api/patients/0d6c6a20-91a4-4f4e-a8dd-6ba60012f1b2/appointments",
            appointment_payload("2030-05-10T00:00:00Z"),
        )
        .await?;

    assert_status(status, StatusCode::NOT_FOUND, "unknown patient");
    Ok(())
}

#[tokio::test]
async fn tomorrow_returns_only_scheduled_appointments_in_window() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let today = Utc::now().date_naive();
    let tomorrow = today + Duration::days(1);
    let later = today + Duration::days(2);

    for date in [
        format!("{today}T09:00:00Z"),
        format!("{tomorrow}T09:00:00Z"),
        format!("{later}T09:00:00Z"),
    ] {
        let (status, _) = app
            .post(
                &format!("/api/patients/{patient_id}/appointments"),
                appointment_payload(&date),
            )
            .await?;
        assert_status(status, StatusCode::CREATED, "seed appointment");
    }

    // A cancelled appointment tomorrow must not show up
    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/appointments"),
            appointment_payload(&format!("{tomorrow}T14:00:00Z")),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "seed cancelled");
    let cancelled_id = id_of(&body["data"])?;
    let (status, _) = app
        .patch(
            &format!("/api/appointments/{cancelled_id}"),
            json!({ "status": "Cancelled" }),
        )
        .await?;
    assert_status(status, StatusCode::OK, "cancel");

    let (status, body) = app.get("/api/appointments/tomorrow").await?;
    assert_status(status, StatusCode::OK, "tomorrow");

    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["status"], "Scheduled");
    assert_eq!(
        found[0]["date"].as_str().unwrap()[..10],
        tomorrow.to_string()
    );
    Ok(())
}

#[tokio::test]
async fn by_date_filters_scheduled_on_that_day() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    for date in ["2030-05-10T09:00:00Z", "2030-05-11T09:00:00Z"] {
        app.post(
            &format!("/api/patients/{patient_id}/appointments"),
            appointment_payload(date),
        )
        .await?;
    }

    let (status, body) = app
        .post("/api/appointments/by-date", json!({ "date": "2030-05-10" }))
        .await?;

    assert_status(status, StatusCode::OK, "by date");
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0]["date"].as_str().unwrap().starts_with("2030-05-10"));
    Ok(())
}

#[tokio::test]
async fn by_date_rejects_invalid_dates() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/appointments/by-date", json!({ "date": "10/05/2030" }))
        .await?;

    assert_status(status, StatusCode::BAD_REQUEST, "bad date");
    assert_eq!(body["code"], "invalid");
    Ok(())
}

#[tokio::test]
async fn scheduled_list_is_sorted_by_date_ascending() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    for date in [
        "2030-05-12T09:00:00Z",
        "2030-05-10T09:00:00Z",
        "2030-05-11T09:00:00Z",
    ] {
        app.post(
            &format!("/api/patients/{patient_id}/appointments"),
            appointment_payload(date),
        )
        .await?;
    }

    let (status, body) = app.get("/api/appointments/scheduled").await?;
    assert_status(status, StatusCode::OK, "scheduled");

    let dates: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| &a["date"].as_str().unwrap()[..10])
        .collect();
    assert_eq!(dates, vec!["2030-05-10", "2030-05-11", "2030-05-12"]);
    Ok(())
}

#[tokio::test]
async fn delete_pulls_reference_from_patient() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/appointments"),
            appointment_payload("2030-05-10T09:00:00Z"),
        )
        .await?;
    let appointment_id = id_of(&body["data"])?;

    let (status, _) = app
        .delete(&format!("/api/appointments/{appointment_id}"))
        .await?;
    assert_status(status, StatusCode::OK, "delete appointment");

    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    assert!(patient["data"]["appointments"].as_array().unwrap().is_empty());
    Ok(())
}
