//! Health info, prescription and certificate tests.

use crate::support::{assert_status, health_info_payload, id_of, TestApp};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_info_attaches_to_patient() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/health-info"),
            health_info_payload(),
        )
        .await?;

    assert_status(status, StatusCode::CREATED, "create health info");
    assert_eq!(body["data"]["screening"]["asthma"], true);
    let record_id = id_of(&body["data"])?;

    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    let held = patient["data"]["healthInfo"].as_array().unwrap();
    assert_eq!(held, &vec![json!(record_id)]);
    Ok(())
}

#[tokio::test]
async fn health_info_requires_vitals() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/health-info"),
            json!({ "bloodPressure": "", "heartRate": "" }),
        )
        .await?;

    assert_status(status, StatusCode::BAD_REQUEST, "missing vitals");
    assert_eq!(body["code"], "invalid");
    Ok(())
}

#[tokio::test]
async fn health_info_patch_updates_vitals() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/health-info"),
            health_info_payload(),
        )
        .await?;
    let record_id = id_of(&body["data"])?;

    let (status, body) = app
        .patch(
            &format!("/api/health-info/{record_id}"),
            json!({ "heartRate": "88" }),
        )
        .await?;

    assert_status(status, StatusCode::OK, "patch health info");
    assert_eq!(body["data"]["heartRate"], "88");
    assert_eq!(body["data"]["bloodPressure"], "120/80");
    Ok(())
}

#[tokio::test]
async fn prescriptions_round_trip() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/prescriptions"),
            json!({ "medicine": "Amoxicillin 500mg", "diagnosis": "Abscess" }),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "create prescription");
    let prescription_id = id_of(&body["data"])?;

    let (status, body) = app
        .get(&format!("/api/patients/{patient_id}/prescriptions"))
        .await?;
    assert_status(status, StatusCode::OK, "list prescriptions");
    assert_eq!(body["data"][0]["id"], prescription_id.to_string());

    let (status, _) = app
        .delete(&format!("/api/prescriptions/{prescription_id}"))
        .await?;
    assert_status(status, StatusCode::OK, "delete prescription");

    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    assert!(patient["data"]["prescriptions"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn prescription_requires_medicine() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, _) = app
        .post(
            &format!("/api/patients/{patient_id}/prescriptions"),
            json!({ "medicine": "" }),
        )
        .await?;

    assert_status(status, StatusCode::BAD_REQUEST, "empty medicine");
    Ok(())
}

#[tokio::test]
async fn certificate_numbers_start_at_floor_and_increment() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/certificates"),
            json!({ "diagnosis": "Extraction", "restPeriod": "3 days" }),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "first certificate");
    assert_eq!(body["data"]["number"], 100_000);

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/certificates"),
            json!({ "diagnosis": "Follow-up" }),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "second certificate");
    assert_eq!(body["data"]["number"], 100_001);
    Ok(())
}
