//! Patient registration, search and lifecycle tests.

use crate::support::{assert_status, assert_success, patient_payload, TestApp};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_returns_created_patient() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app.post("/api/patients", patient_payload(100, "Almaz")).await?;

    assert_status(status, StatusCode::CREATED, "register");
    assert_success(&body, "register");
    assert_eq!(body["data"]["cardNumber"], 100);
    assert_eq!(body["data"]["firstName"], "Almaz");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["medicalFindings"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn register_rejects_short_names() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app.post("/api/patients", patient_payload(100, "Al")).await?;

    assert_status(status, StatusCode::BAD_REQUEST, "short name");
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_card_numbers() -> anyhow::Result<()> {
    let app = TestApp::new();
    app.create_patient(100, "Almaz").await?;

    let (status, body) = app.post("/api/patients", patient_payload(100, "Bekele")).await?;

    assert_status(status, StatusCode::CONFLICT, "duplicate card");
    assert_eq!(body["code"], "conflict");
    Ok(())
}

#[tokio::test]
async fn search_by_card_number_matches_exactly() -> anyhow::Result<()> {
    let app = TestApp::new();
    app.create_patient(100, "Almaz").await?;
    app.create_patient(1001, "Bekele").await?;

    let (status, body) = app.get("/api/patients/search?cardNumber=100").await?;

    assert_status(status, StatusCode::OK, "search");
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["firstName"], "Almaz");
    Ok(())
}

#[tokio::test]
async fn search_by_name_matches_substring_case_insensitively() -> anyhow::Result<()> {
    let app = TestApp::new();
    app.create_patient(100, "Almaz").await?;
    app.create_patient(101, "Bekele").await?;

    let (status, body) = app.get("/api/patients/search?name=alma").await?;

    assert_status(status, StatusCode::OK, "search by name");
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["cardNumber"], 100);
    Ok(())
}

#[tokio::test]
async fn search_requires_at_least_one_parameter() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/api/patients/search").await?;

    assert_status(status, StatusCode::BAD_REQUEST, "empty search");
    assert_eq!(body["code"], "invalid");
    Ok(())
}

#[tokio::test]
async fn highest_card_reports_the_maximum() -> anyhow::Result<()> {
    let app = TestApp::new();
    app.create_patient(3, "Almaz").await?;
    app.create_patient(42, "Bekele").await?;
    app.create_patient(7, "Chaltu").await?;

    let (status, body) = app.get("/api/patients/highest-card").await?;

    assert_status(status, StatusCode::OK, "highest card");
    assert_eq!(body["data"]["highestCardNumber"], 42);
    Ok(())
}

#[tokio::test]
async fn recent_includes_new_registrations() -> anyhow::Result<()> {
    let app = TestApp::new();
    let id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app.get("/api/patients/recent").await?;

    assert_status(status, StatusCode::OK, "recent");
    let found = body["data"].as_array().unwrap();
    assert!(found.iter().any(|p| p["id"] == id.to_string()));
    Ok(())
}

#[tokio::test]
async fn patch_merges_fields_but_protects_identity() -> anyhow::Result<()> {
    let app = TestApp::new();
    let id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .patch(
            &format!("/api/patients/{id}"),
            json!({ "phone": "0922-111111", "cardNumber": 999, "id": "clobbered" }),
        )
        .await?;

    assert_status(status, StatusCode::OK, "patch patient");
    assert_eq!(body["data"]["phone"], "0922-111111");
    assert_eq!(body["data"]["cardNumber"], 100);
    assert_eq!(body["data"]["id"], id.to_string());
    Ok(())
}

#[tokio::test]
async fn get_unknown_patient_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .get("/api/patients/0d6c6a20-91a4-4f4e-a8dd-6ba60012f1b2")
        .await?;

    assert_status(status, StatusCode::NOT_FOUND, "unknown patient");
    assert_eq!(body["code"], "not-found");
    Ok(())
}

#[tokio::test]
async fn delete_cascades_to_owned_documents() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/findings"),
            crate::support::finding_payload(&[]),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "create finding");
    let finding_id = crate::support::id_of(&body["data"])?;

    let (status, _) = app.delete(&format!("/api/patients/{patient_id}")).await?;
    assert_status(status, StatusCode::OK, "delete patient");

    let (status, _) = app.get(&format!("/api/findings/{finding_id}")).await?;
    assert_status(status, StatusCode::NOT_FOUND, "cascaded finding");
    Ok(())
}
