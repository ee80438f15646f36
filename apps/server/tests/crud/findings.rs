//! Medical finding lifecycle tests: parent references, disease name
//! resolution, change history and cascade behavior.

use crate::support::{assert_status, finding_payload, id_of, TestApp};
use axum::http::StatusCode;
use molar::db::Collection;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn create_appends_reference_to_patient() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/findings"),
            finding_payload(&[]),
        )
        .await?;

    assert_status(status, StatusCode::CREATED, "create finding");
    let finding_id = id_of(&body["data"])?;

    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    let held = patient["data"]["medicalFindings"].as_array().unwrap();
    assert_eq!(held, &vec![json!(finding_id)]);
    Ok(())
}

#[tokio::test]
async fn create_for_unknown_patient_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/api/patients/0d6c6a20-91a4-4f4e-a8dd-6ba60012f1b2/findings",
            finding_payload(&[]),
        )
        .await?;

    assert_status(status, StatusCode::NOT_FOUND, "unknown patient");
    Ok(())
}

#[tokio::test]
async fn list_resolves_disease_names_newest_first() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let caries = app.create_disease("Caries").await?;
    let unknown = Uuid::new_v4();

    let (status, _) = app
        .post(
            &format!("/api/patients/{patient_id}/findings"),
            finding_payload(&[caries]),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "first finding");

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/findings"),
            finding_payload(&[caries, unknown]),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "second finding");
    let newest_id = id_of(&body["data"])?;

    let (status, body) = app
        .get(&format!("/api/patients/{patient_id}/findings"))
        .await?;
    assert_status(status, StatusCode::OK, "list findings");

    let findings = body["data"].as_array().unwrap();
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0]["id"], newest_id.to_string());
    assert_eq!(
        findings[0]["diseases"],
        json!(["Caries", "Unknown disease"])
    );
    Ok(())
}

#[tokio::test]
async fn detail_flattens_disease_links_to_ids() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let caries = app.create_disease("Caries").await?;

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/findings"),
            finding_payload(&[caries]),
        )
        .await?;
    let finding_id = id_of(&body["data"])?;

    let (status, body) = app.get(&format!("/api/findings/{finding_id}")).await?;
    assert_status(status, StatusCode::OK, "detail");
    assert_eq!(body["data"]["diseases"], json!([caries]));
    Ok(())
}

#[tokio::test]
async fn patch_merges_fields_and_appends_change_history() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let caries = app.create_disease("Caries").await?;

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/findings"),
            finding_payload(&[]),
        )
        .await?;
    let finding_id = id_of(&body["data"])?;

    let (status, body) = app
        .patch(
            &format!("/api/findings/{finding_id}"),
            json!({ "diagnosis": "Periapical abscess", "diseases": [caries] }),
        )
        .await?;

    assert_status(status, StatusCode::OK, "patch finding");
    assert_eq!(body["data"]["diagnosis"], "Periapical abscess");
    assert_eq!(body["data"]["diseases"][0]["disease"], caries.to_string());

    let history = body["data"]["changeHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["changes"]["diagnosis"], "Periapical abscess");
    Ok(())
}

#[tokio::test]
async fn delete_removes_finding_and_pulls_patient_reference() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/findings"),
            finding_payload(&[]),
        )
        .await?;
    let finding_id = id_of(&body["data"])?;

    let (status, _) = app.delete(&format!("/api/findings/{finding_id}")).await?;
    assert_status(status, StatusCode::OK, "delete finding");

    let (status, _) = app.get(&format!("/api/findings/{finding_id}")).await?;
    assert_status(status, StatusCode::NOT_FOUND, "deleted finding");

    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    assert!(patient["data"]["medicalFindings"]
        .as_array()
        .unwrap()
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_without_an_owner_still_succeeds() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/findings"),
            finding_payload(&[]),
        )
        .await?;
    let finding_id = id_of(&body["data"])?;

    // Drop the patient document out from under the finding, bypassing the
    // cascade, so no owner holds the reference anymore.
    app.state
        .store
        .remove(Collection::Patients, patient_id)
        .await?;

    let (status, body) = app.delete(&format!("/api/findings/{finding_id}")).await?;
    assert_status(status, StatusCode::OK, "orphan delete");
    assert_eq!(body["success"], true);
    Ok(())
}
