//! Statistics endpoint tests.

use crate::support::{
    assert_status, billing_payload, finding_payload, line_item, patient_with_age, TestApp,
};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn service_ranking_merges_invoices_and_credits() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let scaling = Uuid::new_v4();
    let filling = Uuid::new_v4();

    let (status, _) = app
        .post(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![line_item(scaling, "Scaling", 2, "100")]),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "invoice");

    let (status, _) = app
        .post(
            &format!("/api/patients/{patient_id}/credits"),
            billing_payload(vec![
                line_item(scaling, "Scaling", 1, "100"),
                line_item(filling, "Filling", 5, "10"),
            ]),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "credit");

    let (status, body) = app.get("/api/stats/services").await?;
    assert_status(status, StatusCode::OK, "service stats");

    let by_usage = body["data"]["rankByUsage"].as_array().unwrap();
    // Filling is used 5 times, Scaling 3 times across both collections
    assert_eq!(by_usage[0]["serviceName"], "Filling");
    assert_eq!(by_usage[0]["usageCount"], 5);
    assert_eq!(by_usage[1]["serviceName"], "Scaling");
    assert_eq!(by_usage[1]["usageCount"], 3);

    let by_revenue = body["data"]["rankByRevenue"].as_array().unwrap();
    // Scaling brings 300, Filling 50
    assert_eq!(by_revenue[0]["serviceName"], "Scaling");
    assert_eq!(by_revenue[0]["revenue"], "300");
    Ok(())
}

#[tokio::test]
async fn filtered_ranking_requires_a_creator() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app.post("/api/stats/services", json!({})).await?;

    assert_status(status, StatusCode::BAD_REQUEST, "missing creator");
    assert_eq!(body["code"], "invalid");
    Ok(())
}

#[tokio::test]
async fn filtered_ranking_only_counts_the_creators_documents() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let service = Uuid::new_v4();
    let doctor = Uuid::new_v4();
    let other = Uuid::new_v4();

    let (status, _) = app
        .post_as(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![line_item(service, "Scaling", 2, "100")]),
            doctor,
            "dr-sara",
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "doctor invoice");

    let (status, _) = app
        .post_as(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![line_item(service, "Scaling", 7, "100")]),
            other,
            "dr-yonas",
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "other invoice");

    let (status, body) = app
        .post("/api/stats/services", json!({ "createdBy": doctor }))
        .await?;
    assert_status(status, StatusCode::OK, "filtered stats");

    let by_usage = body["data"]["rankByUsage"].as_array().unwrap();
    assert_eq!(by_usage.len(), 1);
    assert_eq!(by_usage[0]["usageCount"], 2);
    Ok(())
}

#[tokio::test]
async fn disease_demographics_bins_by_sex_and_age_band() -> anyhow::Result<()> {
    let app = TestApp::new();
    let caries = app.create_disease("Caries").await?;

    // One infant male, one girl in the folded 15-29 band, one adult woman
    let cases = [(1, "Abel", 0, "male"), (2, "Hanna", 10, "female"), (3, "Sara", 45, "female")];
    for (card, name, age, sex) in cases {
        let (status, body) = app
            .post("/api/patients", patient_with_age(card, name, age, sex))
            .await?;
        assert_status(status, StatusCode::CREATED, "register");
        let patient_id = crate::support::id_of(&body["data"])?;

        let (status, _) = app
            .post(
                &format!("/api/patients/{patient_id}/findings"),
                finding_payload(&[caries]),
            )
            .await?;
        assert_status(status, StatusCode::CREATED, "finding");
    }

    let today = Utc::now().date_naive();
    let (status, body) = app
        .post(
            "/api/stats/diseases",
            json!({
                "startDate": (today - Duration::days(1)).to_string(),
                "endDate": (today + Duration::days(1)).to_string(),
            }),
        )
        .await?;
    assert_status(status, StatusCode::OK, "disease stats");

    let stats = body["data"].as_array().unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["disease"], "Caries");

    let cells = stats[0]["stats"].as_array().unwrap();
    let expected = [
        json!({ "sex": "male", "ageGroup": "<1", "count": 1 }),
        json!({ "sex": "female", "ageGroup": "15-29", "count": 1 }),
        json!({ "sex": "female", "ageGroup": "30-64", "count": 1 }),
    ];
    assert_eq!(cells.len(), expected.len());
    for cell in &expected {
        assert!(cells.contains(cell), "missing cell {cell} in {cells:?}");
    }
    Ok(())
}

#[tokio::test]
async fn disease_demographics_rejects_bad_dates() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/api/stats/diseases",
            json!({ "startDate": "not-a-date", "endDate": "2026-01-01" }),
        )
        .await?;

    assert_status(status, StatusCode::BAD_REQUEST, "bad dates");
    Ok(())
}

#[tokio::test]
async fn age_groups_cover_every_band() -> anyhow::Result<()> {
    let app = TestApp::new();
    for (card, name, age, sex) in [(1, "Abel", 1, "male"), (2, "Sara", 45, "female"), (3, "Hana", 50, "female")] {
        app.post("/api/patients", patient_with_age(card, name, age, sex))
            .await?;
    }

    let (status, body) = app.get("/api/stats/age-groups").await?;
    assert_status(status, StatusCode::OK, "age groups");

    let groups: Vec<(String, i64)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| {
            (
                g["ageGroup"].as_str().unwrap().to_string(),
                g["count"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        groups,
        vec![
            ("<1".to_string(), 1),
            ("1-4".to_string(), 0),
            ("15-29".to_string(), 0),
            ("30-64".to_string(), 2),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn prosthetics_lists_patients_with_bridge_or_crown_work() -> anyhow::Result<()> {
    let app = TestApp::new();
    let with_crown = app.create_patient(1, "Almaz").await?;
    let without = app.create_patient(2, "Bekele").await?;

    let crown_finding = json!({
        "diagnosis": "Crown prep",
        "treatmentPlan": [ { "crown": true } ]
    });
    let (status, _) = app
        .post(&format!("/api/patients/{with_crown}/findings"), crown_finding)
        .await?;
    assert_status(status, StatusCode::CREATED, "crown finding");

    let plain_finding = json!({
        "diagnosis": "Scaling",
        "treatmentDone": [ { "scaling": true } ]
    });
    let (status, _) = app
        .post(&format!("/api/patients/{without}/findings"), plain_finding)
        .await?;
    assert_status(status, StatusCode::CREATED, "plain finding");

    let (status, body) = app.get("/api/stats/prosthetics").await?;
    assert_status(status, StatusCode::OK, "prosthetics");

    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], Value::String(with_crown.to_string()));
    assert_eq!(entries[0]["findings"].as_array().unwrap().len(), 1);
    Ok(())
}
