//! Invoice, credit and card tests.

use crate::support::{assert_status, billing_payload, id_of, line_item, TestApp};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn invoice_totals_are_computed_from_line_items() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let scaling = Uuid::new_v4();
    let filling = Uuid::new_v4();

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![
                line_item(scaling, "Scaling", 2, "100"),
                line_item(filling, "Filling", 1, "250.50"),
            ]),
        )
        .await?;

    assert_status(status, StatusCode::CREATED, "create invoice");
    assert_eq!(body["data"]["total"], "450.50");
    assert_eq!(body["data"]["balance"], "450.50");
    assert_eq!(body["data"]["status"], "Pending");
    assert_eq!(body["data"]["customer"]["cardNumber"], 100);

    let invoice_id = id_of(&body["data"])?;
    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    let held = patient["data"]["invoices"].as_array().unwrap();
    assert_eq!(held, &vec![json!(invoice_id)]);
    Ok(())
}

#[tokio::test]
async fn invoice_requires_line_items() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![]),
        )
        .await?;

    assert_status(status, StatusCode::BAD_REQUEST, "empty invoice");
    assert_eq!(body["code"], "invalid");
    Ok(())
}

#[tokio::test]
async fn payment_confirmation_updates_balance_and_status() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let service = Uuid::new_v4();

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![line_item(service, "Root canal", 1, "300")]),
        )
        .await?;
    let invoice_id = id_of(&body["data"])?;

    let (status, body) = app
        .patch(
            &format!("/api/invoices/{invoice_id}"),
            json!({ "amount": "300", "receipt": true }),
        )
        .await?;

    assert_status(status, StatusCode::OK, "record payment");
    assert_eq!(body["data"]["paid"], "300");
    assert_eq!(body["data"]["balance"], "0");
    assert_eq!(body["data"]["status"], "Paid");
    assert_eq!(body["data"]["currentPayment"]["confirmed"], true);
    assert_eq!(body["data"]["currentPayment"]["receipt"], true);
    assert_eq!(body["data"]["changeHistory"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn partial_payment_leaves_partial_status() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let service = Uuid::new_v4();

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![line_item(service, "Crown", 1, "1000")]),
        )
        .await?;
    let invoice_id = id_of(&body["data"])?;

    let (_, body) = app
        .patch(
            &format!("/api/invoices/{invoice_id}"),
            json!({ "amount": "400" }),
        )
        .await?;

    assert_eq!(body["data"]["balance"], "600");
    assert_eq!(body["data"]["status"], "Partial");
    Ok(())
}

#[tokio::test]
async fn unconfirmed_filter_tracks_payment_state() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let service = Uuid::new_v4();

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![line_item(service, "Scaling", 1, "100")]),
        )
        .await?;
    let invoice_id = id_of(&body["data"])?;

    let (status, body) = app.get("/api/invoices/unconfirmed").await?;
    assert_status(status, StatusCode::OK, "unconfirmed");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .patch(
            &format!("/api/invoices/{invoice_id}"),
            json!({ "amount": "100" }),
        )
        .await?;
    assert_status(status, StatusCode::OK, "confirm");

    let (_, body) = app.get("/api/invoices/unconfirmed").await?;
    assert!(body["data"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn rejects_non_positive_payments() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let service = Uuid::new_v4();

    let (_, body) = app
        .post(
            &format!("/api/patients/{patient_id}/invoices"),
            billing_payload(vec![line_item(service, "Scaling", 1, "100")]),
        )
        .await?;
    let invoice_id = id_of(&body["data"])?;

    let (status, _) = app
        .patch(
            &format!("/api/invoices/{invoice_id}"),
            json!({ "amount": "0" }),
        )
        .await?;

    assert_status(status, StatusCode::BAD_REQUEST, "zero payment");
    Ok(())
}

#[tokio::test]
async fn credits_mirror_invoices() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;
    let service = Uuid::new_v4();

    let (status, body) = app
        .post(
            &format!("/api/patients/{patient_id}/credits"),
            billing_payload(vec![line_item(service, "Denture", 1, "2000")]),
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "create credit");
    let credit_id = id_of(&body["data"])?;

    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    let held = patient["data"]["credits"].as_array().unwrap();
    assert_eq!(held, &vec![json!(credit_id)]);

    let (status, body) = app
        .get(&format!("/api/patients/{patient_id}/credits"))
        .await?;
    assert_status(status, StatusCode::OK, "list credits");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn card_issue_uses_configured_default_price() -> anyhow::Result<()> {
    let app = TestApp::new();
    let patient_id = app.create_patient(100, "Almaz").await?;

    let (status, body) = app
        .post(&format!("/api/patients/{patient_id}/cards"), json!({}))
        .await?;

    assert_status(status, StatusCode::CREATED, "issue card");
    assert_eq!(body["data"]["price"], "100");
    assert_eq!(body["data"]["patient"]["cardNumber"], 100);

    let card_id = id_of(&body["data"])?;
    let (_, patient) = app.get(&format!("/api/patients/{patient_id}")).await?;
    let held = patient["data"]["cards"].as_array().unwrap();
    assert_eq!(held, &vec![json!(card_id)]);
    Ok(())
}
