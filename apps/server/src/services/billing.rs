//! Invoices, credits and card purchases.

use crate::{
    config::ClinicConfig,
    db::{Collection, DocumentQuery, DocumentStore, Filter, TypedCollection},
    models::requests::{IssueCard, NewBillingDocument, PaymentUpdate},
    services::{attach_to_patient, detach_from_patient, load_children},
    Error, Result,
};
use chrono::Utc;
use molar_models::{
    BillingDocument, Card, ChangeRecord, LineItem, PatientRef, Patient, PaymentState, ServiceRef,
    UserRef,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Invoices and credits share every rule; the kind picks the collection
/// and the patient-side array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingKind {
    Invoice,
    Credit,
}

impl BillingKind {
    pub fn collection(self) -> Collection {
        match self {
            BillingKind::Invoice => Collection::Invoices,
            BillingKind::Credit => Collection::Credits,
        }
    }

    fn entity_name(self) -> &'static str {
        match self {
            BillingKind::Invoice => "Invoice",
            BillingKind::Credit => "Credit",
        }
    }
}

#[derive(Clone)]
pub struct BillingService {
    patients: TypedCollection<Patient>,
    invoices: TypedCollection<BillingDocument>,
    credits: TypedCollection<BillingDocument>,
    cards: TypedCollection<Card>,
    clinic: ClinicConfig,
}

impl BillingService {
    pub fn new(store: Arc<dyn DocumentStore>, clinic: ClinicConfig) -> Self {
        Self {
            patients: TypedCollection::new(Arc::clone(&store), Collection::Patients),
            invoices: TypedCollection::new(Arc::clone(&store), Collection::Invoices),
            credits: TypedCollection::new(Arc::clone(&store), Collection::Credits),
            cards: TypedCollection::new(store, Collection::Cards),
            clinic,
        }
    }

    fn documents(&self, kind: BillingKind) -> &TypedCollection<BillingDocument> {
        match kind {
            BillingKind::Invoice => &self.invoices,
            BillingKind::Credit => &self.credits,
        }
    }

    pub async fn create(
        &self,
        kind: BillingKind,
        patient_id: Uuid,
        request: NewBillingDocument,
        actor: Option<UserRef>,
    ) -> Result<BillingDocument> {
        request.validate()?;
        let patient = self.patients.require(patient_id).await?;

        let items: Vec<LineItem> = request
            .items
            .into_iter()
            .map(|item| LineItem {
                service: ServiceRef {
                    id: item.service_id,
                    name: item.service_name,
                },
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        let total: Decimal = items.iter().map(LineItem::line_total).sum();
        let current_payment = request
            .payment
            .map(|p| PaymentState {
                amount: p.amount,
                confirmed: p.confirmed,
                receipt: p.receipt,
            })
            .unwrap_or_default();
        let paid = if current_payment.confirmed {
            current_payment.amount
        } else {
            Decimal::ZERO
        };

        let now = Utc::now();
        let mut document = BillingDocument {
            id: Uuid::new_v4(),
            items,
            total,
            paid,
            balance: total - paid,
            status: molar_models::SettlementStatus::Pending,
            current_payment,
            customer: PatientRef {
                id: patient.id,
                name: Some(patient.first_name.clone()),
                card_number: Some(patient.card_number),
            },
            change_history: Vec::new(),
            created_by: actor,
            created_at: now,
            updated_at: now,
        };
        document.status = document.derived_status();

        self.documents(kind).insert(document.id, &document).await?;
        attach_to_patient(&self.patients, patient_id, kind.collection(), document.id).await?;
        Ok(document)
    }

    pub async fn get(&self, kind: BillingKind, id: Uuid) -> Result<BillingDocument> {
        self.documents(kind).require(id).await
    }

    pub async fn list_for_patient(
        &self,
        kind: BillingKind,
        patient_id: Uuid,
    ) -> Result<Vec<BillingDocument>> {
        let patient = self.patients.require(patient_id).await?;
        let ids = match kind {
            BillingKind::Invoice => &patient.invoices,
            BillingKind::Credit => &patient.credits,
        };
        let mut documents = load_children(self.documents(kind), ids).await?;
        documents.sort_by_key(|doc| std::cmp::Reverse(doc.created_at));
        Ok(documents)
    }

    /// Confirm the pending payment: move the amount into `paid`,
    /// recompute balance and status, and append to the change history.
    pub async fn record_payment(
        &self,
        kind: BillingKind,
        id: Uuid,
        request: PaymentUpdate,
        actor: Option<UserRef>,
    ) -> Result<BillingDocument> {
        if request.amount <= Decimal::ZERO {
            return Err(Error::Validation(
                "payment amount must be positive".to_string(),
            ));
        }

        let mut document = self.documents(kind).require(id).await?;
        let now = Utc::now();

        document.current_payment = PaymentState {
            amount: request.amount,
            confirmed: true,
            receipt: request.receipt,
        };
        document.paid += request.amount;
        document.balance = document.total - document.paid;
        document.status = document.derived_status();
        document.change_history.push(ChangeRecord {
            updated_by: actor,
            updated_at: now,
            changes: Some(json!({
                "payment": request.amount,
                "receipt": request.receipt,
            })),
        });
        document.updated_at = now;

        self.documents(kind).put(id, &document).await?;
        Ok(document)
    }

    /// Invoices whose current payment has not been confirmed by the
    /// cashier yet.
    pub async fn unconfirmed(&self, kind: BillingKind) -> Result<Vec<BillingDocument>> {
        self.documents(kind)
            .find(&DocumentQuery::filtered(Filter::eq(
                "currentPayment.confirmed",
                false,
            )))
            .await
    }

    pub async fn delete(&self, kind: BillingKind, id: Uuid) -> Result<()> {
        if !self.documents(kind).delete(id).await? {
            return Err(Error::not_found(kind.entity_name(), id));
        }
        detach_from_patient(&self.patients, kind.collection(), id).await
    }

    pub async fn issue_card(
        &self,
        patient_id: Uuid,
        request: IssueCard,
        actor: Option<UserRef>,
    ) -> Result<Card> {
        let patient = self.patients.require(patient_id).await?;

        let now = Utc::now();
        let card = Card {
            id: Uuid::new_v4(),
            patient: PatientRef {
                id: patient.id,
                name: Some(patient.first_name.clone()),
                card_number: Some(patient.card_number),
            },
            price: request.price.unwrap_or(self.clinic.card_price),
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        self.cards.insert(card.id, &card).await?;
        attach_to_patient(&self.patients, patient_id, Collection::Cards, card.id).await?;
        Ok(card)
    }

    pub async fn list_cards(&self, patient_id: Uuid) -> Result<Vec<Card>> {
        let patient = self.patients.require(patient_id).await?;
        let mut cards = load_children(&self.cards, &patient.cards).await?;
        cards.sort_by_key(|card| std::cmp::Reverse(card.created_at));
        Ok(cards)
    }
}
