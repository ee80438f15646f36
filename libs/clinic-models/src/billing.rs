//! Billing documents: invoices, credits and card purchases.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::refs::{ChangeRecord, PatientRef, UserRef};

/// A service from the clinic's price list, denormalized into line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub service: ServiceRef,
    pub quantity: u32,
    pub price: Decimal,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementStatus {
    Pending,
    Partial,
    Paid,
}

/// The payment currently awaiting cashier confirmation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentState {
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub receipt: bool,
}

/// Invoices and credits share one document shape; they live in separate
/// collections because credits settle over time under a patient's credit
/// arrangement while invoices are due immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDocument {
    pub id: Uuid,
    pub items: Vec<LineItem>,
    pub total: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
    pub status: SettlementStatus,
    #[serde(default)]
    pub current_payment: PaymentState,
    pub customer: PatientRef,
    #[serde(default)]
    pub change_history: Vec<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillingDocument {
    /// Status derived from the amounts; recomputed after every payment.
    pub fn derived_status(&self) -> SettlementStatus {
        if self.balance <= Decimal::ZERO {
            SettlementStatus::Paid
        } else if self.paid > Decimal::ZERO {
            SettlementStatus::Partial
        } else {
            SettlementStatus::Pending
        }
    }
}

/// A clinic card purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub patient: PatientRef,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
