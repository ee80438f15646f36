//! The payment report behind the accounting page: invoices filtered by
//! creator and/or date range, plus cards and expenses for clinic-wide
//! reports.

use crate::{
    db::{Collection, DocumentQuery, DocumentStore, Filter, Sort, SortKind, TypedCollection},
    models::{requests::PaymentReportRequest, views::PaymentReport},
    services::{day_bounds, parse_date},
    Error, Result,
};
use chrono::{DateTime, Utc};
use molar_models::{BillingDocument, Card, Expense};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReportService {
    invoices: TypedCollection<BillingDocument>,
    cards: TypedCollection<Card>,
    expenses: TypedCollection<Expense>,
}

impl ReportService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            invoices: TypedCollection::new(Arc::clone(&store), Collection::Invoices),
            cards: TypedCollection::new(Arc::clone(&store), Collection::Cards),
            expenses: TypedCollection::new(store, Collection::Expenses),
        }
    }

    pub async fn payment_report(&self, request: &PaymentReportRequest) -> Result<PaymentReport> {
        let range = self.parse_range(request)?;
        if request.created_by.is_none() && range.is_none() {
            return Err(Error::MissingParameter(
                "either createdBy or both startDate and endDate are required".to_string(),
            ));
        }

        let mut filters = Vec::new();
        if let Some(created_by) = request.created_by {
            filters.push(Filter::eq("createdBy.id", json!(created_by)));
        }
        if let Some((from, to)) = range {
            filters.push(Filter::between("createdAt", from, to));
        }
        if let Some(receipt) = request.receipt {
            filters.push(Filter::eq("currentPayment.receipt", receipt));
        }

        let invoices = self
            .invoices
            .find(&DocumentQuery::sorted(
                Filter::And(filters),
                Sort::descending("createdAt", SortKind::Timestamp),
            ))
            .await?;

        // Cards and expenses only belong on the clinic-wide report; the
        // per-creator view is the cashier reconciling their own invoices.
        let (cards, expenses) = match (request.created_by, range) {
            (None, Some((from, to))) => {
                let in_range =
                    DocumentQuery::filtered(Filter::between("createdAt", from, to));
                (
                    self.cards.find(&in_range).await?,
                    self.expenses.find(&in_range).await?,
                )
            }
            _ => (Vec::new(), Vec::new()),
        };

        Ok(PaymentReport {
            invoices,
            cards,
            expenses,
        })
    }

    fn parse_range(
        &self,
        request: &PaymentReportRequest,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        let (Some(start), Some(end)) = (request.start_date.as_deref(), request.end_date.as_deref())
        else {
            return Ok(None);
        };

        let start = parse_date("start", start)?;
        let end = parse_date("end", end)?;
        if end < start {
            return Err(Error::Validation(
                "end date must be greater than or equal to start date".to_string(),
            ));
        }

        // Whole days: start of the first day to the end of the last
        Ok(Some((day_bounds(start).0, day_bounds(end).1)))
    }
}
