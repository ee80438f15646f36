//! Core trait for clinic document storage backends.

use crate::{
    db::{collections::Collection, query::DocumentQuery, query::Filter},
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Age bands used by the clinic's demographics report.
///
/// The band edges are the reporting form's: everything from 5 to 29 falls
/// into "15-29" and everything above 64 into "30-64".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeBand {
    #[serde(rename = "<1")]
    UnderOne,
    #[serde(rename = "1-4")]
    OneToFour,
    #[serde(rename = "15-29")]
    FifteenToTwentyNine,
    #[serde(rename = "30-64")]
    ThirtyToSixtyFour,
}

impl AgeBand {
    pub const ALL: [AgeBand; 4] = [
        AgeBand::UnderOne,
        AgeBand::OneToFour,
        AgeBand::FifteenToTwentyNine,
        AgeBand::ThirtyToSixtyFour,
    ];

    pub fn for_age(age: u32) -> Self {
        if age <= 1 {
            AgeBand::UnderOne
        } else if age <= 4 {
            AgeBand::OneToFour
        } else if age <= 29 {
            AgeBand::FifteenToTwentyNine
        } else {
            AgeBand::ThirtyToSixtyFour
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::UnderOne => "<1",
            AgeBand::OneToFour => "1-4",
            AgeBand::FifteenToTwentyNine => "15-29",
            AgeBand::ThirtyToSixtyFour => "30-64",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|band| band.label() == label)
    }
}

/// One group row of the service-usage aggregation: unwind billing line
/// items, group by service, sum quantities and quantity * price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUsageRow {
    pub service_id: Uuid,
    pub service_name: String,
    pub usage_count: i64,
    pub revenue: Decimal,
}

/// One group row of the disease-demographics aggregation: findings joined
/// to their patient and the disease catalog, grouped by disease, sex and
/// age band.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsRow {
    pub disease: String,
    pub sex: String,
    pub age_band: AgeBand,
    pub count: i64,
}

/// Storage operations every backend implements.
///
/// Documents are opaque JSON bodies addressed by collection and ID. The two
/// aggregation methods are the store-side halves of the statistics
/// endpoints; everything else is plain CRUD plus filtered queries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. The body must already carry its `id`.
    async fn insert(&self, collection: Collection, id: Uuid, body: JsonValue) -> Result<()>;

    /// Read one document by ID.
    async fn fetch(&self, collection: Collection, id: Uuid) -> Result<Option<JsonValue>>;

    /// Replace a document's body. Returns false when the ID is unknown.
    async fn replace(&self, collection: Collection, id: Uuid, body: JsonValue) -> Result<bool>;

    /// Delete a document. Returns false when the ID is unknown.
    async fn remove(&self, collection: Collection, id: Uuid) -> Result<bool>;

    /// Find documents matching a query, honoring sort and limit.
    async fn find(&self, collection: Collection, query: &DocumentQuery) -> Result<Vec<JsonValue>>;

    /// Count documents matching a filter.
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<i64>;

    /// The maximum integer value of a field across a collection, for
    /// previous-maximum number allocation. Non-numeric values are ignored.
    async fn max_number(&self, collection: Collection, field: &str) -> Result<Option<i64>>;

    /// Service usage/revenue aggregation over a billing collection's
    /// embedded line items, restricted by a document-level filter.
    async fn service_usage(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<ServiceUsageRow>>;

    /// Disease demographics over medical findings whose disease links were
    /// recorded within `[from, to)`.
    async fn disease_demographics(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DemographicsRow>>;
}
