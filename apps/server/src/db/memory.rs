//! In-memory document store backend.
//!
//! Backs the integration test suite (and local experimentation) with the
//! same semantics as the PostgreSQL backend, evaluated over plain JSON.

use crate::{
    db::{
        collections::Collection,
        query::{lookup, parse_instant, DocumentQuery, Filter, SortDirection, SortKind},
        store::{AgeBand, DemographicsRow, DocumentStore, ServiceUsageRow},
    },
    Error, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    str::FromStr,
    sync::RwLock,
};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, BTreeMap<Uuid, JsonValue>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn decimal_of(value: &JsonValue) -> Option<Decimal> {
    match value {
        JsonValue::String(s) => Decimal::from_str(s).ok(),
        JsonValue::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn integer_of(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().filter(|n| *n >= 0),
        JsonValue::String(s) if s.chars().all(|c| c.is_ascii_digit()) && !s.is_empty() => {
            s.parse().ok()
        }
        _ => None,
    }
}

fn compare_docs(a: &JsonValue, b: &JsonValue, path: &str, kind: SortKind) -> Ordering {
    match kind {
        SortKind::Text => {
            let ka = lookup(a, path).and_then(JsonValue::as_str);
            let kb = lookup(b, path).and_then(JsonValue::as_str);
            compare_keys(ka, kb)
        }
        SortKind::Number => {
            let ka = lookup(a, path).and_then(decimal_of);
            let kb = lookup(b, path).and_then(decimal_of);
            compare_keys(ka, kb)
        }
        SortKind::Timestamp => {
            let ka = lookup(a, path).and_then(parse_instant);
            let kb = lookup(b, path).and_then(parse_instant);
            compare_keys(ka, kb)
        }
    }
}

/// Missing keys sort last in either direction, matching NULLS LAST.
fn compare_keys<K: Ord>(a: Option<K>, b: Option<K>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: Collection, id: Uuid, body: JsonValue) -> Result<()> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        let documents = collections.entry(collection).or_default();
        if documents.contains_key(&id) {
            return Err(Error::Internal(format!(
                "duplicate document {collection}/{id}"
            )));
        }
        documents.insert(id, body);
        Ok(())
    }

    async fn fetch(&self, collection: Collection, id: Uuid) -> Result<Option<JsonValue>> {
        let collections = self.collections.read().expect("store lock poisoned");
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.get(&id))
            .cloned())
    }

    async fn replace(&self, collection: Collection, id: Uuid, body: JsonValue) -> Result<bool> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        match documents.get_mut(&id) {
            Some(slot) => {
                *slot = body;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, collection: Collection, id: Uuid) -> Result<bool> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        Ok(collections
            .get_mut(&collection)
            .map(|documents| documents.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn find(&self, collection: Collection, query: &DocumentQuery) -> Result<Vec<JsonValue>> {
        let collections = self.collections.read().expect("store lock poisoned");
        let mut matches: Vec<JsonValue> = collections
            .get(&collection)
            .map(|documents| {
                documents
                    .values()
                    .filter(|doc| query.filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &query.sort {
            matches.sort_by(|a, b| {
                let ordering = compare_docs(a, b, &sort.path, sort.kind);
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => match ordering {
                        // Keep missing keys last even when descending
                        Ordering::Equal => Ordering::Equal,
                        other
                            if lookup(a, &sort.path).is_none()
                                || lookup(b, &sort.path).is_none() =>
                        {
                            other
                        }
                        other => other.reverse(),
                    },
                }
            });
        }

        if let Some(limit) = query.limit {
            matches.truncate(limit.max(0) as usize);
        }

        Ok(matches)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<i64> {
        let collections = self.collections.read().expect("store lock poisoned");
        Ok(collections
            .get(&collection)
            .map(|documents| documents.values().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0) as i64)
    }

    async fn max_number(&self, collection: Collection, field: &str) -> Result<Option<i64>> {
        let collections = self.collections.read().expect("store lock poisoned");
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .values()
                    .filter_map(|doc| lookup(doc, field).and_then(integer_of))
                    .max()
            })
            .unwrap_or(None))
    }

    async fn service_usage(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<ServiceUsageRow>> {
        let collections = self.collections.read().expect("store lock poisoned");
        let mut rows: Vec<ServiceUsageRow> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();

        let Some(documents) = collections.get(&collection) else {
            return Ok(rows);
        };

        for doc in documents.values().filter(|doc| filter.matches(doc)) {
            let Some(items) = doc.get("items").and_then(JsonValue::as_array) else {
                continue;
            };
            for item in items {
                let Some(service_id) = lookup(item, "service.id")
                    .and_then(JsonValue::as_str)
                    .and_then(|s| Uuid::parse_str(s).ok())
                else {
                    continue;
                };
                let quantity = item.get("quantity").and_then(JsonValue::as_i64).unwrap_or(0);
                let price = item.get("price").and_then(decimal_of).unwrap_or(Decimal::ZERO);
                let line_revenue = price * Decimal::from(quantity);

                match index.get(&service_id) {
                    Some(&at) => {
                        rows[at].usage_count += quantity;
                        rows[at].revenue += line_revenue;
                    }
                    None => {
                        index.insert(service_id, rows.len());
                        rows.push(ServiceUsageRow {
                            service_id,
                            service_name: lookup(item, "service.name")
                                .and_then(JsonValue::as_str)
                                .unwrap_or_default()
                                .to_string(),
                            usage_count: quantity,
                            revenue: line_revenue,
                        });
                    }
                }
            }
        }

        Ok(rows)
    }

    async fn disease_demographics(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DemographicsRow>> {
        let collections = self.collections.read().expect("store lock poisoned");
        let findings = collections.get(&Collection::MedicalFindings);
        let patients = collections.get(&Collection::Patients);
        let diseases = collections.get(&Collection::Diseases);

        let mut groups: BTreeMap<(String, String, AgeBand), i64> = BTreeMap::new();

        for finding in findings.map(|c| c.values()).into_iter().flatten() {
            let Some(links) = finding.get("diseases").and_then(JsonValue::as_array) else {
                continue;
            };
            let Some(patient) = lookup(finding, "patient.id")
                .and_then(JsonValue::as_str)
                .and_then(|s| Uuid::parse_str(s).ok())
                .and_then(|id| patients.and_then(|c| c.get(&id)))
            else {
                continue;
            };
            let Some(sex) = patient.get("sex").and_then(JsonValue::as_str) else {
                continue;
            };
            let Some(age) = patient.get("age").and_then(JsonValue::as_u64) else {
                continue;
            };
            let band = AgeBand::for_age(age as u32);

            for link in links {
                let recorded = link.get("recordedAt").and_then(parse_instant);
                let in_range = recorded.map(|at| at >= from && at < to).unwrap_or(false);
                if !in_range {
                    continue;
                }
                let Some(disease) = link
                    .get("disease")
                    .and_then(JsonValue::as_str)
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .and_then(|id| diseases.and_then(|c| c.get(&id)))
                    .and_then(|doc| doc.get("name"))
                    .and_then(JsonValue::as_str)
                else {
                    continue;
                };

                *groups
                    .entry((disease.to_string(), sex.to_string(), band))
                    .or_insert(0) += 1;
            }
        }

        Ok(groups
            .into_iter()
            .map(|((disease, sex, age_band), count)| DemographicsRow {
                disease,
                sex,
                age_band,
                count,
            })
            .collect())
    }
}
