//! The statistics endpoints: service ranking, disease demographics,
//! age distribution and the prosthetics follow-up list.
//!
//! Each one runs the store-side aggregation per collection and merges the
//! partial results in application code.

use crate::{
    db::{
        AgeBand, Collection, DocumentQuery, DocumentStore, Filter, ServiceUsageRow,
        TypedCollection,
    },
    models::{
        requests::{DateRange, ServiceStatsRequest},
        views::{AgeGroupCount, DemographicCell, DiseaseStat, ProstheticsEntry, ServiceRanking},
    },
    services::{day_bounds, parse_date},
    Error, Result,
};
use molar_models::{MedicalFinding, Patient};
use serde_json::json;
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

/// The dashboard shows the top services only.
const RANK_LIMIT: usize = 14;

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn DocumentStore>,
    patients: TypedCollection<Patient>,
    findings: TypedCollection<MedicalFinding>,
}

impl StatsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            patients: TypedCollection::new(Arc::clone(&store), Collection::Patients),
            findings: TypedCollection::new(Arc::clone(&store), Collection::MedicalFindings),
            store,
        }
    }

    /// Clinic-wide service ranking, truncated for the dashboard.
    pub async fn service_ranking(&self) -> Result<ServiceRanking> {
        let merged = self.merged_usage(&Filter::All).await?;
        Ok(ServiceRanking {
            rank_by_usage: ranked(merged.clone(), |row| row.usage_count, Some(RANK_LIMIT)),
            rank_by_revenue: ranked_by_revenue(merged, Some(RANK_LIMIT)),
        })
    }

    /// Ranking filtered by creator and an optional date range, untruncated
    /// (the per-doctor report wants the full list).
    pub async fn service_ranking_filtered(
        &self,
        request: &ServiceStatsRequest,
    ) -> Result<ServiceRanking> {
        let Some(created_by) = request.created_by else {
            return Err(Error::MissingParameter("createdBy is required".to_string()));
        };

        let mut filters = vec![Filter::eq("createdBy.id", json!(created_by))];
        let from = request
            .start_date
            .as_deref()
            .map(|value| parse_date("start", value))
            .transpose()?
            .map(|date| day_bounds(date).0);
        let to = request
            .end_date
            .as_deref()
            .map(|value| parse_date("end", value))
            .transpose()?
            .map(|date| day_bounds(date).1);
        if from.is_some() || to.is_some() {
            filters.push(Filter::InRange {
                path: "createdAt".to_string(),
                from,
                to,
                inclusive_end: false,
            });
        }

        let merged = self.merged_usage(&Filter::And(filters)).await?;
        Ok(ServiceRanking {
            rank_by_usage: ranked(merged.clone(), |row| row.usage_count, None),
            rank_by_revenue: ranked_by_revenue(merged, None),
        })
    }

    /// Disease demographics for a date range, one stat row per disease.
    pub async fn disease_demographics(&self, range: &DateRange) -> Result<Vec<DiseaseStat>> {
        let start = parse_date("start", &range.start_date)?;
        let end = parse_date("end", &range.end_date)?;

        let rows = self
            .store
            .disease_demographics(day_bounds(start).0, day_bounds(end).1)
            .await?;

        let mut stats: Vec<DiseaseStat> = Vec::new();
        for row in rows {
            let cell = DemographicCell {
                sex: row.sex,
                age_group: row.age_band.label().to_string(),
                count: row.count,
            };
            match stats.iter_mut().find(|stat| stat.disease == row.disease) {
                Some(stat) => stat.stats.push(cell),
                None => stats.push(DiseaseStat {
                    disease: row.disease,
                    stats: vec![cell],
                }),
            }
        }

        Ok(stats)
    }

    /// Registered-patient counts per age band.
    pub async fn age_distribution(&self) -> Result<Vec<AgeGroupCount>> {
        let patients = self
            .patients
            .find(&DocumentQuery::filtered(Filter::All))
            .await?;

        let mut counts: HashMap<AgeBand, i64> = HashMap::new();
        for patient in &patients {
            *counts.entry(AgeBand::for_age(patient.age)).or_insert(0) += 1;
        }

        Ok(AgeBand::ALL
            .iter()
            .map(|band| AgeGroupCount {
                age_group: band.label().to_string(),
                count: counts.get(band).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Patients with planned or completed bridge/crown work, with the
    /// findings that put them on the list.
    pub async fn prosthetics(&self) -> Result<Vec<ProstheticsEntry>> {
        let filter = Filter::Or(vec![
            Filter::any_element("treatmentPlan", "bridge", true),
            Filter::any_element("treatmentPlan", "crown", true),
            Filter::any_element("treatmentDone", "bridge", true),
            Filter::any_element("treatmentDone", "crown", true),
        ]);
        let findings = self.findings.find(&DocumentQuery::filtered(filter)).await?;

        let mut by_patient: Vec<(Uuid, Vec<MedicalFinding>)> = Vec::new();
        for finding in findings {
            let patient_id = finding.patient.id;
            match by_patient.iter_mut().find(|(id, _)| *id == patient_id) {
                Some((_, list)) => list.push(finding),
                None => by_patient.push((patient_id, vec![finding])),
            }
        }

        let mut entries = Vec::with_capacity(by_patient.len());
        for (patient_id, findings) in by_patient {
            let Some(patient) = self.patients.get(patient_id).await? else {
                tracing::warn!(
                    patient_id = %patient_id,
                    "Finding references a missing patient, dropped from prosthetics list"
                );
                continue;
            };
            entries.push(ProstheticsEntry {
                id: patient.id,
                card_number: patient.card_number,
                first_name: patient.first_name,
                age: patient.age,
                sex: patient.sex,
                findings,
            });
        }

        Ok(entries)
    }

    /// Run the line-item aggregation over invoices and credits and merge
    /// the two result sets by service.
    async fn merged_usage(&self, filter: &Filter) -> Result<Vec<ServiceUsageRow>> {
        let invoice_rows = self
            .store
            .service_usage(Collection::Invoices, filter)
            .await?;
        let credit_rows = self.store.service_usage(Collection::Credits, filter).await?;

        let mut merged: Vec<ServiceUsageRow> = Vec::with_capacity(invoice_rows.len());
        let mut index: HashMap<Uuid, usize> = HashMap::new();

        for row in invoice_rows.into_iter().chain(credit_rows) {
            match index.get(&row.service_id) {
                Some(&at) => {
                    merged[at].usage_count += row.usage_count;
                    merged[at].revenue += row.revenue;
                }
                None => {
                    index.insert(row.service_id, merged.len());
                    merged.push(row);
                }
            }
        }

        Ok(merged)
    }
}

fn ranked(
    mut rows: Vec<ServiceUsageRow>,
    key: impl Fn(&ServiceUsageRow) -> i64,
    limit: Option<usize>,
) -> Vec<ServiceUsageRow> {
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

fn ranked_by_revenue(
    mut rows: Vec<ServiceUsageRow>,
    limit: Option<usize>,
) -> Vec<ServiceUsageRow> {
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}
