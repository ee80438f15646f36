//! PostgreSQL document store backend.
//!
//! All collections live in one `documents` table with a JSONB body; the
//! [`Filter`] conditions translate to JSONB operator clauses with bound
//! parameters, and the statistics aggregations run as SQL (the document
//! store's aggregation pipelines).

use crate::{
    db::{
        collections::Collection,
        query::{segments, DocumentQuery, Filter, SortDirection, SortKind},
        store::{AgeBand, DemographicsRow, DocumentStore, ServiceUsageRow},
    },
    Error, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escape LIKE wildcards in user-supplied search text.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Append a filter as a SQL condition over the `body` column.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            qb.push("TRUE");
        }
        Filter::Eq(path, value) => {
            qb.push("body #> ");
            qb.push_bind(segments(path));
            qb.push(" = ");
            qb.push_bind(sqlx::types::Json(value.clone()));
        }
        Filter::Contains(path, needle) => {
            qb.push("body #>> ");
            qb.push_bind(segments(path));
            qb.push(" ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(needle)));
            qb.push(" ESCAPE '\\'");
        }
        Filter::InRange {
            path,
            from,
            to,
            inclusive_end,
        } => {
            qb.push("(");
            let mut first = true;
            if let Some(from) = from {
                qb.push("(body #>> ");
                qb.push_bind(segments(path));
                qb.push(")::timestamptz >= ");
                qb.push_bind(*from);
                first = false;
            }
            if let Some(to) = to {
                if !first {
                    qb.push(" AND ");
                }
                qb.push("(body #>> ");
                qb.push_bind(segments(path));
                qb.push(if *inclusive_end {
                    ")::timestamptz <= "
                } else {
                    ")::timestamptz < "
                });
                qb.push_bind(*to);
                first = false;
            }
            if first {
                qb.push("TRUE");
            }
            qb.push(")");
        }
        Filter::ArrayContains(path, value) => {
            qb.push("COALESCE(body #> ");
            qb.push_bind(segments(path));
            qb.push(", '[]'::jsonb) @> ");
            qb.push_bind(sqlx::types::Json(serde_json::json!([value])));
        }
        Filter::AnyElement { path, field, value } => {
            qb.push("EXISTS (SELECT 1 FROM jsonb_array_elements(COALESCE(body #> ");
            qb.push_bind(segments(path));
            qb.push(", '[]'::jsonb)) AS elems(el) WHERE el #> ");
            qb.push_bind(segments(field));
            qb.push(" = ");
            qb.push_bind(sqlx::types::Json(value.clone()));
            qb.push(")");
        }
        Filter::And(filters) => push_combined(qb, filters, " AND "),
        Filter::Or(filters) => push_combined(qb, filters, " OR "),
    }
}

fn push_combined(qb: &mut QueryBuilder<'_, Postgres>, filters: &[Filter], joiner: &str) {
    if filters.is_empty() {
        qb.push("TRUE");
        return;
    }
    qb.push("(");
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            qb.push(joiner);
        }
        push_filter(qb, filter);
    }
    qb.push(")");
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: Collection, id: Uuid, body: serde_json::Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(sqlx::types::Json(body))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn fetch(&self, collection: Collection, id: Uuid) -> Result<Option<serde_json::Value>> {
        let row = sqlx::query(
            r#"
            SELECT body FROM documents WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|row| row.get::<serde_json::Value, _>("body")))
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        body: serde_json::Value,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(sqlx::types::Json(body))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, collection: Collection, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM documents WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(
        &self,
        collection: Collection,
        query: &DocumentQuery,
    ) -> Result<Vec<serde_json::Value>> {
        let mut qb = QueryBuilder::new("SELECT body FROM documents WHERE collection = ");
        qb.push_bind(collection.as_str());
        qb.push(" AND ");
        push_filter(&mut qb, &query.filter);

        if let Some(sort) = &query.sort {
            qb.push(" ORDER BY ");
            match sort.kind {
                SortKind::Text => {
                    qb.push("body #>> ");
                    qb.push_bind(segments(&sort.path));
                }
                SortKind::Number => {
                    qb.push("(body #>> ");
                    qb.push_bind(segments(&sort.path));
                    qb.push(")::numeric");
                }
                SortKind::Timestamp => {
                    qb.push("(body #>> ");
                    qb.push_bind(segments(&sort.path));
                    qb.push(")::timestamptz");
                }
            }
            qb.push(match sort.direction {
                SortDirection::Ascending => " ASC NULLS LAST",
                SortDirection::Descending => " DESC NULLS LAST",
            });
        }

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
        }

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| row.get::<serde_json::Value, _>("body"))
            .collect())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM documents WHERE collection = ");
        qb.push_bind(collection.as_str());
        qb.push(" AND ");
        push_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(count)
    }

    async fn max_number(&self, collection: Collection, field: &str) -> Result<Option<i64>> {
        let max: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT MAX((body #>> $2)::bigint)
            FROM documents
            WHERE collection = $1 AND (body #>> $2) ~ '^[0-9]+$'
            "#,
        )
        .bind(collection.as_str())
        .bind(segments(field))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(max)
    }

    async fn service_usage(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<ServiceUsageRow>> {
        // Unwind embedded line items, group by service, sum quantity and
        // quantity * price.
        let mut qb = QueryBuilder::new(
            r#"
            SELECT (item #>> '{service,id}')::uuid AS service_id,
                   MIN(item #>> '{service,name}') AS service_name,
                   SUM((item #>> '{quantity}')::bigint)::bigint AS usage_count,
                   SUM((item #>> '{quantity}')::numeric * (item #>> '{price}')::numeric) AS revenue
            FROM documents,
                 jsonb_array_elements(COALESCE(body -> 'items', '[]'::jsonb)) AS items(item)
            WHERE collection = "#,
        );
        qb.push_bind(collection.as_str());
        qb.push(" AND ");
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY (item #>> '{service,id}')::uuid");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let mut usage = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(service_id) = row.get::<Option<Uuid>, _>("service_id") else {
                continue;
            };
            usage.push(ServiceUsageRow {
                service_id,
                service_name: row
                    .get::<Option<String>, _>("service_name")
                    .unwrap_or_default(),
                usage_count: row.get::<Option<i64>, _>("usage_count").unwrap_or(0),
                revenue: row
                    .get::<Option<Decimal>, _>("revenue")
                    .unwrap_or(Decimal::ZERO),
            });
        }

        Ok(usage)
    }

    async fn disease_demographics(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DemographicsRow>> {
        // Findings joined to their patient and the disease catalog; each
        // disease link recorded within the range contributes one count to
        // its (disease, sex, age band) group.
        let rows = sqlx::query(
            r#"
            SELECT d.body #>> '{name}' AS disease,
                   p.body #>> '{sex}' AS sex,
                   CASE
                       WHEN (p.body #>> '{age}')::int <= 1 THEN '<1'
                       WHEN (p.body #>> '{age}')::int <= 4 THEN '1-4'
                       WHEN (p.body #>> '{age}')::int <= 29 THEN '15-29'
                       ELSE '30-64'
                   END AS age_band,
                   COUNT(*) AS count
            FROM documents f
            CROSS JOIN LATERAL jsonb_array_elements(
                COALESCE(f.body -> 'diseases', '[]'::jsonb)
            ) AS links(link)
            JOIN documents p
              ON p.collection = $4
             AND p.id = (f.body #>> '{patient,id}')::uuid
            JOIN documents d
              ON d.collection = $5
             AND d.id = (link #>> '{disease}')::uuid
            WHERE f.collection = $3
              AND (link #>> '{recordedAt}')::timestamptz >= $1
              AND (link #>> '{recordedAt}')::timestamptz < $2
            GROUP BY 1, 2, 3
            ORDER BY 1, 2, 3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(Collection::MedicalFindings.as_str())
        .bind(Collection::Patients.as_str())
        .bind(Collection::Diseases.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut demographics = Vec::with_capacity(rows.len());
        for row in rows {
            let band = row.get::<String, _>("age_band");
            let Some(age_band) = AgeBand::from_label(&band) else {
                continue;
            };
            demographics.push(DemographicsRow {
                disease: row.get("disease"),
                sex: row.get("sex"),
                age_band,
                count: row.get("count"),
            });
        }

        Ok(demographics)
    }
}
