//! Shared application state handed to every handler.

use crate::{
    config::Config,
    db::{DocumentStore, PgDocumentStore},
    services::{
        appointments::AppointmentService, billing::BillingService, catalog::CatalogService,
        findings::FindingService, patients::PatientService, records::RecordsService,
        reports::ReportService, stats::StatsService,
    },
};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub patients: PatientService,
    pub appointments: AppointmentService,
    pub findings: FindingService,
    pub records: RecordsService,
    pub catalog: CatalogService,
    pub billing: BillingService,
    pub stats: StatsService,
    pub reports: ReportService,
}

impl AppState {
    /// Connect to PostgreSQL, run migrations and assemble the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(config.database.pool_min_size)
            .max_connections(config.database.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.database.pool_timeout_seconds))
            .connect(&config.database.url)
            .await
            .context("Failed to connect to the database")?;

        if config.database.run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
        }

        let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool));
        Ok(Self::with_store(config, store))
    }

    /// Assemble services over an already-built store backend. Tests use
    /// this with the in-memory backend.
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let config = Arc::new(config);
        Self {
            patients: PatientService::new(Arc::clone(&store), config.clinic.clone()),
            appointments: AppointmentService::new(Arc::clone(&store)),
            findings: FindingService::new(Arc::clone(&store)),
            records: RecordsService::new(Arc::clone(&store), config.clinic.clone()),
            catalog: CatalogService::new(Arc::clone(&store)),
            billing: BillingService::new(Arc::clone(&store), config.clinic.clone()),
            stats: StatsService::new(Arc::clone(&store)),
            reports: ReportService::new(Arc::clone(&store)),
            config,
            store,
        }
    }
}
