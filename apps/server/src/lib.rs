//! Molar - dental-clinic management server
//!
//! An HTTP JSON API over a document store, covering:
//! - Patient registration, search and record keeping
//! - Appointments, medical findings, health info and prescriptions
//! - Invoices, credits, cards and expenses
//! - Statistics and payment reporting for the clinic dashboards

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
