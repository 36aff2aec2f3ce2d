//! Carbon emission estimates and sustainability reports for textile factories.
//!
//! The core pipeline is [`compute_report`]: it normalizes a batch of operational
//! records, prices each emission source, annualizes and classifies the total and
//! attaches recommendations. Persistence, uploads and exports live behind the
//! services in [`commands::AppState`].

pub mod commands;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, AppResult};
pub use models::record::{FieldValue, RawRecord};
pub use models::report::{EmissionReport, ScoreBand};
pub use services::report_assembler::{compute_report, compute_report_with_rng};
