//! Bid preparation core: company registry extraction from spreadsheet
//! workbooks and rule-driven management scoring.

pub mod config;
pub mod error;
pub mod registry;
pub mod scoring;
pub mod telemetry;

pub use config::{AppConfig, AppEnvironment, Settings};
pub use error::AppError;
pub use registry::{CompanyEntry, RegistryCache, RegistryError};
pub use scoring::{ManagementAssessment, ManagementScorer, RuleBook};
