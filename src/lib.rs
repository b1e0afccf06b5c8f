#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod assets;
pub mod audit;
pub mod config;
pub mod error;
pub mod locales;
pub mod models;
pub mod project;
pub mod records;
pub mod remap;
pub mod report;
pub mod selection;

pub use audit::{AuditAccumulator, AuditOutcome, ContentAuditor};
pub use config::AuditConfig;
pub use error::{AuditError, AuditResult};
pub use project::AuditLayout;
pub use report::AuditReport;
pub use selection::{AllRecords, RecordInclusion, RecordSelection};
