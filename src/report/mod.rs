//! Report builders turning a finished audit into console text and a JSON artifact.

pub mod artifact;
pub mod console;
pub mod remediation;

pub use artifact::{AuditReport, ReportSummary, write_report};
pub use console::{render_console_report, render_footer};
pub use remediation::recommended_mappings;
