// agriquota-core/src/application/mod.rs

pub mod allocation;
pub mod monitoring;
pub mod validation;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use agriquota_core::application::{allocate_respondent, QuotaMonitor};`
// without knowing the internal file layout.

pub use allocation::{AllocationOutcome, allocate_respondent, decide_allocation};
pub use monitoring::{
    CoverageReport, MonitoringReport, ProgressTotals, QuestionnaireProgress, QuotaMonitor,
    QuotaProgress, RecordMatches,
};
pub use validation::{IssueSeverity, ValidationIssue, ValidationReport, validate_definitions};
