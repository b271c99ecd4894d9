// agriquota-core/src/infrastructure/config/mod.rs

pub mod definitions;
pub mod project;
pub mod records;

pub use crate::domain::project::{MonitoringConfig, ProjectConfig};
pub use definitions::{QuotaFile, VariableFile, load_quota_files, load_variables};
pub use project::load_project_config;
pub use records::{load_record, load_records};
