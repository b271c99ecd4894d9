// agriquota-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::quota::DEFAULT_NEAR_COMPLETION_THRESHOLD;

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_profile")]
    pub profile: String,

    /// Folders holding satellite config files (`monitoring.yml`).
    #[serde(rename = "config-paths", default)]
    pub config_paths: Vec<String>,

    #[serde(rename = "variables-path", default = "default_variables_path")]
    pub variables_path: String,

    #[serde(rename = "quota-paths", default = "default_quota_paths")]
    pub quota_paths: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct MonitoringConfig {
    #[serde(default = "default_threshold")]
    #[validate(range(min = 0.0, max = 100.0, message = "Threshold is a percentage (0-100)"))]
    #[validate(custom(function = "validate_finite"))]
    pub near_completion_threshold: f64,

    #[serde(rename = "report-path", default = "default_report_path")]
    pub report_path: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            near_completion_threshold: DEFAULT_NEAR_COMPLETION_THRESHOLD,
            report_path: default_report_path(),
        }
    }
}

// NaN slips through `range`
fn validate_finite(value: f64) -> Result<(), validator::ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("not_finite"))
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_profile() -> String {
    "dev".to_string()
}
fn default_variables_path() -> String {
    "variables.yaml".to_string()
}
fn default_quota_paths() -> Vec<String> {
    vec!["quotas".to_string()]
}
fn default_threshold() -> f64 {
    DEFAULT_NEAR_COMPLETION_THRESHOLD
}
fn default_report_path() -> String {
    "target/quota_progress.json".to_string()
}
