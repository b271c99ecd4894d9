// agriquota-core/src/domain/quota/definition.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::criterion::QuotaCriteria;

/// Percentage from which a quota is reported as nearly complete.
pub const DEFAULT_NEAR_COMPLETION_THRESHOLD: f64 = 90.0;

/// A capacity-bounded target for responses matching a criteria set.
///
/// Counters are a read-only snapshot of the backend's state: nothing in this
/// crate increments them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Quota {
    #[validate(length(min = 1, message = "Quota id cannot be empty"))]
    pub id: String,

    /// Filled from the enclosing definition file when omitted.
    #[serde(default)]
    pub questionnaire_id: String,

    #[validate(length(min = 1, message = "Quota name cannot be empty"))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub criteria: QuotaCriteria,

    #[validate(range(min = 1, message = "Target count must be greater than zero"))]
    pub target_count: u32,

    #[serde(default)]
    pub completed_count: u32,
    #[serde(default)]
    pub in_progress_count: u32,
    #[serde(default)]
    pub pending_count: u32,

    #[serde(default = "default_true")]
    pub is_active: bool,

    /// In-flight responses count against capacity.
    #[serde(default)]
    pub auto_stop: bool,

    /// Lower value wins (0 outranks 10).
    #[serde(default)]
    pub priority: i32,
}

fn default_true() -> bool {
    true
}

impl Quota {
    pub fn new(id: impl Into<String>, name: impl Into<String>, target_count: u32) -> Self {
        Self {
            id: id.into(),
            questionnaire_id: String::new(),
            name: name.into(),
            description: None,
            criteria: QuotaCriteria::default(),
            target_count,
            completed_count: 0,
            in_progress_count: 0,
            pending_count: 0,
            is_active: true,
            auto_stop: false,
            priority: 0,
        }
    }

    pub fn remaining_count(&self) -> u32 {
        self.target_count.saturating_sub(self.completed_count)
    }

    /// Completed plus in-progress responses.
    pub fn in_flight_count(&self) -> u32 {
        self.completed_count.saturating_add(self.in_progress_count)
    }

    /// Raw percentage, may exceed 100 when a quota overshot its target.
    pub fn completion_percentage(&self) -> f64 {
        if self.target_count == 0 {
            return 100.0;
        }
        f64::from(self.completed_count) / f64::from(self.target_count) * 100.0
    }

    pub fn display_percentage(&self) -> f64 {
        self.completion_percentage().min(100.0)
    }

    pub fn status(&self, near_completion_threshold: f64) -> QuotaStatus {
        QuotaStatus::from_counts(
            self.completed_count,
            self.target_count,
            near_completion_threshold,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaStatus {
    Active,
    NearCompletion,
    Completed,
}

impl QuotaStatus {
    pub fn from_counts(completed: u32, target: u32, near_completion_threshold: f64) -> Self {
        if completed >= target {
            return Self::Completed;
        }
        let percentage = f64::from(completed) / f64::from(target) * 100.0;
        if percentage >= near_completion_threshold {
            Self::NearCompletion
        } else {
            Self::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::NearCompletion => "near_completion",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for QuotaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quota(target: u32, completed: u32) -> Quota {
        let mut q = Quota::new("q1", "Limassol small farms", target);
        q.completed_count = completed;
        q
    }

    #[test]
    fn test_derived_counts() {
        let q = quota(40, 30);
        assert_eq!(q.remaining_count(), 10);
        assert_eq!(q.completion_percentage(), 75.0);
    }

    #[test]
    fn test_overshoot_is_clamped_for_display() {
        let q = quota(10, 12);
        assert_eq!(q.remaining_count(), 0);
        assert_eq!(q.completion_percentage(), 120.0);
        assert_eq!(q.display_percentage(), 100.0);
    }

    #[test]
    fn test_status_thresholds() {
        let t = DEFAULT_NEAR_COMPLETION_THRESHOLD;
        assert_eq!(quota(10, 10).status(t), QuotaStatus::Completed);
        assert_eq!(quota(10, 9).status(t), QuotaStatus::NearCompletion);
        assert_eq!(quota(10, 8).status(t), QuotaStatus::Active);
        assert_eq!(quota(10, 8).status(80.0), QuotaStatus::NearCompletion);
    }

    #[test]
    fn test_validation_rejects_zero_target() {
        assert!(quota(0, 0).validate().is_err());
        assert!(quota(5, 0).validate().is_ok());
    }

    #[test]
    fn test_yaml_defaults() -> anyhow::Result<()> {
        let yaml = r#"
id: paphos_vines
name: Paphos vineyards
target_count: 25
criteria:
  logic: and
  conditions:
    - variable_name: region
      operator: equals
      values: ["Πάφος"]
"#;
        let q: Quota = serde_yaml::from_str(yaml)?;
        assert!(q.is_active);
        assert!(!q.auto_stop);
        assert_eq!(q.priority, 0);
        assert_eq!(q.completed_count, 0);
        assert_eq!(q.criteria.conditions.len(), 1);
        Ok(())
    }
}
