// agriquota-core/src/application/validation.rs
//
// Static checks over variable and quota definitions. The evaluator degrades
// broken definitions to "never matches"; this is where they get reported.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use validator::Validate;

use crate::domain::quota::{
    CriterionOperator, Quota, QuotaCriterion, QuotaVariable, VariableDataType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Warning,
    Error,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    /// `variable 'x'` or `quota 'questionnaire/id'`
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn push(&mut self, severity: IssueSeverity, subject: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity,
            subject: subject.to_string(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == IssueSeverity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(IssueSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(IssueSeverity::Warning)
    }

    fn count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Variable names are referenced from criteria and `--set name=value`, so
/// they must stay plain identifiers.
fn re_identifier() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
}

pub fn validate_definitions(variables: &[QuotaVariable], quotas: &[Quota]) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut seen_vars = HashSet::new();
    for var in variables {
        let subject = format!("variable '{}'", var.name);
        if let Err(e) = var.validate() {
            report.push(IssueSeverity::Error, &subject, e.to_string());
        }
        if !var.name.is_empty() && re_identifier().is_some_and(|re| !re.is_match(&var.name)) {
            report.push(
                IssueSeverity::Warning,
                &subject,
                "name is not a plain identifier (letters, digits, underscore)",
            );
        }
        if !seen_vars.insert(var.name.as_str()) {
            report.push(IssueSeverity::Error, &subject, "declared more than once");
        }
        if var.data_type != VariableDataType::Categorical && !var.possible_values.is_empty() {
            report.push(
                IssueSeverity::Warning,
                &subject,
                format!(
                    "possible_values are ignored for {} variables",
                    var.data_type
                ),
            );
        }
    }

    let mut seen_quotas = HashSet::new();
    for quota in quotas {
        let subject = format!("quota '{}/{}'", quota.questionnaire_id, quota.id);
        if let Err(e) = quota.validate() {
            report.push(IssueSeverity::Error, &subject, e.to_string());
        }
        if !seen_quotas.insert((quota.questionnaire_id.as_str(), quota.id.as_str())) {
            report.push(IssueSeverity::Error, &subject, "quota id is not unique");
        }
        if quota.target_count > 0 && quota.completed_count > quota.target_count {
            report.push(
                IssueSeverity::Warning,
                &subject,
                format!(
                    "completed count {} exceeds target {}",
                    quota.completed_count, quota.target_count
                ),
            );
        }
        for criterion in &quota.criteria.conditions {
            check_criterion(&mut report, &subject, criterion, variables);
        }
    }

    report
}

fn check_criterion(
    report: &mut ValidationReport,
    subject: &str,
    criterion: &QuotaCriterion,
    variables: &[QuotaVariable],
) {
    let name = &criterion.variable_name;
    let op = criterion.operator;

    let Some(var) = variables.iter().find(|v| &v.name == name) else {
        report.push(
            IssueSeverity::Error,
            subject,
            format!("criterion uses unknown variable '{}', it will never match", name),
        );
        return;
    };
    if !var.is_active {
        report.push(
            IssueSeverity::Warning,
            subject,
            format!("criterion uses inactive variable '{}'", name),
        );
    }
    if criterion.values.is_empty() {
        report.push(
            IssueSeverity::Error,
            subject,
            format!("'{}' criterion on '{}' has no values", op, name),
        );
        return;
    }

    match op {
        CriterionOperator::Between => {
            if criterion.values.len() != 2 {
                report.push(
                    IssueSeverity::Error,
                    subject,
                    format!(
                        "'between' on '{}' needs exactly two values, got {}",
                        name,
                        criterion.values.len()
                    ),
                );
            }
            let range_type = match var.data_type {
                VariableDataType::Date => VariableDataType::Date,
                _ => VariableDataType::Numeric,
            };
            check_readable(report, subject, criterion, range_type);
        }
        CriterionOperator::Equals | CriterionOperator::In => {
            if op == CriterionOperator::Equals && criterion.values.len() > 1 {
                report.push(
                    IssueSeverity::Warning,
                    subject,
                    format!("'equals' on '{}' only uses the first value", name),
                );
            }
            check_readable(report, subject, criterion, var.data_type);
            if var.data_type == VariableDataType::Categorical && !var.possible_values.is_empty() {
                for value in &criterion.values {
                    if !var.possible_values.iter().any(|p| p.trim() == value.trim()) {
                        report.push(
                            IssueSeverity::Warning,
                            subject,
                            format!("'{}' is not a declared value of '{}'", value, name),
                        );
                    }
                }
            }
        }
        CriterionOperator::Contains => {}
    }
}

fn check_readable(
    report: &mut ValidationReport,
    subject: &str,
    criterion: &QuotaCriterion,
    data_type: VariableDataType,
) {
    for value in &criterion.values {
        if data_type.coerce(value).is_none() {
            report.push(
                IssueSeverity::Error,
                subject,
                format!(
                    "value '{}' on '{}' is not a valid {}",
                    value, criterion.variable_name, data_type
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quota::QuotaCriteria;

    fn variables() -> Vec<QuotaVariable> {
        let mut legacy = QuotaVariable::new("district_code", VariableDataType::Numeric);
        legacy.is_active = false;
        vec![
            QuotaVariable::new("region", VariableDataType::Categorical)
                .with_values(["Λεμεσός", "Πάφος"]),
            QuotaVariable::new("farm_size", VariableDataType::Numeric),
            legacy,
        ]
    }

    fn quota_with(conditions: Vec<QuotaCriterion>) -> Quota {
        let mut q = Quota::new("q1", "Test quota", 10);
        q.questionnaire_id = "crops_2024".into();
        q.criteria = QuotaCriteria::all(conditions);
        q
    }

    #[test]
    fn test_clean_definitions() {
        let quota = quota_with(vec![
            QuotaCriterion::new("region", CriterionOperator::In, ["Λεμεσός", "Πάφος"]),
            QuotaCriterion::new("farm_size", CriterionOperator::Between, ["10", "50"]),
        ]);
        let report = validate_definitions(&variables(), &[quota]);
        assert!(report.issues.is_empty(), "{:?}", report.issues);
    }

    #[test]
    fn test_zero_target_and_duplicate_id() {
        let mut a = quota_with(vec![]);
        a.target_count = 0;
        let b = quota_with(vec![]);

        let report = validate_definitions(&variables(), &[a, b]);
        assert!(report.has_errors());
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_broken_criteria_are_errors() {
        let quota = quota_with(vec![
            QuotaCriterion::new("altitude", CriterionOperator::Equals, ["100"]),
            QuotaCriterion::new("farm_size", CriterionOperator::Between, ["10"]),
            QuotaCriterion::new("farm_size", CriterionOperator::In, ["small"]),
            QuotaCriterion::new("region", CriterionOperator::Contains, Vec::<String>::new()),
        ]);
        let report = validate_definitions(&variables(), &[quota]);
        assert_eq!(report.error_count(), 4, "{:?}", report.issues);
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let quota = quota_with(vec![
            QuotaCriterion::new("district_code", CriterionOperator::Equals, ["4", "5"]),
            QuotaCriterion::new("region", CriterionOperator::Equals, ["Λάρνακα"]),
        ]);
        let report = validate_definitions(&variables(), &[quota]);
        assert!(!report.has_errors(), "{:?}", report.issues);
        // inactive variable, extra equals value, undeclared categorical value
        assert_eq!(report.warning_count(), 3);
    }

    #[test]
    fn test_variable_name_checks() {
        let vars = vec![
            QuotaVariable::new("farm size", VariableDataType::Numeric),
            QuotaVariable::new("farm_size", VariableDataType::Numeric).with_values(["1"]),
            QuotaVariable::new("farm_size", VariableDataType::Numeric),
        ];
        let report = validate_definitions(&vars, &[]);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 2);
        assert!(report.issues.iter().any(|i| i.subject == "variable 'farm size'"));
    }
}
