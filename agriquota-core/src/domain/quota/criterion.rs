// agriquota-core/src/domain/quota/criterion.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::record::RespondentRecord;
use super::variable::{TypedValue, VariableCatalog, VariableDataType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionOperator {
    Equals,
    In,
    Between,
    Contains,
}

impl CriterionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::In => "in",
            Self::Between => "between",
            Self::Contains => "contains",
        }
    }
}

impl fmt::Display for CriterionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogicMode {
    #[default]
    #[serde(alias = "AND")]
    And,
    #[serde(alias = "OR")]
    Or,
}

/// A single predicate over one variable. Values are stored as text whatever
/// the variable's data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaCriterion {
    pub variable_name: String,
    pub operator: CriterionOperator,
    #[serde(default)]
    pub values: Vec<String>,
}

impl QuotaCriterion {
    pub fn new<I, S>(variable_name: impl Into<String>, operator: CriterionOperator, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variable_name: variable_name.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Flat list of criteria joined by one logic mode. No nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuotaCriteria {
    #[serde(default)]
    pub logic: LogicMode,
    #[serde(default)]
    pub conditions: Vec<QuotaCriterion>,
}

impl QuotaCriteria {
    pub fn all(conditions: Vec<QuotaCriterion>) -> Self {
        Self {
            logic: LogicMode::And,
            conditions,
        }
    }

    pub fn any(conditions: Vec<QuotaCriterion>) -> Self {
        Self {
            logic: LogicMode::Or,
            conditions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

// --- COMPILED FORM ---

#[derive(Debug, Clone)]
enum Predicate {
    Equals(TypedValue),
    In(Vec<TypedValue>),
    Between { low: TypedValue, high: TypedValue },
    /// Lowercased needles; the criterion holds when any one is found.
    Contains(Vec<String>),
    /// Definition that can never hold (unknown variable, unreadable values).
    Never,
}

#[derive(Debug, Clone)]
struct CompiledCriterion {
    variable_name: String,
    resolve_as: VariableDataType,
    predicate: Predicate,
}

impl CompiledCriterion {
    fn compile(criterion: &QuotaCriterion, catalog: &VariableCatalog) -> Self {
        let never = |resolve_as| Self {
            variable_name: criterion.variable_name.clone(),
            resolve_as,
            predicate: Predicate::Never,
        };

        let Some(variable) = catalog.get(&criterion.variable_name) else {
            debug!(
                variable = %criterion.variable_name,
                "Criterion references an unknown variable, it will never match"
            );
            return never(VariableDataType::Categorical);
        };
        let data_type = variable.data_type;

        let (resolve_as, predicate) = match criterion.operator {
            CriterionOperator::Equals => (
                data_type,
                criterion
                    .values
                    .first()
                    .and_then(|v| data_type.coerce(v))
                    .map(Predicate::Equals),
            ),
            CriterionOperator::In => {
                let set: Vec<TypedValue> = criterion
                    .values
                    .iter()
                    .filter_map(|v| data_type.coerce(v))
                    .collect();
                (data_type, (!set.is_empty()).then_some(Predicate::In(set)))
            }
            CriterionOperator::Between => {
                // Ranges only make sense on ordered types
                let range_type = match data_type {
                    VariableDataType::Date => VariableDataType::Date,
                    _ => VariableDataType::Numeric,
                };
                (range_type, compile_range(&criterion.values, range_type))
            }
            CriterionOperator::Contains => {
                let needles: Vec<String> = criterion
                    .values
                    .iter()
                    .map(|v| v.trim().to_lowercase())
                    .filter(|v| !v.is_empty())
                    .collect();
                (
                    data_type,
                    (!needles.is_empty()).then_some(Predicate::Contains(needles)),
                )
            }
        };

        match predicate {
            Some(predicate) => Self {
                variable_name: criterion.variable_name.clone(),
                resolve_as,
                predicate,
            },
            None => {
                debug!(
                    variable = %criterion.variable_name,
                    operator = %criterion.operator,
                    values = ?criterion.values,
                    "Criterion values unreadable for data type '{}', it will never match",
                    data_type
                );
                never(resolve_as)
            }
        }
    }

    fn holds(&self, record: &RespondentRecord) -> bool {
        let Some(value) = record.get(&self.variable_name) else {
            return false;
        };

        match &self.predicate {
            Predicate::Never => false,
            Predicate::Contains(needles) => value.as_text().is_some_and(|text| {
                let haystack = text.to_lowercase();
                needles.iter().any(|n| haystack.contains(n.as_str()))
            }),
            Predicate::Equals(expected) => value
                .resolve(self.resolve_as)
                .is_some_and(|actual| actual == *expected),
            Predicate::In(set) => value
                .resolve(self.resolve_as)
                .is_some_and(|actual| set.contains(&actual)),
            Predicate::Between { low, high } => {
                value.resolve(self.resolve_as).is_some_and(|actual| {
                    actual.compare(low).is_some_and(|o| o.is_ge())
                        && actual.compare(high).is_some_and(|o| o.is_le())
                })
            }
        }
    }
}

/// Both bounds must parse; they are sorted so `[100, 10]` means `[10, 100]`.
fn compile_range(values: &[String], range_type: VariableDataType) -> Option<Predicate> {
    let [a, b] = values else {
        return None;
    };
    let a = range_type.coerce(a)?;
    let b = range_type.coerce(b)?;
    let (low, high) = if a.compare(&b)?.is_le() { (a, b) } else { (b, a) };
    Some(Predicate::Between { low, high })
}

/// Criteria resolved against a variable catalog once, then evaluated
/// against any number of records.
#[derive(Debug, Clone)]
pub struct CompiledCriteria {
    logic: LogicMode,
    criteria: Vec<CompiledCriterion>,
}

impl CompiledCriteria {
    pub fn compile(criteria: &QuotaCriteria, catalog: &VariableCatalog) -> Self {
        Self {
            logic: criteria.logic,
            criteria: criteria
                .conditions
                .iter()
                .map(|c| CompiledCriterion::compile(c, catalog))
                .collect(),
        }
    }

    /// An empty criteria list applies to the whole population.
    pub fn matches(&self, record: &RespondentRecord) -> bool {
        if self.criteria.is_empty() {
            return true;
        }
        match self.logic {
            LogicMode::And => self.criteria.iter().all(|c| c.holds(record)),
            LogicMode::Or => self.criteria.iter().any(|c| c.holds(record)),
        }
    }

    /// Number of criteria that can never hold.
    pub fn broken_count(&self) -> usize {
        self.criteria
            .iter()
            .filter(|c| matches!(c.predicate, Predicate::Never))
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quota::variable::QuotaVariable;

    fn catalog() -> VariableCatalog {
        VariableCatalog::from_variables(vec![
            QuotaVariable::new("region", VariableDataType::Categorical)
                .with_values(["Λεμεσός", "Πάφος", "Λευκωσία"]),
            QuotaVariable::new("farm_size", VariableDataType::Numeric),
            QuotaVariable::new("registered_on", VariableDataType::Date),
            QuotaVariable::new("main_crop", VariableDataType::Categorical),
        ])
        .unwrap()
    }

    fn eval(criteria: QuotaCriteria, record: &RespondentRecord) -> bool {
        CompiledCriteria::compile(&criteria, &catalog()).matches(record)
    }

    #[test]
    fn test_equals_is_type_aware() {
        let record = RespondentRecord::new().with("farm_size", "45.0");
        let numeric = QuotaCriterion::new("farm_size", CriterionOperator::Equals, ["45"]);
        assert!(eval(QuotaCriteria::all(vec![numeric]), &record));

        let record = RespondentRecord::new().with("region", "Πάφος");
        let wrong = QuotaCriterion::new("region", CriterionOperator::Equals, ["Λεμεσός"]);
        assert!(!eval(QuotaCriteria::all(vec![wrong]), &record));
    }

    #[test]
    fn test_in_membership() {
        let crit = QuotaCriterion::new("region", CriterionOperator::In, ["Λεμεσός", "Πάφος"]);
        let inside = RespondentRecord::new().with("region", "Πάφος");
        let outside = RespondentRecord::new().with("region", "Λευκωσία");
        assert!(eval(QuotaCriteria::all(vec![crit.clone()]), &inside));
        assert!(!eval(QuotaCriteria::all(vec![crit]), &outside));
    }

    #[test]
    fn test_between_sorts_bounds() {
        let crit = QuotaCriterion::new("farm_size", CriterionOperator::Between, ["100", "10"]);
        let criteria = QuotaCriteria::all(vec![crit]);
        for (size, expected) in [(10, true), (55, true), (100, true), (9, false), (101, false)] {
            let record = RespondentRecord::new().with("farm_size", size as i64);
            assert_eq!(eval(criteria.clone(), &record), expected, "size {}", size);
        }
    }

    #[test]
    fn test_between_on_dates() {
        let crit = QuotaCriterion::new(
            "registered_on",
            CriterionOperator::Between,
            ["2020-01-01", "31/12/2022"],
        );
        let criteria = QuotaCriteria::all(vec![crit]);
        let inside = RespondentRecord::new().with("registered_on", "2021-06-30");
        let outside = RespondentRecord::new().with("registered_on", "2023-01-01");
        assert!(eval(criteria.clone(), &inside));
        assert!(!eval(criteria, &outside));
    }

    #[test]
    fn test_between_needs_two_readable_bounds() {
        let record = RespondentRecord::new().with("farm_size", 20_i64);
        let one = QuotaCriterion::new("farm_size", CriterionOperator::Between, ["10"]);
        let bad = QuotaCriterion::new("farm_size", CriterionOperator::Between, ["10", "big"]);
        assert!(!eval(QuotaCriteria::all(vec![one]), &record));
        assert!(!eval(QuotaCriteria::all(vec![bad]), &record));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let crit = QuotaCriterion::new("main_crop", CriterionOperator::Contains, ["OLIVE"]);
        let record = RespondentRecord::new().with("main_crop", "Table olives (Kalamata)");
        assert!(eval(QuotaCriteria::all(vec![crit]), &record));

        let greek = QuotaCriterion::new("region", CriterionOperator::Contains, ["λεμε"]);
        let record = RespondentRecord::new().with("region", "ΛΕΜΕΣΟΣ");
        assert!(eval(QuotaCriteria::all(vec![greek]), &record));
    }

    #[test]
    fn test_missing_and_unknown_are_false() {
        let record = RespondentRecord::new().with("region", "Πάφος");
        let missing = QuotaCriterion::new("farm_size", CriterionOperator::Equals, ["10"]);
        let unknown = QuotaCriterion::new("altitude", CriterionOperator::Equals, ["10"]);
        assert!(!eval(QuotaCriteria::all(vec![missing]), &record));
        assert!(!eval(QuotaCriteria::any(vec![unknown.clone()]), &record));

        let compiled = CompiledCriteria::compile(&QuotaCriteria::all(vec![unknown]), &catalog());
        assert_eq!(compiled.broken_count(), 1);
    }

    #[test]
    fn test_and_or_combination() {
        let record = RespondentRecord::new()
            .with("region", "Πάφος")
            .with("farm_size", 5_i64);
        let region = QuotaCriterion::new("region", CriterionOperator::Equals, ["Πάφος"]);
        let size = QuotaCriterion::new("farm_size", CriterionOperator::Between, ["10", "50"]);

        assert!(!eval(QuotaCriteria::all(vec![region.clone(), size.clone()]), &record));
        assert!(eval(QuotaCriteria::any(vec![region, size]), &record));
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        assert!(eval(QuotaCriteria::all(vec![]), &RespondentRecord::new()));
        assert!(eval(QuotaCriteria::any(vec![]), &RespondentRecord::new()));
    }

    #[test]
    fn test_logic_accepts_uppercase() -> anyhow::Result<()> {
        let criteria: QuotaCriteria = serde_yaml::from_str("logic: OR\nconditions: []")?;
        assert_eq!(criteria.logic, LogicMode::Or);
        Ok(())
    }
}
