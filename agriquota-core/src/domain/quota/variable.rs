// agriquota-core/src/domain/quota/variable.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use validator::Validate;

use crate::domain::error::DomainError;

/// Date layouts accepted for `date` variables (ISO first, then the local
/// day-first notation used on paper questionnaires).
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VariableDataType {
    #[default]
    Categorical,
    Numeric,
    Date,
}

impl VariableDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categorical => "categorical",
            Self::Numeric => "numeric",
            Self::Date => "date",
        }
    }

    /// Resolves a raw criterion value into its typed form.
    /// Returns `None` when the text cannot be read as this data type.
    pub fn coerce(&self, raw: &str) -> Option<TypedValue> {
        let raw = raw.trim();
        match self {
            Self::Categorical => Some(TypedValue::Text(raw.to_string())),
            Self::Numeric => parse_number(raw).map(TypedValue::Number),
            Self::Date => parse_date(raw).map(TypedValue::Date),
        }
    }
}

impl fmt::Display for VariableDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VariableDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "categorical" => Ok(Self::Categorical),
            "numeric" => Ok(Self::Numeric),
            "date" => Ok(Self::Date),
            _ => Err(format!("Unknown variable data type: {}", s)),
        }
    }
}

/// A criterion or record value after coercion to the variable's data type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl TypedValue {
    /// Orders two values of the same kind. Mixed kinds are incomparable.
    pub fn compare(&self, other: &TypedValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // Timestamps coming from the backend carry a time part we don't need
    let raw = match raw.split_once('T') {
        Some((day, _)) => day,
        None => raw,
    };
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuotaVariable {
    #[validate(length(min = 1, message = "Variable name cannot be empty"))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub data_type: VariableDataType,

    /// Enumerated values, only meaningful for categorical variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_values: Vec<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

impl QuotaVariable {
    pub fn new(name: impl Into<String>, data_type: VariableDataType) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            data_type,
            possible_values: vec![],
            is_active: true,
            sort_order: 0,
        }
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// The set of variables usable in quota criteria, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct VariableCatalog {
    variables: HashMap<String, QuotaVariable>,
}

impl VariableCatalog {
    pub fn from_variables(variables: Vec<QuotaVariable>) -> Result<Self, DomainError> {
        let mut map = HashMap::with_capacity(variables.len());
        for variable in variables {
            if map.contains_key(&variable.name) {
                return Err(DomainError::DuplicateVariable(variable.name));
            }
            map.insert(variable.name.clone(), variable);
        }
        Ok(Self { variables: map })
    }

    pub fn get(&self, name: &str) -> Option<&QuotaVariable> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variables in display order (`sort_order`, then name).
    pub fn ordered(&self) -> Vec<&QuotaVariable> {
        let mut vars: Vec<&QuotaVariable> = self.variables.values().collect();
        vars.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        vars
    }
}
