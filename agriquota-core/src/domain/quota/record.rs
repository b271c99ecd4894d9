// agriquota-core/src/domain/quota/record.rs

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

use super::variable::{TypedValue, VariableDataType, parse_date, parse_number};
use crate::domain::error::DomainError;

/// A single attribute of a respondent, as captured by the interviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Arrays and objects (multi-select answers, nested forms). Kept so the
    /// rest of the record still loads; no criterion can compare against it.
    Other(serde_json::Value),
}

impl RecordValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text view used by categorical and `contains` comparisons.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Self::Number(n) => Some(Cow::Owned(format_number(*n))),
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Other(_) => None,
        }
    }

    /// Reads the value as `data_type`. `None` means "not comparable".
    pub fn resolve(&self, data_type: VariableDataType) -> Option<TypedValue> {
        match (data_type, self) {
            (_, Self::Null | Self::Other(_)) => None,
            (VariableDataType::Categorical, v) => {
                v.as_text().map(|t| TypedValue::Text(t.trim().to_string()))
            }
            (VariableDataType::Numeric, Self::Number(n)) if n.is_finite() => {
                Some(TypedValue::Number(*n))
            }
            (VariableDataType::Numeric, Self::Text(s)) => parse_number(s).map(TypedValue::Number),
            (VariableDataType::Date, Self::Text(s)) => parse_date(s).map(TypedValue::Date),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RecordValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RecordValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for RecordValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Attribute values describing an interview subject at matching time.
/// Partially filled records are normal mid-interview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RespondentRecord {
    values: HashMap<String, RecordValue>,
}

impl RespondentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<RecordValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RecordValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value for `name`; an explicit `null` counts as missing.
    pub fn get(&self, name: &str) -> Option<&RecordValue> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values from `other` replace existing ones.
    pub fn merge(&mut self, other: RespondentRecord) {
        self.values.extend(other.values);
    }

    /// Builds a record from `name=value` pairs (CLI `--set` arguments).
    /// Values stay text; the variable's data type decides how they are read.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut record = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (name, raw) = pair.split_once('=').ok_or_else(|| {
                DomainError::InvalidRecord(format!("expected name=value, got '{}'", pair))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::InvalidRecord(format!(
                    "missing variable name in '{}'",
                    pair
                )));
            }
            record.insert(name, RecordValue::Text(raw.to_string()));
        }
        Ok(record)
    }
}

impl FromIterator<(String, RecordValue)> for RespondentRecord {
    fn from_iter<T: IntoIterator<Item = (String, RecordValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
