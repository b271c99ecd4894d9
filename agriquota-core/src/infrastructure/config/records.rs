// agriquota-core/src/infrastructure/config/records.rs

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::quota::RespondentRecord;
use crate::infrastructure::error::InfrastructureError;

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsInput {
    Many(Vec<RespondentRecord>),
    One(RespondentRecord),
}

pub fn load_record(path: &Path) -> Result<RespondentRecord, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Accepts either a JSON array of records or a single record object.
pub fn load_records(path: &Path) -> Result<Vec<RespondentRecord>, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    // Parse through Value first so a malformed file reports the real JSON error
    let value: serde_json::Value = serde_json::from_str(&content)?;
    match serde_json::from_value(value)? {
        RecordsInput::Many(records) => Ok(records),
        RecordsInput::One(record) => Ok(vec![record]),
    }
}
