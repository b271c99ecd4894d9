// agriquota-core/src/application/allocation.rs
//
// USE CASE: on interview start, decide which quota the respondent counts against.

use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::quota::{Quota, QuotaEvaluator, RespondentRecord, VariableCatalog};
use crate::error::AgriquotaError;
use crate::ports::QuotaSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AllocationOutcome {
    Assigned {
        quota_id: String,
        quota_name: String,
        /// Remaining count in the snapshot, before this interview is counted.
        remaining_count: u32,
    },
    NoQuotaAvailable {
        /// Quotas the record matches but which are full, paused or auto-stopped.
        matched_without_capacity: Vec<String>,
    },
}

impl AllocationOutcome {
    pub fn quota_id(&self) -> Option<&str> {
        match self {
            Self::Assigned { quota_id, .. } => Some(quota_id),
            Self::NoQuotaAvailable { .. } => None,
        }
    }
}

pub fn decide_allocation(
    catalog: &VariableCatalog,
    quotas: &[Quota],
    record: &RespondentRecord,
) -> AllocationOutcome {
    let compiled = QuotaEvaluator::new(catalog).compile_quotas(quotas);

    match compiled.select(record) {
        Some(quota) => AllocationOutcome::Assigned {
            quota_id: quota.id.clone(),
            quota_name: quota.name.clone(),
            remaining_count: quota.remaining_count(),
        },
        None => AllocationOutcome::NoQuotaAvailable {
            matched_without_capacity: compiled
                .matching(record)
                .into_iter()
                .map(|q| q.id.clone())
                .collect(),
        },
    }
}

#[instrument(skip(source, record), fields(record.len = record.len()))]
pub async fn allocate_respondent(
    source: &dyn QuotaSource,
    questionnaire_id: &str,
    record: &RespondentRecord,
) -> Result<AllocationOutcome, AgriquotaError> {
    let catalog = source.fetch_variables().await?;
    let quotas = source.fetch_quotas(questionnaire_id).await?;

    let outcome = decide_allocation(&catalog, &quotas, record);
    match &outcome {
        AllocationOutcome::Assigned { quota_id, .. } => {
            info!(quota = %quota_id, "Respondent assigned to quota")
        }
        AllocationOutcome::NoQuotaAvailable {
            matched_without_capacity,
        } => info!(
            full = matched_without_capacity.len(),
            "No quota available for respondent"
        ),
    }
    Ok(outcome)
}
