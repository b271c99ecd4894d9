// agriquota/src/commands/select.rs
//
// USE CASE: pick the quota a respondent counts against at interview start.

use anyhow::Context;
use std::path::PathBuf;

use agriquota_core::application::{AllocationOutcome, allocate_respondent};
use agriquota_core::domain::quota::RespondentRecord;
use agriquota_core::infrastructure::YamlQuotaStore;
use agriquota_core::infrastructure::config::load_record;

pub async fn execute(
    project_dir: PathBuf,
    questionnaire: String,
    record_path: Option<PathBuf>,
    values: Vec<String>,
) -> anyhow::Result<()> {
    let store = YamlQuotaStore::open(&project_dir).with_context(|| {
        format!("Failed to load quota project at {}", project_dir.display())
    })?;

    let mut record = match &record_path {
        Some(path) => load_record(path)
            .with_context(|| format!("Failed to read record {}", path.display()))?,
        None => RespondentRecord::new(),
    };
    record.merge(RespondentRecord::from_pairs(&values)?);

    let outcome = allocate_respondent(&store, &questionnaire, &record).await?;

    match outcome {
        AllocationOutcome::Assigned {
            quota_id,
            quota_name,
            remaining_count,
        } => {
            println!("Selected quota: {} ({})", quota_id, quota_name);
            println!("   Remaining before this interview: {}", remaining_count);
        }
        AllocationOutcome::NoQuotaAvailable {
            matched_without_capacity,
        } => {
            println!("No quota available");
            if !matched_without_capacity.is_empty() {
                println!(
                    "   Matching quotas without capacity: {}",
                    matched_without_capacity.join(", ")
                );
            }
        }
    }

    Ok(())
}
