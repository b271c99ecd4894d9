// agriquota/src/commands/check.rs
//
// USE CASE: batch match check, which quotas each record falls into.

use anyhow::Context;
use std::path::PathBuf;

use agriquota_core::application::QuotaMonitor;
use agriquota_core::infrastructure::YamlQuotaStore;
use agriquota_core::infrastructure::config::load_records;
use agriquota_core::ports::QuotaSource;

pub async fn execute(
    project_dir: PathBuf,
    questionnaire: String,
    records_path: PathBuf,
) -> anyhow::Result<()> {
    let store = YamlQuotaStore::open(&project_dir).with_context(|| {
        format!("Failed to load quota project at {}", project_dir.display())
    })?;

    let catalog = store.fetch_variables().await?;
    let quotas = store.fetch_quotas(&questionnaire).await?;
    let records = load_records(&records_path)
        .with_context(|| format!("Failed to read records {}", records_path.display()))?;

    let report = QuotaMonitor::coverage(&catalog, &quotas, &records);

    println!(
        "Checked {} record(s) against {} quota(s) of '{}'",
        records.len(),
        quotas.len(),
        questionnaire
    );
    for row in &report.records {
        let selected = match (&row.selected, row.matched.is_empty()) {
            (Some(id), _) => format!("-> {}", id),
            (None, true) => "-> no match".to_string(),
            (None, false) => "-> no capacity".to_string(),
        };
        let matched = if row.matched.is_empty() {
            "-".to_string()
        } else {
            row.matched.join(", ")
        };
        println!("   #{} [{}] {}", row.index + 1, matched, selected);
    }

    println!("Matches per quota:");
    for (id, count) in &report.per_quota {
        println!("   {}: {}", id, count);
    }
    println!("Unmatched records: {}", report.unmatched);

    Ok(())
}
