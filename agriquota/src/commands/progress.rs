// agriquota/src/commands/progress.rs
//
// USE CASE: quota progress report (dashboard view), as a table or JSON.

use anyhow::Context;
use comfy_table::{Table, presets::UTF8_FULL};
use std::path::PathBuf;
use tracing::info;

use agriquota_core::application::{MonitoringReport, QuotaMonitor};
use agriquota_core::infrastructure::YamlQuotaStore;
use agriquota_core::infrastructure::fs::atomic_write;

use crate::cli::OutputFormat;

pub async fn execute(
    project_dir: PathBuf,
    questionnaire: Option<String>,
    format: OutputFormat,
    save: bool,
) -> anyhow::Result<()> {
    let store = YamlQuotaStore::open(&project_dir).with_context(|| {
        format!("Failed to load quota project at {}", project_dir.display())
    })?;
    let threshold = store.config().monitoring.near_completion_threshold;

    let selection: Vec<String> = questionnaire.into_iter().collect();
    let report = QuotaMonitor::refresh(&store, &selection, threshold).await?;

    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print_tables(&report),
    }

    if save {
        let out_path = project_dir.join(&store.config().monitoring.report_path);
        atomic_write(&out_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        info!(path = ?out_path, "Progress report saved");
    }

    Ok(())
}

fn print_tables(report: &MonitoringReport) {
    if report.questionnaires.is_empty() {
        println!("No questionnaires found.");
        return;
    }

    for progress in &report.questionnaires {
        let totals = &progress.totals;
        println!(
            "\n📋 {}: {}/{} completed ({:.1}%), {} open quota(s)",
            progress.questionnaire_id,
            totals.completed_count,
            totals.target_count,
            totals.completion_percentage,
            totals.open_quotas
        );

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "Quota",
            "Priority",
            "Completed",
            "Target",
            "In progress",
            "Remaining",
            "%",
            "Status",
        ]);
        for row in &progress.quotas {
            let status = if row.is_active {
                row.status.to_string()
            } else {
                format!("{} (paused)", row.status)
            };
            table.add_row(vec![
                format!("{} ({})", row.id, row.name),
                row.priority.to_string(),
                row.completed_count.to_string(),
                row.target_count.to_string(),
                row.in_progress_count.to_string(),
                row.remaining_count.to_string(),
                format!("{:.1}", row.completion_percentage),
                status,
            ]);
        }
        println!("{table}");
    }
}
