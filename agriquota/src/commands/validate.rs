// agriquota/src/commands/validate.rs
//
// USE CASE: static checks on variable and quota definitions (CI gate).

use anyhow::Context;
use std::path::PathBuf;

use agriquota_core::application::{IssueSeverity, validate_definitions};
use agriquota_core::infrastructure::config::{
    load_project_config, load_quota_files, load_variables,
};

pub fn execute(project_dir: PathBuf, strict: bool) -> anyhow::Result<()> {
    println!("🔍 Validating quota definitions...");

    let config = load_project_config(&project_dir).with_context(|| {
        format!("Failed to load quota project at {}", project_dir.display())
    })?;
    let variables = load_variables(&project_dir.join(&config.variables_path))?;
    let quotas: Vec<_> = load_quota_files(&project_dir, &config.quota_paths)?
        .into_iter()
        .flat_map(|file| file.quotas)
        .collect();

    println!(
        "   Project: {} ({} variables, {} quotas)",
        config.name,
        variables.len(),
        quotas.len()
    );

    let report = validate_definitions(&variables, &quotas);

    for issue in &report.issues {
        let icon = match issue.severity {
            IssueSeverity::Error => "❌",
            IssueSeverity::Warning => "⚠️ ",
        };
        eprintln!("   {} {}: {}", icon, issue.subject, issue.message);
    }

    println!(
        "📊 {} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );

    if report.has_errors() {
        if strict {
            eprintln!("\n💥 --strict mode: Failing due to invalid definitions.");
            std::process::exit(1);
        }
    } else {
        println!("   ✅ Definitions are valid.");
    }

    Ok(())
}
