// agriquota-core/src/infrastructure/config/definitions.rs

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::project::load_fragment;
use crate::domain::quota::{Quota, QuotaVariable};
use crate::infrastructure::error::InfrastructureError;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// `variables.yaml`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct VariableFile {
    #[serde(default)]
    pub variables: Vec<QuotaVariable>,
}

/// One file per questionnaire under the quota paths.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuotaFile {
    pub questionnaire_id: String,
    #[serde(default)]
    pub quotas: Vec<Quota>,
}

/// A missing catalog is not an error: every criterion will simply never match.
pub fn load_variables(path: &Path) -> Result<Vec<QuotaVariable>, InfrastructureError> {
    if !path.exists() {
        warn!(path = ?path, "Variable catalog not found, criteria will not match");
        return Ok(Vec::new());
    }
    let file: VariableFile = load_fragment(path)?;
    info!(count = file.variables.len(), "Variable catalog loaded");
    Ok(file.variables)
}

/// Walks every quota path (sorted by file name for a stable order) and loads
/// each definition file. Quotas inherit the file's questionnaire id.
pub fn load_quota_files(
    project_dir: &Path,
    quota_paths: &[String],
) -> Result<Vec<QuotaFile>, InfrastructureError> {
    let mut files = Vec::new();

    for rel in quota_paths {
        let dir = project_dir.join(rel);
        if !dir.exists() {
            warn!(path = ?dir, "Quota path does not exist, skipping");
            continue;
        }

        let walker = WalkDir::new(&dir).sort_by_file_name();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let supported = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
            if !path.is_file() || !supported {
                continue;
            }

            let mut file: QuotaFile = load_fragment(path)?;
            for quota in &mut file.quotas {
                if quota.questionnaire_id.is_empty() {
                    quota.questionnaire_id = file.questionnaire_id.clone();
                }
            }
            info!(
                path = ?path,
                questionnaire = %file.questionnaire_id,
                quotas = file.quotas.len(),
                "Quota definitions loaded"
            );
            files.push(file);
        }
    }

    Ok(files)
}
