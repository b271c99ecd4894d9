// agriquota-core/src/infrastructure/store.rs
//
// File-backed QuotaSource: reads a project directory laid out as
// agriquota.yaml + variables.yaml + quotas/*.yaml.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;
use crate::domain::project::ProjectConfig;
use crate::domain::quota::{Quota, VariableCatalog};
use crate::error::AgriquotaError;
use crate::infrastructure::config::{load_project_config, load_quota_files, load_variables};
use crate::ports::QuotaSource;

pub struct YamlQuotaStore {
    project_dir: PathBuf,
    config: ProjectConfig,
}

impl YamlQuotaStore {
    pub fn open(project_dir: &Path) -> Result<Self, AgriquotaError> {
        let config = load_project_config(project_dir)?;
        Ok(Self::from_config(project_dir, config))
    }

    pub fn from_config(project_dir: &Path, config: ProjectConfig) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            config,
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }
}

#[async_trait]
impl QuotaSource for YamlQuotaStore {
    async fn fetch_variables(&self) -> Result<VariableCatalog, AgriquotaError> {
        let path = self.project_dir.join(&self.config.variables_path);
        let variables = load_variables(&path)?;
        Ok(VariableCatalog::from_variables(variables)?)
    }

    async fn fetch_quotas(&self, questionnaire_id: &str) -> Result<Vec<Quota>, AgriquotaError> {
        let files = load_quota_files(&self.project_dir, &self.config.quota_paths)?;

        let mut found = false;
        let mut quotas = Vec::new();
        for file in files {
            if file.questionnaire_id == questionnaire_id {
                found = true;
                quotas.extend(file.quotas);
            }
        }

        if !found {
            return Err(DomainError::QuestionnaireNotFound(questionnaire_id.to_string()).into());
        }
        Ok(quotas)
    }

    async fn list_questionnaires(&self) -> Result<Vec<String>, AgriquotaError> {
        let files = load_quota_files(&self.project_dir, &self.config.quota_paths)?;
        let ids: BTreeSet<String> = files.into_iter().map(|f| f.questionnaire_id).collect();
        Ok(ids.into_iter().collect())
    }
}
