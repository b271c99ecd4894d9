// agriquota-core/src/infrastructure/config/project.rs

use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};
use validator::Validate;

use crate::domain::project::{MonitoringConfig, ProjectConfig};
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["agriquota.yaml", "agriquota.yml"];

pub const ENV_PROFILE: &str = "AGRIQUOTA_PROFILE";
pub const ENV_NEAR_COMPLETION_THRESHOLD: &str = "AGRIQUOTA_NEAR_COMPLETION_THRESHOLD";

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Discover the main file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    // 2. Base YAML
    let mut config: ProjectConfig = load_fragment(&config_path)?;

    // 3. Satellite files (fail-secure: a corrupt file stops everything)
    for folder in &config.config_paths.clone() {
        let config_dir = project_dir.join(folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        }
    }

    // 4. Environment layering, applied last
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Loads a typed configuration fragment from a YAML file.
pub(crate) fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| {
        error!(path = ?path, "Failed to parse YAML fragment");
        InfrastructureError::YamlError(e)
    })
}

fn load_satellite_configs(
    config: &mut ProjectConfig,
    config_dir: &Path,
) -> Result<(), InfrastructureError> {
    let monitoring_path = config_dir.join("monitoring.yml");
    if monitoring_path.exists() {
        #[derive(Deserialize)]
        struct MonitoringWrapper {
            monitoring: MonitoringConfig,
        }

        let wrapper: MonitoringWrapper = load_fragment(&monitoring_path)?;
        config.monitoring = wrapper.monitoring;
        info!("  📈 Monitoring settings loaded");
    }
    Ok(())
}

/// `lookup` is `std::env::var` in production; tests pass a map.
pub(crate) fn apply_env_overrides<F>(
    config: &mut ProjectConfig,
    lookup: F,
) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_PROFILE) {
        info!(old = ?config.profile, new = ?val, "Overriding profile via ENV");
        config.profile = val;
    }
    if let Some(val) = lookup(ENV_NEAR_COMPLETION_THRESHOLD) {
        let threshold = val
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| {
                InfrastructureError::ConfigError(format!(
                    "{} must be a finite number, got '{}'",
                    ENV_NEAR_COMPLETION_THRESHOLD, val
                ))
            })?;
        info!(
            old = config.monitoring.near_completion_threshold,
            new = threshold,
            "Overriding near-completion threshold via ENV"
        );
        config.monitoring.near_completion_threshold = threshold;
    }
    Ok(())
}
