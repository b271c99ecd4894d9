// agriquota-core/src/ports/quota_source.rs

// What the application needs from the backend that owns quota counters,
// without knowing whether it is a YAML project, a database or a REST API.
// Implementations return snapshots: the caller never writes counters back.

use crate::domain::quota::{Quota, VariableCatalog};
use crate::error::AgriquotaError;
use async_trait::async_trait;

#[async_trait]
pub trait QuotaSource: Send + Sync {
    async fn fetch_variables(&self) -> Result<VariableCatalog, AgriquotaError>;

    /// Quotas of one questionnaire, in definition order.
    async fn fetch_quotas(&self, questionnaire_id: &str) -> Result<Vec<Quota>, AgriquotaError>;

    async fn list_questionnaires(&self) -> Result<Vec<String>, AgriquotaError>;
}
