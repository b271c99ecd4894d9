// agriquota-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgriquotaError {
    // --- DOMAIN ERRORS (unknown questionnaire, broken definitions) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

// Keeps `?` ergonomic on std::io calls without a duplicate enum variant
impl From<std::io::Error> for AgriquotaError {
    fn from(err: std::io::Error) -> Self {
        AgriquotaError::Infrastructure(InfrastructureError::Io(err))
    }
}
