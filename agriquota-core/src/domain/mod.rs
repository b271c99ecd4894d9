pub mod error;
pub mod project;
pub mod quota;

// Handy re-exports to keep imports short elsewhere
pub use error::DomainError;
