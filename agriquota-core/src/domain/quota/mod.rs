// agriquota-core/src/domain/quota/mod.rs

pub mod criterion;
pub mod definition;
pub mod evaluator;
pub mod record;
pub mod variable;

// Re-exports
pub use criterion::{CompiledCriteria, CriterionOperator, LogicMode, QuotaCriteria, QuotaCriterion};
pub use definition::{DEFAULT_NEAR_COMPLETION_THRESHOLD, Quota, QuotaStatus};
pub use evaluator::{CompiledQuotas, QuotaEvaluator};
pub use record::{RecordValue, RespondentRecord};
pub use variable::{QuotaVariable, TypedValue, VariableCatalog, VariableDataType};
