// agriquota-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Questionnaire '{0}' has no quota definitions")]
    #[diagnostic(
        code(agriquota::domain::questionnaire_not_found),
        help("Check the `questionnaire_id` of the files under your quota paths.")
    )]
    QuestionnaireNotFound(String),

    #[error("Invalid respondent record: {0}")]
    #[diagnostic(
        code(agriquota::domain::invalid_record),
        help("A respondent record is a flat JSON object: {{ \"variable\": value }}.")
    )]
    InvalidRecord(String),

    #[error("Variable '{0}' is declared more than once")]
    #[diagnostic(code(agriquota::domain::duplicate_variable))]
    DuplicateVariable(String),
}
