use crate::model::ModelError;
use crate::units::UnitError;
use crate::validator::ValidationReport;

/// Errors loading or writing ChemKED documents
#[derive(Debug, thiserror::Error)]
pub enum ChemKedError {
    /// Malformed YAML, or YAML that does not fit the document layout
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// I/O error reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document failed validation
    #[error(
        "Validation failed for {} with {} error(s):\n{}",
        .0.source,
        .0.failure_count(),
        format_errors(.0)
    )]
    ValidationFailed(ValidationReport),

    /// A field holds a value the model cannot represent
    #[error("Invalid value for {field}: {message}")]
    InvalidField {
        /// Dotted field path
        field: String,
        /// What is wrong
        message: String,
    },

    /// Unit parsing or conversion failure
    #[error("Unit error: {0}")]
    UnitError(#[from] UnitError),

    /// Closed-vocabulary failure from the model
    #[error(transparent)]
    ModelError(#[from] ModelError),
}

impl ChemKedError {
    pub(crate) fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ChemKedError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn format_errors(report: &ValidationReport) -> String {
    report
        .errors()
        .iter()
        .map(|(field, message)| format!("  {}: {}", field, message))
        .collect::<Vec<_>>()
        .join("\n")
}
