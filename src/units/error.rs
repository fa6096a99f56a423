/// Errors that can occur while parsing or converting physical quantities
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    /// Unit name not present in the registry
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// Unit expression could not be parsed
    #[error("Invalid unit expression '{expression}': {reason}")]
    InvalidExpression {
        /// The offending expression
        expression: String,
        /// What went wrong
        reason: String,
    },

    /// Magnitude part of a quantity is not a number
    #[error("Invalid magnitude: {0}")]
    InvalidMagnitude(String),

    /// Units have different dimensionality
    #[error("Cannot convert from '{from}' to '{to}'")]
    Incompatible {
        /// Source unit
        from: String,
        /// Target unit
        to: String,
    },
}
