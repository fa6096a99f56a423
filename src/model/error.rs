/// Errors raised while building experiment records
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Value outside a closed vocabulary
    #[error("Unknown {kind}: '{value}'")]
    UnknownKeyword {
        /// Vocabulary name (e.g. "apparatus kind")
        kind: &'static str,
        /// Rejected value
        value: String,
    },

    /// Ignition target that is empty or names several targets
    #[error("Invalid ignition target '{0}': a single species or property is required")]
    InvalidIgnitionTarget(String),
}
