use crate::model::ModelError;
use crate::units::UnitError;

/// Errors that abort a ReSpecTh import or export
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A required element is absent
    #[error("Required element {0} is missing")]
    MissingElement(String),

    /// A required attribute of a present element is absent
    #[error("Required attribute {attribute} of {element} is missing")]
    MissingAttribute {
        /// Attribute name
        attribute: String,
        /// Owning element
        element: String,
    },

    /// Value not in the accepted vocabulary
    #[error("Keyword not defined: {0}")]
    UndefinedKeyword(String),

    /// Recognized construct that this converter does not handle
    #[error("Not supported: {0}")]
    UnsupportedFeature(String),

    /// Values or combinations of fields that contradict each other
    #[error("Inconsistent field: {0}")]
    InconsistentField(String),

    /// Text that should be numeric is not
    #[error("Invalid value '{value}' in {element}")]
    InvalidValue {
        /// Element holding the value
        element: String,
        /// The offending text
        value: String,
    },

    /// Malformed document structure
    #[error("Invalid XML structure: {0}")]
    InvalidStructure(String),

    /// Unit parsing or conversion failure
    #[error("Unit error: {0}")]
    UnitError(#[from] UnitError),

    /// Closed-vocabulary failure from the model
    #[error(transparent)]
    ModelError(#[from] ModelError),

    /// Error parsing or writing XML
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error while writing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// UTF-8 encoding error in names or content
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),
}

impl ConvertError {
    pub(crate) fn missing_attribute(attribute: &str, element: &str) -> Self {
        ConvertError::MissingAttribute {
            attribute: attribute.to_string(),
            element: element.to_string(),
        }
    }
}
