//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
///
/// Every variant is fatal: a generator run that returns an error has
/// produced no usable output.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// IDL parsing error.
    #[error("IDL parse error: {0}")]
    Parse(#[from] idlgen_model::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Type variant the requested emitter cannot render.
    #[error("unsupported type '{type_name}': {reason}")]
    UnsupportedType {
        /// Type name.
        type_name: String,
        /// What the emitter required.
        reason: String,
    },

    /// Keyed union reached without an enclosing instance to read the discriminant from.
    #[error("keyed union '{type_name}' at '{instance}' has no enclosing instance")]
    MissingParent {
        /// Type name.
        type_name: String,
        /// Instance expression being destroyed.
        instance: String,
    },

    /// Discriminant template without exactly one `%s` placeholder.
    #[error("malformed discriminant template '{template}' on field '{field}'")]
    MalformedTemplate {
        /// Field name.
        field: String,
        /// Offending template.
        template: String,
    },

    /// Field without a name whose type cannot be spliced inline.
    #[error("unnamed field of non-aggregate type '{type_name}'")]
    UnnamedField {
        /// Type name.
        type_name: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}
