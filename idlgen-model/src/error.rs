//! Error types for loading type models.

use thiserror::Error;

/// Error raised while loading an IDL document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("malformed IDL document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An IDL element lacks an attribute it cannot do without.
    #[error("<{element}> requires a '{attribute}' attribute")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// An attribute value cannot be interpreted.
    #[error("<{element} {attribute}=\"{value}\"> is not a valid setting")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Offending value.
        value: String,
    },

    /// An element is not allowed where it appears.
    #[error("<{element}> is not allowed inside <{context}>")]
    UnknownElement {
        /// Element name.
        element: String,
        /// Enclosing element.
        context: String,
    },

    /// A field names a type that is neither a builtin nor declared earlier.
    #[error("field '{field}' of {owner} uses undeclared type '{type_name}'")]
    UnknownType {
        /// The unresolved type name.
        type_name: String,
        /// Aggregate holding the field.
        owner: String,
        /// Field name.
        field: String,
    },

    /// A type name or singleton element appears twice.
    #[error("{kind} '{name}' is declared more than once")]
    DuplicateDefinition {
        /// What was redeclared (`type`, `element`).
        kind: String,
        /// Name of the redeclaration.
        name: String,
    },

    /// An element is well-formed XML but does not describe a valid type.
    #[error("invalid <{element}>: {message}")]
    MalformedElement {
        /// Element being parsed.
        element: String,
        /// What is wrong with it.
        message: String,
    },

    /// An entity reference that is neither predefined nor a character reference.
    #[error("unknown entity '&{entity};'")]
    UnknownEntity {
        /// Entity name without `&` and `;`.
        entity: String,
    },

    /// The IDL file could not be read.
    #[error("cannot read IDL: {0}")]
    Io(#[from] std::io::Error),

    /// An element or attribute name is not UTF-8.
    #[error("IDL is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown element error.
    pub fn unknown_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates a malformed element error.
    pub fn malformed(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedElement {
            element: element.into(),
            message: message.into(),
        }
    }
}

impl From<quick_xml::encoding::EncodingError> for ParseError {
    fn from(err: quick_xml::encoding::EncodingError) -> Self {
        Self::Xml(err.into())
    }
}
