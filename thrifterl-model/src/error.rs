//! Error types for model construction and validation.

use thiserror::Error;

/// Error type for model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A type id does not point into the type arena.
    #[error("unknown type id {id}")]
    UnknownTypeId {
        /// Offending id.
        id: usize,
    },

    /// A program id does not point into the program arena.
    #[error("unknown program id {id}")]
    UnknownProgramId {
        /// Offending id.
        id: usize,
    },

    /// A service id does not point into the service arena.
    #[error("unknown service id {id}")]
    UnknownServiceId {
        /// Offending id.
        id: usize,
    },

    /// An alias chain revisits a type.
    #[error("cyclic typedef chain: {path}")]
    CyclicAlias {
        /// Names along the chain, ending at the repeated type.
        path: String,
    },

    /// A container reaches itself without passing through a struct.
    #[error("cyclic container type: {path}")]
    CyclicType {
        /// Types along the cycle, ending at the repeated type.
        path: String,
    },

    /// Two fields of one struct share an id.
    #[error("duplicate field id {id} in struct '{struct_name}'")]
    DuplicateFieldId {
        /// Struct name.
        struct_name: String,
        /// Field id.
        id: i32,
    },

    /// A field id is zero or negative.
    #[error("field '{field}' of struct '{struct_name}' has non-positive id {id}")]
    InvalidFieldId {
        /// Struct name.
        struct_name: String,
        /// Field name.
        field: String,
        /// Field id.
        id: i32,
    },

    /// Two values of one enum share an integer.
    #[error("duplicate value {value} in enum '{enum_name}'")]
    DuplicateEnumValue {
        /// Enum name.
        enum_name: String,
        /// Repeated integer value.
        value: i64,
    },

    /// A service inheritance chain revisits a service.
    #[error("cyclic service inheritance: {path}")]
    CyclicInheritance {
        /// Names along the chain, ending at the repeated service.
        path: String,
    },

    /// A type is used where it is not valid, such as a struct id that is not a struct.
    #[error("expected {expected} for '{context}', found {found}")]
    UnexpectedType {
        /// What was expected.
        expected: &'static str,
        /// What was found.
        found: &'static str,
        /// Where the type was used.
        context: String,
    },
}

impl ModelError {
    /// Creates an unexpected type error.
    pub fn unexpected(
        expected: &'static str,
        found: &'static str,
        context: impl Into<String>,
    ) -> Self {
        Self::UnexpectedType {
            expected,
            found,
            context: context.into(),
        }
    }
}
