//! Error types for code generation.

use thiserror::Error;
use thrifterl_model::ModelError;

/// Error type for code generation operations.
///
/// Every error is fatal to the current generation run.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Model lookup or validation error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A type that cannot appear in this position, such as void inside a container.
    #[error("unsupported type '{type_name}' in {context}")]
    UnsupportedType {
        /// Type name or kind.
        type_name: String,
        /// Where the type was found.
        context: String,
    },

    /// An enum constant whose integer is not declared by the enum.
    #[error("enum '{enum_name}' has no value {value}")]
    UnknownEnumValue {
        /// Enum name.
        enum_name: String,
        /// Integer that was looked up.
        value: i64,
    },

    /// A struct constant assigns a field the struct does not declare.
    #[error("type error: {struct_name} has no field {field}")]
    UnknownField {
        /// Struct name.
        struct_name: String,
        /// Assigned field name.
        field: String,
    },

    /// No literal rendering exists for this type and value.
    #[error("cannot generate constant for type '{type_name}': {reason}")]
    UnrenderableConstant {
        /// Type name or kind.
        type_name: String,
        /// What did not match.
        reason: String,
    },

    /// Two enum values collide once turned into macro names.
    #[error("duplicate constant '{constant}' in enum '{enum_name}'")]
    DuplicateEnumConstant {
        /// Enum name.
        enum_name: String,
        /// Colliding macro suffix.
        constant: String,
    },

    /// A service inheritance chain revisits a service during lookup.
    #[error("cyclic service inheritance at '{service}'")]
    CyclicInheritance {
        /// Service where the cycle was detected.
        service: String,
    },

    /// Error raised while rendering a named entity.
    #[error("while generating '{entity}': {source}")]
    Entity {
        /// Entity name.
        entity: String,
        /// Underlying error.
        #[source]
        source: Box<CodegenError>,
    },
}

impl CodegenError {
    /// Creates an unsupported type error.
    pub fn unsupported(type_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
            context: context.into(),
        }
    }

    /// Creates an unrenderable constant error.
    pub fn unrenderable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnrenderableConstant {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Attaches the name of the entity being generated.
    ///
    /// An error that already carries an entity keeps the innermost one.
    #[must_use]
    pub fn in_entity(self, entity: impl Into<String>) -> Self {
        match self {
            Self::Entity { .. } => self,
            other => Self::Entity {
                entity: entity.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the error without any entity context.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Entity { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_entity_wraps_once() {
        let err = CodegenError::unrenderable("i32", "expected integer")
            .in_entity("MAX")
            .in_entity("outer");
        match &err {
            CodegenError::Entity { entity, .. } => assert_eq!(entity, "MAX"),
            other => panic!("expected entity context, got {other:?}"),
        }
        assert!(matches!(
            err.root(),
            CodegenError::UnrenderableConstant { .. }
        ));
    }

    #[test]
    fn test_unknown_field_message() {
        let err = CodegenError::UnknownField {
            struct_name: "Point".into(),
            field: "z".into(),
        };
        assert_eq!(err.to_string(), "type error: Point has no field z");
    }

    #[test]
    fn test_model_error_conversion() {
        let err: CodegenError = ModelError::UnknownTypeId { id: 7 }.into();
        assert!(err.to_string().contains("unknown type id 7"));
    }
}
