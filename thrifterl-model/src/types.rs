//! Type definitions for the IDL model.
//!
//! This module contains the data structures representing IDL elements
//! including base types, enums, structs, containers and typedefs, plus the
//! untyped constant values that are always interpreted against a [`Type`].

use serde::{Deserialize, Serialize};

/// Index of a type inside a [`crate::Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub usize);

/// Index of a program inside a [`crate::Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub usize);

/// Index of a service inside a [`crate::Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub usize);

/// Type variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// The absent return type of a function.
    Void,
    /// Base (scalar) type.
    Base(BaseType),
    /// Enum type definition.
    Enum(EnumDef),
    /// Struct or exception definition.
    Struct(StructDef),
    /// Ordered sequence.
    List(TypeId),
    /// Set of unique elements.
    Set(TypeId),
    /// Key/value map.
    Map {
        /// Key type.
        key: TypeId,
        /// Value type.
        value: TypeId,
    },
    /// Typedef; transparent for every renderer.
    Alias {
        /// Typedef name.
        name: String,
        /// Aliased type.
        target: TypeId,
    },
}

impl Type {
    /// Returns the declared name of the type, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Enum(e) => Some(&e.name),
            Self::Struct(s) => Some(&s.name),
            Self::Alias { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns a short description of the variant, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Base(b) => b.tag(),
            Self::Enum(_) => "enum",
            Self::Struct(s) if s.is_exception => "exception",
            Self::Struct(_) => "struct",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map { .. } => "map",
            Self::Alias { .. } => "typedef",
        }
    }

    /// Returns a human readable name: the declared name or the kind.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name()
            .map_or_else(|| self.kind_name().to_string(), str::to_string)
    }

    /// Returns true if this is a struct, exception or container.
    #[must_use]
    pub const fn is_aggregate(&self) -> bool {
        matches!(
            self,
            Self::Struct(_) | Self::List(_) | Self::Set(_) | Self::Map { .. }
        )
    }
}

/// IDL base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseType {
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// 64-bit floating point.
    Double,
    /// UTF-8 string or binary.
    String,
}

impl BaseType {
    /// Returns the descriptor tag for this base type.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

/// Enum type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Type name.
    pub name: String,
    /// Program that declares the enum.
    pub program: ProgramId,
    /// Declared values, in declaration order.
    pub values: Vec<EnumValue>,
}

impl EnumDef {
    /// Creates a new enum definition with no values.
    #[must_use]
    pub fn new(name: impl Into<String>, program: ProgramId) -> Self {
        Self {
            name: name.into(),
            program,
            values: Vec::new(),
        }
    }

    /// Adds a value, returning the definition for chaining.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            value,
        });
        self
    }

    /// Looks up the value declared with the given integer.
    #[must_use]
    pub fn value_of(&self, value: i64) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.value == value)
    }
}

/// Enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Integer value.
    pub value: i64,
}

/// Struct or exception definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    /// Type name.
    pub name: String,
    /// Program that declares the struct.
    pub program: ProgramId,
    /// Whether this struct was declared as an exception.
    #[serde(default)]
    pub is_exception: bool,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl StructDef {
    /// Creates a new struct definition with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>, program: ProgramId) -> Self {
        Self {
            name: name.into(),
            program,
            is_exception: false,
            fields: Vec::new(),
        }
    }

    /// Creates a new exception definition with no fields.
    #[must_use]
    pub fn exception(name: impl Into<String>, program: ProgramId) -> Self {
        Self {
            is_exception: true,
            ..Self::new(name, program)
        }
    }

    /// Adds a field, returning the definition for chaining.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Field presence contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requiredness {
    /// Must be present.
    Required,
    /// May be absent.
    Optional,
    /// Unspecified.
    #[default]
    Default,
}

impl Requiredness {
    /// Returns the atom used for this requiredness in extended descriptors.
    #[must_use]
    pub const fn atom(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Default => "undefined",
        }
    }
}

/// Field within a struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field id.
    pub id: i32,
    /// Field name.
    pub name: String,
    /// Presence contract.
    #[serde(default)]
    pub requiredness: Requiredness,
    /// Field type.
    pub ty: TypeId,
    /// Explicit default value.
    #[serde(default)]
    pub default: Option<ConstValue>,
}

impl Field {
    /// Creates a field with default requiredness and no default value.
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            id,
            name: name.into(),
            requiredness: Requiredness::Default,
            ty,
            default: None,
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.requiredness = Requiredness::Required;
        self
    }

    /// Marks the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.requiredness = Requiredness::Optional;
        self
    }

    /// Sets an explicit default value.
    #[must_use]
    pub fn with_default(mut self, value: ConstValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Constant value tree.
///
/// Carries no type of its own; it is interpreted against the type it is
/// declared with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstValue {
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Double(f64),
    /// Boolean literal.
    Bool(bool),
    /// String literal.
    String(String),
    /// List or set literal.
    List(Vec<ConstValue>),
    /// Map literal, in source order.
    Map(Vec<(ConstValue, ConstValue)>),
    /// Struct literal: field name to value, in source order.
    Struct(Vec<(String, ConstValue)>),
}
