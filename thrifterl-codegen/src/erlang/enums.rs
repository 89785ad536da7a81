//! Enum code generation.

use crate::error::CodegenError;
use std::collections::HashSet;
use thrifterl_model::naming::{capitalize, quote_atom, uncapitalize};
use thrifterl_model::{EnumDef, Model, Program, Type, TypeId};
use tracing::debug;

/// Generator for enum constants and `enum_info/1` clauses.
pub struct EnumGenerator<'a> {
    model: &'a Model,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Looks up an enum definition.
    ///
    /// # Errors
    /// Returns `ModelError::UnexpectedType` if `id` is not an enum.
    pub fn enum_def(&self, id: TypeId) -> Result<&'a EnumDef, CodegenError> {
        match self.model.get_type(id)? {
            Type::Enum(enum_def) => Ok(enum_def),
            other => Err(thrifterl_model::ModelError::unexpected(
                "enum",
                other.kind_name(),
                other.display_name(),
            )
            .into()),
        }
    }

    /// Emits one `-define` per enum value into the types header.
    ///
    /// # Errors
    /// Returns `CodegenError::DuplicateEnumConstant` if two values produce
    /// the same macro name.
    pub fn emit_defines(
        &self,
        out: &mut String,
        program: &Program,
        enum_def: &EnumDef,
    ) -> Result<(), CodegenError> {
        debug!(enum_name = %enum_def.name, values = enum_def.values.len(), "rendering enum");
        let mut seen = HashSet::new();

        for value in &enum_def.values {
            let constant = capitalize(&value.name);
            if !seen.insert(constant.clone()) {
                return Err(CodegenError::DuplicateEnumConstant {
                    enum_name: enum_def.name.clone(),
                    constant,
                });
            }
            out.push_str(&format!(
                "-define({}_{}_{}, {}).\n",
                program.erl_name(),
                enum_def.name,
                constant,
                value.value
            ));
        }

        out.push('\n');
        Ok(())
    }

    /// Emits the `enum_info/1` clause for an enum.
    pub fn emit_enum_info(&self, out: &mut String, enum_def: &EnumDef) {
        out.push_str(&format!(
            "enum_info({}) ->\n",
            quote_atom(&uncapitalize(&enum_def.name))
        ));
        out.push_str("    {enum, [\n");

        for (i, value) in enum_def.values.iter().enumerate() {
            out.push_str(&format!(
                "        {{{}, {}}}",
                quote_atom(&value.name.to_lowercase()),
                value.value
            ));
            if i + 1 < enum_def.values.len() {
                out.push(',');
            }
            out.push('\n');
        }

        out.push_str("    ]};\n\n");
    }
}
