//! Record declarations and struct reflection clauses.

use crate::erlang::defaults::DefaultDeriver;
use crate::erlang::descriptor::Descriptor;
use crate::erlang::typespec::TypespecGenerator;
use crate::error::CodegenError;
use thrifterl_model::naming::{quote_atom, uncapitalize};
use thrifterl_model::{Field, Model, StructDef};
use tracing::debug;

/// Generator for struct and exception records.
pub struct RecordGenerator<'a> {
    defaults: DefaultDeriver<'a>,
    typespecs: TypespecGenerator<'a>,
}

impl<'a> RecordGenerator<'a> {
    /// Creates a new record generator.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self {
            defaults: DefaultDeriver::new(model),
            typespecs: TypespecGenerator::new(model),
        }
    }

    /// Emits the `-record` declaration and its `-type` alias.
    ///
    /// Fields appear in declaration order; those with a default carry it.
    ///
    /// # Errors
    /// Propagates default and typespec rendering errors.
    pub fn emit_record(
        &self,
        out: &mut String,
        struct_def: &StructDef,
    ) -> Result<(), CodegenError> {
        let name = uncapitalize(&struct_def.name);
        debug!(
            record = %name,
            fields = struct_def.fields.len(),
            exception = struct_def.is_exception,
            "rendering record"
        );

        out.push_str(&format!("%% struct {name}\n\n"));
        out.push_str(&format!("-record({name}, {{\n"));

        for (i, field) in struct_def.fields.iter().enumerate() {
            out.push_str("    ");
            out.push_str(&self.render_member(field)?);
            if i + 1 < struct_def.fields.len() {
                out.push(',');
            }
            out.push('\n');
        }

        out.push_str("}).\n\n");
        out.push_str(&format!("-type {name}() :: #{name}{{}}.\n\n"));
        Ok(())
    }

    fn render_member(&self, field: &Field) -> Result<String, CodegenError> {
        let mut member = uncapitalize(&field.name);
        if self.defaults.has_default(field)? {
            member.push_str(&format!(" = {}", self.defaults.render_default(field)?));
        }
        member.push_str(&format!(" :: {}", self.typespecs.render_type(field.ty)?));
        Ok(member)
    }
}

/// Emits a `struct_info/1` or `struct_info_ext/1` clause.
pub fn emit_info_clause(
    out: &mut String,
    function: &str,
    struct_name: &str,
    descriptor: &Descriptor,
) {
    out.push_str(&format!("{function}({}) ->\n", quote_atom(struct_name)));
    out.push_str(&format!("    {};\n\n", descriptor.render(4)));
}
