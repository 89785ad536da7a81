//! Erlang type specifications.

use crate::error::CodegenError;
use thrifterl_model::naming::uncapitalize;
use thrifterl_model::{BaseType, Model, Type, TypeId};

/// Generator for `-type` declarations and record field annotations.
pub struct TypespecGenerator<'a> {
    model: &'a Model,
}

impl<'a> TypespecGenerator<'a> {
    /// Creates a new typespec generator.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Renders the Erlang type of a value of type `id`.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedType` for void.
    pub fn render_type(&self, id: TypeId) -> Result<String, CodegenError> {
        match self.model.true_type(id)? {
            Type::Base(base) => Ok(base_type_spec(*base).to_string()),
            Type::Enum(_) => Ok("atom()".to_string()),
            Type::Struct(struct_def) => Ok(format!("{}()", uncapitalize(&struct_def.name))),
            Type::Map { key, value } => Ok(format!(
                "#{{{} => {}}}",
                self.render_type(*key)?,
                self.render_type(*value)?
            )),
            Type::Set(elem) => Ok(format!("ordsets:ordset({})", self.render_type(*elem)?)),
            Type::List(elem) => Ok(format!("list({})", self.render_type(*elem)?)),
            other @ (Type::Void | Type::Alias { .. }) => {
                Err(CodegenError::unsupported(other.display_name(), "type specification"))
            }
        }
    }

    /// Type declarations describing descriptor terms.
    ///
    /// The extended form adds field names and requiredness.
    #[must_use]
    pub fn descriptor_types(with_extended: bool) -> String {
        let mut output = String::new();

        output.push_str("-type type_ref() :: {module(), atom()}.\n");
        output.push_str("-type field_num() :: pos_integer().\n");

        if with_extended {
            output.push_str("-type field_name() :: atom().\n");
            output.push_str("-type field_req() :: required | optional | undefined.\n");
        }

        output.push_str("-type field_type() ::\n");
        output.push_str("    bool | byte | i16 | i32 | i64 | string | double |\n");
        output.push_str("    {enum, type_ref()} |\n");
        output.push_str("    {struct, type_ref()} |\n");
        output.push_str("    {list, field_type()} |\n");
        output.push_str("    {set, field_type()} |\n");
        output.push_str("    {map, field_type(), field_type()}.\n\n");

        output.push_str("-type struct_field_info() :: {field_num(), field_type()}.\n");

        if with_extended {
            output.push_str(
                "-type struct_field_info_ext() :: \
                 {field_num(), field_req(), field_type(), field_name(), any()}.\n",
            );
        }

        output.push('\n');
        output
    }
}

const fn base_type_spec(base: BaseType) -> &'static str {
    match base {
        BaseType::String => "binary()",
        BaseType::Bool => "boolean()",
        BaseType::Byte | BaseType::I16 | BaseType::I32 | BaseType::I64 => "integer()",
        BaseType::Double => "float()",
    }
}
