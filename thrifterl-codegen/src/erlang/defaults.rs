//! Field default derivation.

use crate::erlang::consts::ConstRenderer;
use crate::erlang::literal::{DefaultValue, EmptyAggregate};
use crate::error::CodegenError;
use thrifterl_model::naming::uncapitalize;
use thrifterl_model::{Field, Model, Requiredness, Type};

/// Decides and renders the default a record field starts out with.
pub struct DefaultDeriver<'a> {
    model: &'a Model,
}

impl<'a> DefaultDeriver<'a> {
    /// Creates a new default deriver.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Returns true if the field has a materialized default.
    ///
    /// A field has one when it declares an explicit default, or when it is
    /// required and its resolved type is a struct or container.
    ///
    /// # Errors
    /// Propagates alias resolution errors.
    pub fn has_default(&self, field: &Field) -> Result<bool, CodegenError> {
        if field.default.is_some() {
            return Ok(true);
        }
        if field.requiredness != Requiredness::Required {
            return Ok(false);
        }
        Ok(self.model.true_type(field.ty)?.is_aggregate())
    }

    /// Renders the field's default, or the absent sentinel.
    ///
    /// # Errors
    /// Propagates constant rendering and alias resolution errors.
    pub fn render_default(&self, field: &Field) -> Result<DefaultValue, CodegenError> {
        if let Some(value) = &field.default {
            let literal = ConstRenderer::new(self.model).render(field.ty, value)?;
            return Ok(DefaultValue::Explicit(literal));
        }
        if !self.has_default(field)? {
            return Ok(DefaultValue::Absent);
        }

        let empty = match self.model.true_type(field.ty)? {
            Type::Struct(struct_def) => EmptyAggregate::Record(uncapitalize(&struct_def.name)),
            Type::Map { .. } => EmptyAggregate::Map,
            Type::Set(_) => EmptyAggregate::Set,
            Type::List(_) => EmptyAggregate::List,
            other => {
                return Err(CodegenError::unsupported(
                    other.display_name(),
                    format!("default of field '{}'", field.name),
                ));
            }
        };
        Ok(DefaultValue::Empty(empty))
    }
}
