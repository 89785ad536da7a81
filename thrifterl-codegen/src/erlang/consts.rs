//! Constant rendering.
//!
//! Constant values carry no type of their own; each one is checked against
//! the declared type while it is rendered.

use crate::erlang::literal::Literal;
use crate::error::CodegenError;
use thrifterl_model::naming::uncapitalize;
use thrifterl_model::{BaseType, ConstValue, Constant, Model, Program, Type, TypeId};
use tracing::debug;

/// Renders constant values as Erlang literals.
pub struct ConstRenderer<'a> {
    model: &'a Model,
}

impl<'a> ConstRenderer<'a> {
    /// Creates a new constant renderer.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Renders `value` as a literal of type `ty`.
    ///
    /// Struct assignments keep their given order and unassigned fields are
    /// left out. Missing required fields are not reported: the record
    /// declaration supplies their defaults.
    ///
    /// # Errors
    /// Returns `UnknownEnumValue` or `UnknownField` when the value does not
    /// match the declared enum or struct, and `UnrenderableConstant` when the
    /// value's shape does not fit the type at all.
    pub fn render(&self, ty: TypeId, value: &ConstValue) -> Result<Literal, CodegenError> {
        let resolved = self.model.true_type(ty)?;

        match resolved {
            Type::Base(base) => render_base(*base, value),
            Type::Enum(enum_def) => {
                let ConstValue::Integer(k) = value else {
                    return Err(mismatch(resolved, "integer", value));
                };
                let enum_value = enum_def
                    .value_of(*k)
                    .ok_or_else(|| CodegenError::UnknownEnumValue {
                        enum_name: enum_def.name.clone(),
                        value: *k,
                    })?;
                Ok(Literal::Atom(enum_value.name.to_lowercase()))
            }
            Type::Struct(struct_def) => {
                let ConstValue::Struct(assignments) = value else {
                    return Err(mismatch(resolved, "struct", value));
                };
                let mut fields = Vec::with_capacity(assignments.len());
                for (name, field_value) in assignments {
                    let field = struct_def.field(name).ok_or_else(|| CodegenError::UnknownField {
                        struct_name: struct_def.name.clone(),
                        field: name.clone(),
                    })?;
                    fields.push((uncapitalize(name), self.render(field.ty, field_value)?));
                }
                Ok(Literal::Record {
                    name: uncapitalize(&struct_def.name),
                    fields,
                })
            }
            Type::Map { key, value: val } => {
                let ConstValue::Map(pairs) = value else {
                    return Err(mismatch(resolved, "map", value));
                };
                let pairs = pairs
                    .iter()
                    .map(|(k, v)| -> Result<_, CodegenError> {
                        Ok((self.render(*key, k)?, self.render(*val, v)?))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Literal::Map(pairs))
            }
            Type::Set(elem) => {
                let ConstValue::List(elems) = value else {
                    return Err(mismatch(resolved, "list", value));
                };
                Ok(Literal::Set(self.render_all(*elem, elems)?))
            }
            Type::List(elem) => {
                let ConstValue::List(elems) = value else {
                    return Err(mismatch(resolved, "list", value));
                };
                Ok(Literal::List(self.render_all(*elem, elems)?))
            }
            Type::Void | Type::Alias { .. } => Err(CodegenError::unrenderable(
                resolved.display_name(),
                "no literal exists for this type",
            )),
        }
    }

    fn render_all(
        &self,
        elem: TypeId,
        values: &[ConstValue],
    ) -> Result<Vec<Literal>, CodegenError> {
        values.iter().map(|v| self.render(elem, v)).collect()
    }

    /// Emits the `-define` lines of a program's constants header.
    ///
    /// # Errors
    /// Returns the first rendering error, tagged with the constant's name.
    pub fn emit_constants(&self, out: &mut String, program: &Program) -> Result<(), CodegenError> {
        for constant in &program.constants {
            self.emit_constant(out, program, constant)
                .map_err(|e| e.in_entity(&constant.name))?;
        }
        Ok(())
    }

    fn emit_constant(
        &self,
        out: &mut String,
        program: &Program,
        constant: &Constant,
    ) -> Result<(), CodegenError> {
        debug!(constant = %constant.name, "rendering constant");
        let literal = self.render(constant.ty, &constant.value)?;
        out.push_str(&format!(
            "-define({}_{}, {}).\n\n",
            program.erl_name(),
            constant.name,
            literal
        ));
        Ok(())
    }
}

fn render_base(base: BaseType, value: &ConstValue) -> Result<Literal, CodegenError> {
    match (base, value) {
        (BaseType::String, ConstValue::String(s)) => Ok(Literal::String(s.clone())),
        (BaseType::Bool, ConstValue::Bool(b)) => Ok(Literal::Bool(*b)),
        (BaseType::Bool, ConstValue::Integer(i)) => Ok(Literal::Bool(*i > 0)),
        (
            BaseType::Byte | BaseType::I16 | BaseType::I32 | BaseType::I64,
            ConstValue::Integer(i),
        ) => Ok(Literal::Integer(*i)),
        (BaseType::Double, ConstValue::Integer(i)) => Ok(Literal::Integer(*i)),
        (BaseType::Double, ConstValue::Double(d)) if d.is_finite() => Ok(Literal::Float(*d)),
        (BaseType::Double, ConstValue::Double(_)) => {
            Err(CodegenError::unrenderable("double", "non-finite value"))
        }
        (base, value) => Err(CodegenError::unrenderable(
            base.tag(),
            format!("value {} does not fit", shape(value)),
        )),
    }
}

fn mismatch(ty: &Type, expected: &str, value: &ConstValue) -> CodegenError {
    CodegenError::unrenderable(
        ty.display_name(),
        format!("expected {expected} value, found {}", shape(value)),
    )
}

const fn shape(value: &ConstValue) -> &'static str {
    match value {
        ConstValue::Integer(_) => "integer",
        ConstValue::Double(_) => "double",
        ConstValue::Bool(_) => "bool",
        ConstValue::String(_) => "string",
        ConstValue::List(_) => "list",
        ConstValue::Map(_) => "map",
        ConstValue::Struct(_) => "struct",
    }
}
