//! Model validation utilities.
//!
//! The generator assumes a well-formed model; these checks turn the
//! assumptions into errors before any output is produced.

use crate::error::ModelError;
use crate::model::Model;
use crate::types::{EnumDef, StructDef, Type, TypeId};
use std::collections::HashSet;

/// Validates a model for consistency.
///
/// # Arguments
/// * `model` - The model to validate
///
/// # Returns
/// Ok(()) if valid, or ModelError describing the first issue found.
///
/// # Errors
/// Returns `ModelError` if validation fails.
pub fn validate_model(model: &Model) -> Result<(), ModelError> {
    validate_types(model)?;
    validate_programs(model)?;
    validate_services(model)?;
    Ok(())
}

/// Validates every type in the arena.
fn validate_types(model: &Model) -> Result<(), ModelError> {
    for (id, ty) in model.types() {
        match ty {
            Type::Void | Type::Base(_) => {}
            Type::Enum(enum_def) => {
                model.program(enum_def.program)?;
                validate_enum(enum_def)?;
            }
            Type::Struct(struct_def) => {
                model.program(struct_def.program)?;
                validate_struct(model, struct_def)?;
            }
            Type::List(elem) | Type::Set(elem) => {
                model.get_type(*elem)?;
                check_container_cycle(model, id, &mut Vec::new())?;
            }
            Type::Map { key, value } => {
                model.get_type(*key)?;
                model.get_type(*value)?;
                check_container_cycle(model, id, &mut Vec::new())?;
            }
            Type::Alias { .. } => {
                model.resolve(id)?;
            }
        }
    }
    Ok(())
}

/// Walks container element types until a struct, enum or base type.
///
/// Structs and enums are referenced by name, so only a loop made of
/// containers and typedefs can never be rendered.
fn check_container_cycle(
    model: &Model,
    id: TypeId,
    stack: &mut Vec<TypeId>,
) -> Result<(), ModelError> {
    if let Some(start) = stack.iter().position(|t| *t == id) {
        let mut path: Vec<String> = Vec::with_capacity(stack.len() - start + 1);
        for t in &stack[start..] {
            path.push(model.get_type(*t)?.display_name());
        }
        path.push(model.get_type(id)?.display_name());
        return Err(ModelError::CyclicType {
            path: path.join(" -> "),
        });
    }

    let children = match model.get_type(id)? {
        Type::List(elem) | Type::Set(elem) => vec![*elem],
        Type::Map { key, value } => vec![*key, *value],
        Type::Alias { target, .. } => {
            model.resolve(id)?;
            vec![*target]
        }
        Type::Void | Type::Base(_) | Type::Enum(_) | Type::Struct(_) => return Ok(()),
    };

    stack.push(id);
    for child in children {
        check_container_cycle(model, child, stack)?;
    }
    stack.pop();
    Ok(())
}

/// Validates an enum type definition.
fn validate_enum(enum_def: &EnumDef) -> Result<(), ModelError> {
    let mut seen_values = HashSet::new();

    for value in &enum_def.values {
        if !seen_values.insert(value.value) {
            return Err(ModelError::DuplicateEnumValue {
                enum_name: enum_def.name.clone(),
                value: value.value,
            });
        }
    }

    Ok(())
}

/// Validates fields within a struct.
fn validate_struct(model: &Model, struct_def: &StructDef) -> Result<(), ModelError> {
    let mut seen_ids = HashSet::new();

    for field in &struct_def.fields {
        if field.id <= 0 {
            return Err(ModelError::InvalidFieldId {
                struct_name: struct_def.name.clone(),
                field: field.name.clone(),
                id: field.id,
            });
        }

        if !seen_ids.insert(field.id) {
            return Err(ModelError::DuplicateFieldId {
                struct_name: struct_def.name.clone(),
                id: field.id,
            });
        }

        model.get_type(field.ty)?;
    }

    Ok(())
}

/// Validates the registration lists of every program.
fn validate_programs(model: &Model) -> Result<(), ModelError> {
    for (_, program) in model.programs() {
        for include in &program.includes {
            model.program(*include)?;
        }
        for id in program.enums.iter().chain(&program.structs).chain(&program.typedefs) {
            model.get_type(*id)?;
        }
        for constant in &program.constants {
            model.get_type(constant.ty)?;
        }
        for service in &program.services {
            model.service(*service)?;
        }
    }
    Ok(())
}

/// Validates functions and inheritance chains of every service.
fn validate_services(model: &Model) -> Result<(), ModelError> {
    for (id, service) in model.services() {
        model.program(service.program)?;

        for function in &service.functions {
            let context = format!("{}.{}", service.name, function.name);
            expect_struct(model, function.args, &context)?;
            expect_struct(model, function.exceptions, &context)?;
            model.get_type(function.return_type)?;
        }

        let mut seen = HashSet::new();
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(service_id) = current {
            let service = model.service(service_id)?;
            path.push(service.name.as_str());
            if !seen.insert(service_id) {
                return Err(ModelError::CyclicInheritance {
                    path: path.join(" -> "),
                });
            }
            current = service.extends;
        }
    }
    Ok(())
}

fn expect_struct(model: &Model, id: TypeId, context: &str) -> Result<(), ModelError> {
    match model.true_type(id)? {
        Type::Struct(_) => Ok(()),
        other => Err(ModelError::unexpected("struct", other.kind_name(), context)),
    }
}
