//! # thrifterl Codegen
//!
//! Erlang code generation from a thrifterl model.
//!
//! This crate provides:
//! - Record declarations and enum constants for every program
//! - `enum_info/1`, `struct_info/1` and `struct_info_ext/1` reflection tables
//! - Constant headers rendered as Erlang literals
//! - Service modules with inheritance-aware `function_info/2` tables

pub mod erlang;
pub mod error;
pub mod generator;

pub use error::CodegenError;
pub use generator::{Artifact, DescriptorTable, Generator, ProgramArtifacts, ServiceArtifacts};

use thrifterl_model::Model;

/// Validates a model and generates every program in it.
///
/// # Arguments
/// * `model` - Model handed over by the IDL front end
///
/// # Returns
/// One set of artifacts per program, in program order.
///
/// # Errors
/// Returns `CodegenError` if validation or generation fails.
pub fn generate(model: &Model) -> Result<Vec<ProgramArtifacts>, CodegenError> {
    thrifterl_model::validate_model(model)?;
    Generator::new(model).generate_all()
}

/// Generates Erlang code from a JSON-encoded model.
///
/// # Errors
/// Returns `CodegenError` if decoding, validation, or generation fails.
pub fn generate_from_json(json: &str) -> Result<Vec<ProgramArtifacts>, CodegenError> {
    let model = Model::from_json(json)?;
    generate(&model)
}

/// Generates Erlang code from a JSON model file.
///
/// # Errors
/// Returns `CodegenError` if reading, decoding, validation, or generation fails.
pub fn generate_from_file(path: &std::path::Path) -> Result<Vec<ProgramArtifacts>, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_from_json(&json)
}
