//! # thrifterl Model
//!
//! The parsed IDL type tree consumed by the Erlang generator.
//!
//! This crate provides:
//! - An arena-backed model of programs, types, constants and services
//! - Alias (typedef) resolution
//! - Structural validation of a model before generation
//! - Identifier helpers shared by every renderer

pub mod error;
pub mod model;
pub mod naming;
pub mod resolver;
pub mod types;
pub mod validation;

pub use error::ModelError;
pub use model::{Constant, Function, Model, Program, Service};
pub use types::{
    BaseType, ConstValue, EnumDef, EnumValue, Field, ProgramId, Requiredness, ServiceId,
    StructDef, Type, TypeId,
};
pub use validation::validate_model;
