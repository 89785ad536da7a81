//! # thrifterl
//!
//! Erlang code generation for a Thrift-style IDL compiler.
//!
//! Given the type model of one or more parsed IDL programs, thrifterl emits
//! for each program a types header with records and enum constants, a types
//! module with runtime reflection tables, a constants header, and one
//! header/module pair per service describing its functions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use thrifterl::prelude::*;
//!
//! let mut model = Model::new();
//! let program = model.add_program(Program::new("tutorial"));
//! let i32_ty = model.add_type(Type::Base(BaseType::I32));
//! model.add_struct(StructDef::new("Work", program).with_field(Field::new(1, "num1", i32_ty)))?;
//!
//! for artifacts in generate(&model)? {
//!     artifacts.write_to(std::path::Path::new("gen-erl"))?;
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Programs, types, constants and services, plus validation
//! - [`codegen`] - Erlang file and descriptor table generation

pub mod prelude;

/// Type model, alias resolution and validation.
pub mod model {
    pub use thrifterl_model::*;
}

/// Erlang code generation.
pub mod codegen {
    pub use thrifterl_codegen::*;
}

pub use thrifterl_codegen::{generate, generate_from_file, generate_from_json};
