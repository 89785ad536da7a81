//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! ```ignore
//! use thrifterl::prelude::*;
//! ```

// Model types
pub use thrifterl_model::{
    BaseType, ConstValue, Constant, EnumDef, Field, Function, Model, ModelError, Program,
    ProgramId, Requiredness, Service, ServiceId, StructDef, Type, TypeId, validate_model,
};

// Generation
pub use thrifterl_codegen::erlang::{FunctionInfo, InfoKind, Lookup, ServiceRegistry, ServiceTable};
pub use thrifterl_codegen::{
    Artifact, CodegenError, Generator, ProgramArtifacts, generate, generate_from_json,
};
