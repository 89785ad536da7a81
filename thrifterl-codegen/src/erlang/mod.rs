//! Erlang code generation modules.

pub mod consts;
pub mod defaults;
pub mod descriptor;
pub mod enums;
pub mod literal;
pub mod preamble;
pub mod records;
pub mod services;
pub mod typespec;

pub use consts::ConstRenderer;
pub use defaults::DefaultDeriver;
pub use descriptor::{Descriptor, DescriptorBuilder, FieldDescriptor, FieldExt, TypeRef};
pub use enums::EnumGenerator;
pub use literal::{DefaultValue, EmptyAggregate, Literal};
pub use records::RecordGenerator;
pub use services::{FunctionInfo, InfoKind, Lookup, ServiceGenerator, ServiceRegistry, ServiceTable};
pub use typespec::TypespecGenerator;
