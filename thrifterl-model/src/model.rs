//! The model arena: programs, types, constants and services.
//!
//! Every entity is stored once and referred to by id, so struct graphs may
//! reference themselves and types may cross program boundaries. The model is
//! built once and treated as immutable by every renderer.

use crate::error::ModelError;
use crate::types::{ConstValue, EnumDef, ProgramId, ServiceId, StructDef, Type, TypeId};
use serde::{Deserialize, Serialize};

/// A complete compilation: all programs reachable from the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    types: Vec<Type>,
    programs: Vec<Program>,
    services: Vec<Service>,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a model handed over by the parser as JSON.
    ///
    /// # Errors
    /// Returns `ModelError::Json` if the document does not describe a model.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the model as JSON.
    ///
    /// # Errors
    /// Returns `ModelError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Adds a program and returns its id.
    pub fn add_program(&mut self, program: Program) -> ProgramId {
        let id = ProgramId(self.programs.len());
        self.programs.push(program);
        id
    }

    /// Returns the id the next added type will receive.
    ///
    /// Used to build self-referential structs.
    #[must_use]
    pub fn next_type_id(&self) -> TypeId {
        TypeId(self.types.len())
    }

    /// Adds an anonymous type (base type, container or void).
    pub fn add_type(&mut self, ty: Type) -> TypeId {
        let id = self.next_type_id();
        self.types.push(ty);
        id
    }

    /// Adds an enum and registers it with its program.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownProgramId` if the owning program does not exist.
    pub fn add_enum(&mut self, def: EnumDef) -> Result<TypeId, ModelError> {
        let program = def.program;
        self.program(program)?;
        let id = self.add_type(Type::Enum(def));
        self.programs[program.0].enums.push(id);
        Ok(id)
    }

    /// Adds a struct or exception and registers it with its program.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownProgramId` if the owning program does not exist.
    pub fn add_struct(&mut self, def: StructDef) -> Result<TypeId, ModelError> {
        let program = def.program;
        self.program(program)?;
        let id = self.add_type(Type::Struct(def));
        self.programs[program.0].structs.push(id);
        Ok(id)
    }

    /// Adds a typedef and registers it with its program.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownProgramId` if the program does not exist.
    pub fn add_typedef(
        &mut self,
        program: ProgramId,
        name: impl Into<String>,
        target: TypeId,
    ) -> Result<TypeId, ModelError> {
        self.program(program)?;
        let id = self.add_type(Type::Alias {
            name: name.into(),
            target,
        });
        self.programs[program.0].typedefs.push(id);
        Ok(id)
    }

    /// Adds a constant to a program.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownProgramId` if the program does not exist.
    pub fn add_constant(
        &mut self,
        program: ProgramId,
        constant: Constant,
    ) -> Result<(), ModelError> {
        self.program(program)?;
        self.programs[program.0].constants.push(constant);
        Ok(())
    }

    /// Adds a service and registers it with its program.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownProgramId` if the owning program does not exist.
    pub fn add_service(&mut self, service: Service) -> Result<ServiceId, ModelError> {
        let program = service.program;
        self.program(program)?;
        let id = ServiceId(self.services.len());
        self.services.push(service);
        self.programs[program.0].services.push(id);
        Ok(id)
    }

    /// Looks up a type by id.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownTypeId` if the id is out of range.
    pub fn get_type(&self, id: TypeId) -> Result<&Type, ModelError> {
        self.types
            .get(id.0)
            .ok_or(ModelError::UnknownTypeId { id: id.0 })
    }

    /// Looks up a program by id.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownProgramId` if the id is out of range.
    pub fn program(&self, id: ProgramId) -> Result<&Program, ModelError> {
        self.programs
            .get(id.0)
            .ok_or(ModelError::UnknownProgramId { id: id.0 })
    }

    /// Looks up a service by id.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownServiceId` if the id is out of range.
    pub fn service(&self, id: ServiceId) -> Result<&Service, ModelError> {
        self.services
            .get(id.0)
            .ok_or(ModelError::UnknownServiceId { id: id.0 })
    }

    /// Iterates over all types with their ids.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types.iter().enumerate().map(|(i, t)| (TypeId(i), t))
    }

    /// Iterates over all programs with their ids.
    pub fn programs(&self) -> impl Iterator<Item = (ProgramId, &Program)> {
        self.programs
            .iter()
            .enumerate()
            .map(|(i, p)| (ProgramId(i), p))
    }

    /// Iterates over all services with their ids.
    pub fn services(&self) -> impl Iterator<Item = (ServiceId, &Service)> {
        self.services
            .iter()
            .enumerate()
            .map(|(i, s)| (ServiceId(i), s))
    }

    /// Looks up a struct definition by type id, without resolving aliases.
    ///
    /// # Errors
    /// Returns `ModelError::UnexpectedType` if the id is not a struct.
    pub fn struct_def(&self, id: TypeId) -> Result<&StructDef, ModelError> {
        match self.get_type(id)? {
            Type::Struct(s) => Ok(s),
            other => Err(ModelError::unexpected(
                "struct",
                other.kind_name(),
                other.display_name(),
            )),
        }
    }
}

/// A compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Program name, usually the IDL file stem.
    pub name: String,
    /// Erlang namespace declared by the program.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Programs included by this one.
    #[serde(default)]
    pub includes: Vec<ProgramId>,
    /// Enums, in declaration order.
    #[serde(default)]
    pub enums: Vec<TypeId>,
    /// Structs and exceptions, in declaration order.
    #[serde(default)]
    pub structs: Vec<TypeId>,
    /// Typedefs, in declaration order.
    #[serde(default)]
    pub typedefs: Vec<TypeId>,
    /// Constants, in declaration order.
    #[serde(default)]
    pub constants: Vec<Constant>,
    /// Services, in declaration order.
    #[serde(default)]
    pub services: Vec<ServiceId>,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the Erlang namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds an included program.
    #[must_use]
    pub fn with_include(mut self, program: ProgramId) -> Self {
        self.includes.push(program);
        self
    }
}

/// A named constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    /// Constant name.
    pub name: String,
    /// Declared type.
    pub ty: TypeId,
    /// Value, interpreted against `ty`.
    pub value: ConstValue,
}

impl Constant {
    /// Creates a new constant.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeId, value: ConstValue) -> Self {
        Self {
            name: name.into(),
            ty,
            value,
        }
    }
}

/// A service definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service name.
    pub name: String,
    /// Program that declares the service.
    pub program: ProgramId,
    /// Functions, in declaration order.
    #[serde(default)]
    pub functions: Vec<Function>,
    /// Parent service.
    #[serde(default)]
    pub extends: Option<ServiceId>,
}

impl Service {
    /// Creates a service with no functions.
    #[must_use]
    pub fn new(name: impl Into<String>, program: ProgramId) -> Self {
        Self {
            name: name.into(),
            program,
            functions: Vec::new(),
            extends: None,
        }
    }

    /// Sets the parent service.
    #[must_use]
    pub fn extending(mut self, parent: ServiceId) -> Self {
        self.extends = Some(parent);
        self
    }

    /// Adds a function.
    #[must_use]
    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }
}

/// A service function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Argument struct.
    pub args: TypeId,
    /// Return type; `Type::Void` when nothing is returned.
    pub return_type: TypeId,
    /// Struct of declared exceptions.
    pub exceptions: TypeId,
    /// Whether the caller does not await a reply.
    #[serde(default)]
    pub oneway: bool,
}

impl Function {
    /// Creates a two-way function.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        args: TypeId,
        return_type: TypeId,
        exceptions: TypeId,
    ) -> Self {
        Self {
            name: name.into(),
            args,
            return_type,
            exceptions,
            oneway: false,
        }
    }

    /// Marks the function as oneway.
    #[must_use]
    pub fn oneway(mut self) -> Self {
        self.oneway = true;
        self
    }
}
