//! Service descriptor tables.
//!
//! Each service gets a table of `(function, info kind)` entries. Lookups
//! that miss fall back to the parent service's table, and finally to
//! [`Lookup::NoSuchFunction`].

use crate::erlang::descriptor::{Descriptor, DescriptorBuilder};
use crate::erlang::preamble::{self, ExportList};
use crate::erlang::typespec::TypespecGenerator;
use crate::error::CodegenError;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thrifterl_model::naming::{capitalize, quote_atom, uncapitalize};
use thrifterl_model::{Function, Model, ServiceId, Type};
use tracing::{debug, warn};

/// The three descriptor kinds recorded per function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKind {
    /// Argument struct.
    Params,
    /// Return value.
    Reply,
    /// Declared exceptions.
    Exceptions,
}

impl InfoKind {
    /// All kinds, in emission order.
    pub const ALL: [Self; 3] = [Self::Params, Self::Reply, Self::Exceptions];

    /// Returns the atom naming this kind in `function_info/2`.
    #[must_use]
    pub const fn atom(&self) -> &'static str {
        match self {
            Self::Params => "params_type",
            Self::Reply => "reply_type",
            Self::Exceptions => "exceptions",
        }
    }
}

/// Descriptor entry for one function and kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionInfo {
    /// A structural descriptor.
    Type(Descriptor),
    /// Reply of a oneway function returning void.
    OnewayVoid,
}

impl FunctionInfo {
    /// Renders the entry as an Erlang term.
    #[must_use]
    pub fn render(&self, indent: usize) -> String {
        match self {
            Self::Type(descriptor) => descriptor.render(indent),
            Self::OnewayVoid => "oneway_void".to_string(),
        }
    }
}

impl fmt::Display for FunctionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

/// Result of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Entry found in the service or one of its ancestors.
    Found(&'a FunctionInfo),
    /// No service in the chain declares the function.
    NoSuchFunction,
}

/// One row of a service table.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntry {
    /// Function name.
    pub function: String,
    /// Info kind.
    pub kind: InfoKind,
    /// Descriptor.
    pub info: FunctionInfo,
}

/// Descriptor table of a single service.
#[derive(Debug, Clone)]
pub struct ServiceTable {
    /// Service name.
    pub name: String,
    /// Parent service, consulted when a lookup misses.
    pub parent: Option<ServiceId>,
    /// Entries, three per function, in declaration order.
    pub entries: Vec<ServiceEntry>,
}

impl ServiceTable {
    /// Builds the table of a service.
    ///
    /// # Errors
    /// Propagates descriptor errors, tagged with the function name.
    pub fn build(model: &Model, service: ServiceId) -> Result<Self, CodegenError> {
        let service = model.service(service)?;
        let builder = DescriptorBuilder::new(model);
        let mut entries = Vec::with_capacity(service.functions.len() * InfoKind::ALL.len());

        for function in &service.functions {
            for kind in InfoKind::ALL {
                let info = function_info(model, &builder, function, kind)
                    .map_err(|e| e.in_entity(format!("{}.{}", service.name, function.name)))?;
                entries.push(ServiceEntry {
                    function: function.name.clone(),
                    kind,
                    info,
                });
            }
        }

        Ok(Self {
            name: service.name.clone(),
            parent: service.extends,
            entries,
        })
    }

    /// Looks up an entry declared by this service only.
    #[must_use]
    pub fn get(&self, function: &str, kind: InfoKind) -> Option<&FunctionInfo> {
        self.entries
            .iter()
            .find(|e| e.function == function && e.kind == kind)
            .map(|e| &e.info)
    }
}

fn function_info(
    model: &Model,
    builder: &DescriptorBuilder<'_>,
    function: &Function,
    kind: InfoKind,
) -> Result<FunctionInfo, CodegenError> {
    match kind {
        InfoKind::Params => Ok(FunctionInfo::Type(
            builder.describe_struct(model.struct_def(model.resolve(function.args)?)?, false)?,
        )),
        InfoKind::Exceptions => Ok(FunctionInfo::Type(
            builder.describe_struct(model.struct_def(model.resolve(function.exceptions)?)?, false)?,
        )),
        InfoKind::Reply => match model.true_type(function.return_type)? {
            Type::Void if function.oneway => Ok(FunctionInfo::OnewayVoid),
            Type::Void => Ok(FunctionInfo::Type(Descriptor::empty_struct())),
            _ => Ok(FunctionInfo::Type(builder.describe(function.return_type, false, false)?)),
        },
    }
}

/// Tables of every service in a model, with inheritance-aware lookup.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    tables: HashMap<ServiceId, ServiceTable>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the tables of every service in the model.
    ///
    /// # Errors
    /// Returns the first table construction error.
    pub fn build(model: &Model) -> Result<Self, CodegenError> {
        let mut registry = Self::new();
        for (id, _) in model.services() {
            registry.insert(id, ServiceTable::build(model, id)?);
        }
        Ok(registry)
    }

    /// Adds or replaces a table.
    pub fn insert(&mut self, id: ServiceId, table: ServiceTable) {
        self.tables.insert(id, table);
    }

    /// Looks up `(function, kind)` on `service`, delegating to ancestors.
    ///
    /// # Errors
    /// Returns `CodegenError::CyclicInheritance` if the chain loops and
    /// `ModelError::UnknownServiceId` if a service has no table.
    pub fn lookup(
        &self,
        service: ServiceId,
        function: &str,
        kind: InfoKind,
    ) -> Result<Lookup<'_>, CodegenError> {
        let mut visited = HashSet::new();
        let mut current = Some(service);

        while let Some(id) = current {
            let table = self
                .tables
                .get(&id)
                .ok_or(thrifterl_model::ModelError::UnknownServiceId { id: id.0 })?;
            if !visited.insert(id) {
                return Err(CodegenError::CyclicInheritance {
                    service: table.name.clone(),
                });
            }
            if let Some(info) = table.get(function, kind) {
                return Ok(Lookup::Found(info));
            }
            current = table.parent;
        }

        Ok(Lookup::NoSuchFunction)
    }
}

/// Generator for service header and module files.
pub struct ServiceGenerator<'a> {
    model: &'a Model,
}

impl<'a> ServiceGenerator<'a> {
    /// Creates a new service generator.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Returns the module name of a service.
    ///
    /// # Errors
    /// Returns a model error if the service or its program does not exist.
    pub fn service_module(&self, id: ServiceId) -> Result<String, CodegenError> {
        let service = self.model.service(id)?;
        let program = self.model.program(service.program)?;
        Ok(format!(
            "{}{}_service",
            program.module_prefix(),
            uncapitalize(&service.name)
        ))
    }

    /// Emits the service header.
    ///
    /// # Errors
    /// Returns a model error if a referenced service or program does not exist.
    pub fn emit_header(&self, out: &mut String, id: ServiceId) -> Result<(), CodegenError> {
        let service = self.model.service(id)?;
        let program = self.model.program(service.program)?;
        let module = self.service_module(id)?;

        out.push_str(&preamble::hrl_header(&module));
        out.push_str(&preamble::include(&format!("{}.hrl", program.types_module())));

        if let Some(parent) = service.extends {
            let parent_module = self.service_module(parent)?;
            if self.model.service(parent)?.program != service.program {
                warn!(
                    service = %service.name,
                    parent = %parent_module,
                    "service inherits across programs"
                );
            }
            out.push_str(&format!("-include(\"{parent_module}.hrl\"). % inherit \n"));
        }

        out.push_str(preamble::hrl_footer());
        Ok(())
    }

    /// Emits the service module with its `function_info/2` clauses.
    ///
    /// # Errors
    /// Returns a model error if a referenced service or program does not exist.
    pub fn emit_module(
        &self,
        out: &mut String,
        id: ServiceId,
        table: &ServiceTable,
    ) -> Result<(), CodegenError> {
        let service = self.model.service(id)?;
        let module = self.service_module(id)?;
        debug!(service = %service.name, functions = service.functions.len(), "rendering service");

        let mut exports = ExportList::new();
        exports.add("function_info", 2);

        out.push_str(&preamble::module_header(&module, Some("thrift_service")));
        out.push_str(&exports.render());
        out.push('\n');

        out.push_str(&TypespecGenerator::descriptor_types(false));
        out.push_str("-type function_info() :: params_type | reply_type | exceptions.\n\n");
        out.push_str(
            "-spec function_info(atom(), function_info()) -> \
             {struct, [struct_field_info()]} | no_function.\n\n",
        );

        out.push_str("%%% interface\n");
        for function in &service.functions {
            out.push_str(&format!("% {}\n", self.signature(function)?));
            for kind in InfoKind::ALL {
                if let Some(info) = table.get(&function.name, kind) {
                    out.push_str(&format!(
                        "function_info({}, {}) ->\n",
                        quote_atom(&function.name),
                        kind.atom()
                    ));
                    out.push_str(&format!("    {};\n\n", info.render(4)));
                }
            }
        }

        match table.parent {
            Some(parent) => {
                out.push_str("function_info(Function, InfoType) ->\n");
                out.push_str(&format!(
                    "    {}:function_info(Function, InfoType).\n\n",
                    self.service_module(parent)?
                ));
            }
            None => out.push_str("function_info(_Func, _Info) -> no_function.\n\n"),
        }
        Ok(())
    }

    /// Renders `name(This, Arg1, ...)` for the interface comment.
    fn signature(&self, function: &Function) -> Result<String, CodegenError> {
        let args = self.model.struct_def(self.model.resolve(function.args)?)?;
        let mut signature = format!("{}(This", function.name);
        for field in &args.fields {
            signature.push_str(", ");
            signature.push_str(&capitalize(&field.name));
        }
        signature.push(')');
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrifterl_model::{BaseType, Field, Program, ProgramId, Service, StructDef, TypeId};

    struct Fixture {
        model: Model,
        program: ProgramId,
        i32_ty: TypeId,
        void: TypeId,
        no_exceptions: TypeId,
    }

    fn fixture() -> Fixture {
        let mut model = Model::new();
        let program = model.add_program(Program::new("calc"));
        let i32_ty = model.add_type(Type::Base(BaseType::I32));
        let void = model.add_type(Type::Void);
        let no_exceptions = model
            .add_struct(StructDef::new("no_exceptions", program))
            .expect("add struct");
        Fixture {
            model,
            program,
            i32_ty,
            void,
            no_exceptions,
        }
    }

    fn args(fx: &mut Fixture, name: &str, n: usize) -> TypeId {
        let mut def = StructDef::new(name, fx.program);
        for i in 0..n {
            def = def.with_field(Field::new(i as i32 + 1, format!("num{}", i + 1), fx.i32_ty));
        }
        fx.model.add_struct(def).expect("add struct")
    }

    fn add_service(
        fx: &mut Fixture,
        name: &str,
        functions: &[&str],
        parent: Option<ServiceId>,
    ) -> ServiceId {
        let mut service = Service::new(name, fx.program);
        for function in functions {
            let args = args(fx, &format!("{function}_args"), 2);
            service =
                service.with_function(Function::new(*function, args, fx.i32_ty, fx.no_exceptions));
        }
        if let Some(parent) = parent {
            service = service.extending(parent);
        }
        fx.model.add_service(service).expect("add service")
    }

    #[test]
    fn test_table_entries() {
        let mut fx = fixture();
        let add_args = args(&mut fx, "add_args", 2);
        let ping_args = args(&mut fx, "ping_args", 0);
        let service = fx
            .model
            .add_service(
                Service::new("Calculator", fx.program)
                    .with_function(Function::new("add", add_args, fx.i32_ty, fx.no_exceptions))
                    .with_function(
                        Function::new("zip", ping_args, fx.void, fx.no_exceptions).oneway(),
                    )
                    .with_function(Function::new("ping", ping_args, fx.void, fx.no_exceptions)),
            )
            .expect("add service");

        let table = ServiceTable::build(&fx.model, service).expect("build");
        assert_eq!(table.entries.len(), 9);
        assert_eq!(
            table.get("add", InfoKind::Reply),
            Some(&FunctionInfo::Type(Descriptor::Base(BaseType::I32)))
        );
        assert_eq!(table.get("zip", InfoKind::Reply), Some(&FunctionInfo::OnewayVoid));
        assert_eq!(
            table.get("ping", InfoKind::Reply),
            Some(&FunctionInfo::Type(Descriptor::empty_struct()))
        );
        assert_eq!(
            table.get("add", InfoKind::Params).map(ToString::to_string).as_deref(),
            Some("{struct, [\n    {1, i32},\n    {2, i32}\n]}")
        );
        assert_eq!(
            table.get("add", InfoKind::Exceptions).map(ToString::to_string).as_deref(),
            Some("{struct, []}")
        );
    }

    #[test]
    fn test_lookup_delegates_through_chain() {
        let mut fx = fixture();
        let c = add_service(&mut fx, "C", &["f"], None);
        let b = add_service(&mut fx, "B", &["g"], Some(c));
        let a = add_service(&mut fx, "A", &[], Some(b));
        let registry = ServiceRegistry::build(&fx.model).expect("registry");

        let from_a = registry.lookup(a, "f", InfoKind::Params).expect("lookup");
        let from_c = registry.lookup(c, "f", InfoKind::Params).expect("lookup");
        assert!(matches!(from_a, Lookup::Found(_)));
        assert_eq!(from_a, from_c);

        assert!(matches!(
            registry.lookup(a, "g", InfoKind::Reply).expect("lookup"),
            Lookup::Found(_)
        ));
        assert_eq!(
            registry.lookup(c, "g", InfoKind::Params).expect("lookup"),
            Lookup::NoSuchFunction
        );
        assert_eq!(
            registry.lookup(a, "missing", InfoKind::Exceptions).expect("lookup"),
            Lookup::NoSuchFunction
        );
    }

    #[test]
    fn test_lookup_guards_against_cycles() {
        let mut fx = fixture();
        let a = add_service(&mut fx, "A", &[], Some(ServiceId(1)));
        let _b = add_service(&mut fx, "B", &[], Some(a));
        let registry = ServiceRegistry::build(&fx.model).expect("registry");

        assert!(matches!(
            registry.lookup(a, "f", InfoKind::Params),
            Err(CodegenError::CyclicInheritance { .. })
        ));
    }

    #[test]
    fn test_lookup_unknown_service() {
        let registry = ServiceRegistry::new();
        assert!(matches!(
            registry.lookup(ServiceId(3), "f", InfoKind::Params),
            Err(CodegenError::Model(_))
        ));
    }

    #[test]
    fn test_void_in_params_names_function() {
        let mut fx = fixture();
        let bad_args = fx
            .model
            .add_struct(
                StructDef::new("bad_args", fx.program).with_field(Field::new(1, "v", fx.void)),
            )
            .expect("add struct");
        let service = fx
            .model
            .add_service(
                Service::new("Bad", fx.program)
                    .with_function(Function::new("f", bad_args, fx.void, fx.no_exceptions)),
            )
            .expect("add service");

        let err = ServiceTable::build(&fx.model, service).expect_err("should fail");
        assert!(matches!(&err, CodegenError::Entity { entity, .. } if entity == "Bad.f"));
        assert!(matches!(err.root(), CodegenError::UnsupportedType { .. }));
    }

    #[test]
    fn test_emit_module_with_parent() {
        let mut fx = fixture();
        let shared = add_service(&mut fx, "SharedService", &["getStruct"], None);
        let calc = add_service(&mut fx, "Calculator", &["add"], Some(shared));
        let generator = ServiceGenerator::new(&fx.model);
        let table = ServiceTable::build(&fx.model, calc).expect("build");

        let mut out = String::new();
        generator.emit_module(&mut out, calc, &table).expect("emit");

        assert!(out.contains("-module(calculator_service).\n-behaviour(thrift_service).\n"));
        assert!(out.contains("-export([function_info/2]).\n"));
        assert!(out.contains("% add(This, Num1, Num2)\n"));
        assert!(out.contains(
            "function_info('add', params_type) ->\n    {struct, [\n        \
             {1, i32},\n        {2, i32}\n    ]};\n"
        ));
        assert!(out.contains("function_info('add', reply_type) ->\n    i32;\n"));
        assert!(out.contains("function_info('add', exceptions) ->\n    {struct, []};\n"));
        assert!(out.contains(
            "function_info(Function, InfoType) ->\n    \
             sharedService_service:function_info(Function, InfoType).\n"
        ));
        assert!(!out.contains("-> no_function.\n"));
    }

    #[test]
    fn test_emit_module_without_parent() {
        let mut fx = fixture();
        let ping_args = args(&mut fx, "ping_args", 0);
        let service = fx
            .model
            .add_service(
                Service::new("Pinger", fx.program)
                    .with_function(
                        Function::new("ping", ping_args, fx.void, fx.no_exceptions).oneway(),
                    ),
            )
            .expect("add service");
        let generator = ServiceGenerator::new(&fx.model);
        let table = ServiceTable::build(&fx.model, service).expect("build");

        let mut out = String::new();
        generator.emit_module(&mut out, service, &table).expect("emit");

        assert!(out.contains("% ping(This)\n"));
        assert!(out.contains("function_info('ping', reply_type) ->\n    oneway_void;\n"));
        assert!(out.contains("function_info(_Func, _Info) -> no_function.\n"));
    }

    #[test]
    fn test_emit_header() {
        let mut fx = fixture();
        let base = add_service(&mut fx, "Base", &[], None);
        let derived = add_service(&mut fx, "Derived", &[], Some(base));
        let generator = ServiceGenerator::new(&fx.model);

        let mut out = String::new();
        generator.emit_header(&mut out, derived).expect("emit");
        assert_eq!(
            out,
            "-ifndef(_derived_service_included).\n\
             -define(_derived_service_included, 42).\n\
             -include(\"calc_types.hrl\").\n\
             -include(\"base_service.hrl\"). % inherit \n\
             -endif."
        );
    }
}
