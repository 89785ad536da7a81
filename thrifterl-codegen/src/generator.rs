//! Main code generator.

use crate::erlang::{
    ConstRenderer, Descriptor, DescriptorBuilder, EnumGenerator, RecordGenerator, ServiceGenerator,
    ServiceTable, TypespecGenerator, preamble, records,
};
use crate::error::CodegenError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thrifterl_model::naming::uncapitalize;
use thrifterl_model::{Model, Program, ProgramId, ServiceId};
use tracing::{debug, info};

/// A generated file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name, without directory.
    pub file_name: String,
    /// File contents.
    pub contents: String,
}

impl Artifact {
    fn new(file_name: impl Into<String>, contents: String) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }
}

/// Struct descriptors keyed by lowercased struct name.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    entries: Vec<(String, Descriptor)>,
}

impl DescriptorTable {
    /// Looks up the descriptor of a struct.
    ///
    /// Lookup ignores case, matching the atoms emitted for the clauses.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        let key = name.to_lowercase();
        self.entries.iter().find(|(n, _)| *n == key).map(|(_, d)| d)
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: &str, descriptor: Descriptor) {
        self.entries.push((name.to_lowercase(), descriptor));
    }
}

/// Files generated for one service.
#[derive(Debug, Clone)]
pub struct ServiceArtifacts {
    /// Service id.
    pub id: ServiceId,
    /// `<ns><svc>_service.hrl`.
    pub header: Artifact,
    /// `<ns><svc>_service.erl`.
    pub module: Artifact,
    /// In-memory descriptor table.
    pub table: ServiceTable,
}

/// Everything generated for one program.
#[derive(Debug, Clone)]
pub struct ProgramArtifacts {
    /// `<ns><prog>_types.hrl`.
    pub types_hrl: Artifact,
    /// `<ns><prog>_types.erl`.
    pub types_erl: Artifact,
    /// `<ns><prog>_constants.hrl`.
    pub constants_hrl: Artifact,
    /// One entry per service, in declaration order.
    pub services: Vec<ServiceArtifacts>,
    /// `struct_info/1` descriptors.
    pub struct_info: DescriptorTable,
    /// `struct_info_ext/1` descriptors.
    pub struct_info_ext: DescriptorTable,
}

impl ProgramArtifacts {
    /// Iterates every file artifact.
    pub fn files(&self) -> impl Iterator<Item = &Artifact> {
        [&self.types_hrl, &self.types_erl, &self.constants_hrl]
            .into_iter()
            .chain(self.services.iter().flat_map(|s| [&s.header, &s.module]))
    }

    /// Writes every file into `dir`, which must already exist.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` on the first failed write.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        let mut written = Vec::new();
        for artifact in self.files() {
            let path = dir.join(&artifact.file_name);
            std::fs::write(&path, &artifact.contents)?;
            debug!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

/// Main code generator.
pub struct Generator<'a> {
    model: &'a Model,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for the given model.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Generates every program in the model.
    ///
    /// # Errors
    /// Returns the first generation error.
    pub fn generate_all(&self) -> Result<Vec<ProgramArtifacts>, CodegenError> {
        self.model
            .programs()
            .map(|(id, _)| self.generate_program(id))
            .collect()
    }

    /// Generates the files of one program.
    ///
    /// # Errors
    /// Returns the first rendering error, tagged with the offending entity.
    pub fn generate_program(&self, id: ProgramId) -> Result<ProgramArtifacts, CodegenError> {
        let program = self.model.program(id)?;
        let types_module = program.types_module();
        info!(program = %program.name, module = %types_module, "generating program");

        let enums = EnumGenerator::new(self.model);
        let records = RecordGenerator::new(self.model);
        let descriptors = DescriptorBuilder::new(self.model);

        let mut hrl = preamble::hrl_header(&types_module);
        for include in &program.includes {
            hrl.push_str(&preamble::include(&format!(
                "{}.hrl",
                self.model.types_module(*include)?
            )));
        }
        if !program.includes.is_empty() {
            hrl.push('\n');
        }
        hrl.push('\n');

        let mut enum_info = String::new();
        for enum_id in &program.enums {
            let enum_def = enums.enum_def(*enum_id)?;
            enums
                .emit_defines(&mut hrl, program, enum_def)
                .map_err(|e| e.in_entity(&enum_def.name))?;
            enums.emit_enum_info(&mut enum_info, enum_def);
        }

        let mut info = String::new();
        let mut info_ext = String::new();
        let mut struct_info = DescriptorTable::default();
        let mut struct_info_ext = DescriptorTable::default();
        for struct_id in &program.structs {
            let struct_def = self.model.struct_def(*struct_id)?;
            let name = uncapitalize(&struct_def.name);
            let tag = |e: CodegenError| e.in_entity(&struct_def.name);

            records.emit_record(&mut hrl, struct_def).map_err(tag)?;

            let plain = descriptors.describe_struct(struct_def, false).map_err(tag)?;
            let extended = descriptors.describe_struct(struct_def, true).map_err(tag)?;
            records::emit_info_clause(&mut info, "struct_info", &name, &plain);
            records::emit_info_clause(&mut info_ext, "struct_info_ext", &name, &extended);
            struct_info.insert(&name, plain);
            struct_info_ext.insert(&name, extended);
        }
        hrl.push_str(preamble::hrl_footer());

        let types_erl = self.types_module_text(&types_module, &enum_info, &info, &info_ext);
        let constants_hrl = self.constants_text(program)?;

        let mut services = Vec::with_capacity(program.services.len());
        for service_id in &program.services {
            services.push(self.generate_service(*service_id)?);
        }

        Ok(ProgramArtifacts {
            types_hrl: Artifact::new(format!("{types_module}.hrl"), hrl),
            types_erl: Artifact::new(format!("{types_module}.erl"), types_erl),
            constants_hrl: Artifact::new(
                format!("{}{}_constants.hrl", program.module_prefix(), program.erl_name()),
                constants_hrl,
            ),
            services,
            struct_info,
            struct_info_ext,
        })
    }

    fn types_module_text(
        &self,
        module: &str,
        enum_info: &str,
        info: &str,
        info_ext: &str,
    ) -> String {
        let mut exports = preamble::ExportList::new();
        exports.add("enum_info", 1);
        exports.add("struct_info", 1);
        exports.add("struct_info_ext", 1);

        let mut output = preamble::module_header(module, None);
        output.push_str(&TypespecGenerator::descriptor_types(true));
        output.push_str("-type enum_value_info() :: {atom(), integer()}.\n\n");
        output.push_str(&exports.render());
        output.push('\n');

        output.push_str("-spec enum_info(atom()) -> {enum, [enum_value_info()]}.\n\n");
        output.push_str(enum_info);
        output.push_str("enum_info('i am a dummy enum') -> undefined.\n\n");

        output.push_str("-spec struct_info(atom()) -> {struct, [struct_field_info()]}.\n\n");
        output.push_str(info);
        output.push_str("struct_info('i am a dummy struct') -> undefined.\n\n");

        output.push_str(
            "-spec struct_info_ext(atom()) -> {struct, [struct_field_info_ext()]}.\n\n",
        );
        output.push_str(info_ext);
        output.push_str("struct_info_ext('i am a dummy struct') -> undefined.\n\n");
        output
    }

    fn constants_text(&self, program: &Program) -> Result<String, CodegenError> {
        let mut output = preamble::autogen_comment();
        output.push('\n');
        output.push_str(&preamble::include(&format!("{}.hrl", program.types_module())));
        output.push('\n');
        ConstRenderer::new(self.model).emit_constants(&mut output, program)?;
        Ok(output)
    }

    fn generate_service(&self, id: ServiceId) -> Result<ServiceArtifacts, CodegenError> {
        let service = self.model.service(id)?;
        let generator = ServiceGenerator::new(self.model);
        let module = generator.service_module(id)?;
        info!(service = %service.name, module = %module, "generating service");

        let table = ServiceTable::build(self.model, id)?;

        let mut header = String::new();
        generator
            .emit_header(&mut header, id)
            .map_err(|e| e.in_entity(&service.name))?;
        let mut body = String::new();
        generator
            .emit_module(&mut body, id, &table)
            .map_err(|e| e.in_entity(&service.name))?;

        Ok(ServiceArtifacts {
            id,
            header: Artifact::new(format!("{module}.hrl"), header),
            module: Artifact::new(format!("{module}.erl"), body),
            table,
        })
    }
}

/// Groups every artifact of a run by file name.
#[must_use]
pub fn index_by_file(programs: &[ProgramArtifacts]) -> HashMap<&str, &Artifact> {
    programs
        .iter()
        .flat_map(ProgramArtifacts::files)
        .map(|a| (a.file_name.as_str(), a))
        .collect()
}
