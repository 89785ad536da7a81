//! Reflection descriptors.
//!
//! A descriptor is the structural term a generic encoder/decoder walks at
//! runtime. Structs are either referenced by `{Module, Name}` or expanded
//! into their field list; expansion only ever goes one level deep, so
//! self-referential struct graphs stay finite.

use crate::error::CodegenError;
use crate::erlang::defaults::DefaultDeriver;
use crate::erlang::literal::DefaultValue;
use std::fmt;
use thrifterl_model::naming::{quote_atom, uncapitalize};
use thrifterl_model::{BaseType, Model, ProgramId, Requiredness, StructDef, Type, TypeId};

/// Reference to a named type in another module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Module that defines the type.
    pub module: String,
    /// Local (uncapitalized) type name.
    pub name: String,
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", quote_atom(&self.module), quote_atom(&self.name))
    }
}

/// Structural description of a type.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// Base type tag.
    Base(BaseType),
    /// Enum reference; enums never expand.
    Enum(TypeRef),
    /// Struct reference.
    StructRef(TypeRef),
    /// Expanded struct, fields in declaration order.
    Struct(Vec<FieldDescriptor>),
    /// List of elements.
    List(Box<Descriptor>),
    /// Set of elements.
    Set(Box<Descriptor>),
    /// Map from keys to values.
    Map(Box<Descriptor>, Box<Descriptor>),
}

/// One field of an expanded struct descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field id.
    pub id: i32,
    /// Shallow descriptor of the field type.
    pub ty: Descriptor,
    /// Extra information carried by extended descriptors.
    pub ext: Option<FieldExt>,
}

/// Extended field information.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExt {
    /// Presence contract.
    pub requiredness: Requiredness,
    /// Field name as an atom.
    pub name: String,
    /// Materialized default or the absent sentinel.
    pub default: DefaultValue,
}

impl Descriptor {
    /// The descriptor of a void reply from a two-way function.
    #[must_use]
    pub const fn empty_struct() -> Self {
        Self::Struct(Vec::new())
    }

    /// Renders the descriptor as an Erlang term.
    ///
    /// Expanded structs span several lines; `indent` is the column of the
    /// line the term starts on.
    #[must_use]
    pub fn render(&self, indent: usize) -> String {
        match self {
            Self::Base(base) => base.tag().to_string(),
            Self::Enum(type_ref) => format!("{{enum, {type_ref}}}"),
            Self::StructRef(type_ref) => format!("{{struct, {type_ref}}}"),
            Self::Struct(fields) if fields.is_empty() => "{struct, []}".to_string(),
            Self::Struct(fields) => {
                let mut output = String::from("{struct, [\n");
                let pad = " ".repeat(indent + 4);
                for (i, field) in fields.iter().enumerate() {
                    output.push_str(&pad);
                    output.push_str(&field.render());
                    if i + 1 < fields.len() {
                        output.push(',');
                    }
                    output.push('\n');
                }
                output.push_str(&" ".repeat(indent));
                output.push_str("]}");
                output
            }
            Self::List(elem) => format!("{{list, {}}}", elem.render(indent)),
            Self::Set(elem) => format!("{{set, {}}}", elem.render(indent)),
            Self::Map(key, value) => {
                format!("{{map, {}, {}}}", key.render(indent), value.render(indent))
            }
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

impl FieldDescriptor {
    /// Renders the field tuple.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.ext {
            None => format!("{{{}, {}}}", self.id, self.ty.render(0)),
            Some(ext) => format!(
                "{{{}, {}, {}, {}, {}}}",
                self.id,
                ext.requiredness.atom(),
                self.ty.render(0),
                quote_atom(&ext.name),
                ext.default
            ),
        }
    }
}

/// Builds descriptors for types in a model.
pub struct DescriptorBuilder<'a> {
    model: &'a Model,
}

impl<'a> DescriptorBuilder<'a> {
    /// Creates a new descriptor builder.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Describes a type.
    ///
    /// `expand` inlines a struct's field list instead of referencing it;
    /// `extended` adds requiredness, name and default to each field. Field
    /// types are always described shallowly.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedType` for void, and propagates
    /// alias and default-rendering errors.
    pub fn describe(
        &self,
        id: TypeId,
        expand: bool,
        extended: bool,
    ) -> Result<Descriptor, CodegenError> {
        match self.model.true_type(id)? {
            Type::Base(base) => Ok(Descriptor::Base(*base)),
            Type::Enum(enum_def) => Ok(Descriptor::Enum(
                self.type_ref(enum_def.program, &enum_def.name)?,
            )),
            Type::Struct(struct_def) if expand => self.expand_struct(struct_def, extended),
            Type::Struct(struct_def) => Ok(Descriptor::StructRef(
                self.type_ref(struct_def.program, &struct_def.name)?,
            )),
            Type::List(elem) => Ok(Descriptor::List(Box::new(self.shallow(*elem)?))),
            Type::Set(elem) => Ok(Descriptor::Set(Box::new(self.shallow(*elem)?))),
            Type::Map { key, value } => Ok(Descriptor::Map(
                Box::new(self.shallow(*key)?),
                Box::new(self.shallow(*value)?),
            )),
            Type::Void => Err(CodegenError::unsupported("void", "type descriptor")),
            Type::Alias { name, .. } => {
                Err(CodegenError::unsupported(name.clone(), "type descriptor"))
            }
        }
    }

    /// Describes a struct with its fields inlined.
    ///
    /// # Errors
    /// See [`DescriptorBuilder::describe`].
    pub fn describe_struct(
        &self,
        struct_def: &StructDef,
        extended: bool,
    ) -> Result<Descriptor, CodegenError> {
        self.expand_struct(struct_def, extended)
    }

    fn shallow(&self, id: TypeId) -> Result<Descriptor, CodegenError> {
        self.describe(id, false, false)
    }

    fn expand_struct(
        &self,
        struct_def: &StructDef,
        extended: bool,
    ) -> Result<Descriptor, CodegenError> {
        let defaults = DefaultDeriver::new(self.model);
        let mut fields = Vec::with_capacity(struct_def.fields.len());

        for field in &struct_def.fields {
            let ty = self.shallow(field.ty).map_err(|e| match e {
                CodegenError::UnsupportedType { type_name, .. } => CodegenError::unsupported(
                    type_name,
                    format!("field '{}' of '{}'", field.name, struct_def.name),
                ),
                other => other,
            })?;
            let ext = if extended {
                Some(FieldExt {
                    requiredness: field.requiredness,
                    name: uncapitalize(&field.name),
                    default: defaults.render_default(field)?,
                })
            } else {
                None
            };
            fields.push(FieldDescriptor { id: field.id, ty, ext });
        }

        Ok(Descriptor::Struct(fields))
    }

    fn type_ref(&self, program: ProgramId, name: &str) -> Result<TypeRef, CodegenError> {
        Ok(TypeRef {
            module: self.model.types_module(program)?,
            name: uncapitalize(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrifterl_model::{ConstValue, EnumDef, Field, Program};

    struct Fixture {
        model: Model,
        program: ProgramId,
        i32_ty: TypeId,
    }

    fn fixture() -> Fixture {
        let mut model = Model::new();
        let program = model.add_program(Program::new("Shapes").with_namespace("geo"));
        let i32_ty = model.add_type(Type::Base(BaseType::I32));
        Fixture {
            model,
            program,
            i32_ty,
        }
    }

    fn point(fx: &mut Fixture) -> TypeId {
        fx.model
            .add_struct(
                StructDef::new("Point", fx.program)
                    .with_field(Field::new(1, "x", fx.i32_ty).required())
                    .with_field(Field::new(2, "y", fx.i32_ty).required()),
            )
            .expect("add struct")
    }

    #[test]
    fn test_base_types_ignore_flags() {
        let mut model = Model::new();
        let ids: Vec<_> = [
            BaseType::Bool,
            BaseType::Byte,
            BaseType::I16,
            BaseType::I32,
            BaseType::I64,
            BaseType::Double,
            BaseType::String,
        ]
        .into_iter()
        .map(|b| model.add_type(Type::Base(b)))
        .collect();

        let builder = DescriptorBuilder::new(&model);
        for id in ids {
            let plain = builder.describe(id, false, false).expect("describe");
            for (expand, extended) in [(true, false), (false, true), (true, true)] {
                assert_eq!(builder.describe(id, expand, extended).expect("describe"), plain);
            }
        }
    }

    #[test]
    fn test_point_plain_descriptor() {
        let mut fx = fixture();
        let point = point(&mut fx);
        let builder = DescriptorBuilder::new(&fx.model);

        let descriptor = builder.describe(point, true, false).expect("describe");
        assert_eq!(
            descriptor,
            Descriptor::Struct(vec![
                FieldDescriptor {
                    id: 1,
                    ty: Descriptor::Base(BaseType::I32),
                    ext: None
                },
                FieldDescriptor {
                    id: 2,
                    ty: Descriptor::Base(BaseType::I32),
                    ext: None
                },
            ])
        );
        assert_eq!(descriptor.render(0), "{struct, [\n    {1, i32},\n    {2, i32}\n]}");
    }

    #[test]
    fn test_point_extended_descriptor() {
        let mut fx = fixture();
        let point = point(&mut fx);
        let builder = DescriptorBuilder::new(&fx.model);

        let Descriptor::Struct(fields) = builder.describe(point, true, true).expect("describe")
        else {
            panic!("expected expanded struct");
        };
        let names: Vec<_> = fields
            .iter()
            .map(|f| f.ext.as_ref().map(|e| e.name.as_str()))
            .collect();
        assert_eq!(names, vec![Some("x"), Some("y")]);
        for field in &fields {
            let ext = field.ext.as_ref().expect("extended");
            assert_eq!(ext.requiredness, Requiredness::Required);
            assert_eq!(ext.default, DefaultValue::Absent);
        }
        assert_eq!(fields[0].render(), "{1, required, i32, 'x', undefined}");
    }

    #[test]
    fn test_extended_descriptor_is_bijective_in_declaration_order() {
        let mut fx = fixture();
        let string_ty = fx.model.add_type(Type::Base(BaseType::String));
        let record = fx
            .model
            .add_struct(
                StructDef::new("Record", fx.program)
                    .with_field(Field::new(7, "b", string_ty))
                    .with_field(Field::new(2, "a", fx.i32_ty).optional())
                    .with_field(Field::new(5, "c", fx.i32_ty)),
            )
            .expect("add struct");
        let builder = DescriptorBuilder::new(&fx.model);

        let Descriptor::Struct(fields) = builder.describe(record, true, true).expect("describe")
        else {
            panic!("expected expanded struct");
        };
        let ids: Vec<_> = fields.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![7, 2, 5]);
    }

    #[test]
    fn test_struct_reference_when_not_expanded() {
        let mut fx = fixture();
        let point = point(&mut fx);
        let builder = DescriptorBuilder::new(&fx.model);

        assert_eq!(
            builder.describe(point, false, true).expect("describe").to_string(),
            "{struct, {'geo_shapes_types', 'point'}}"
        );
    }

    #[test]
    fn test_enum_never_expands() {
        let mut fx = fixture();
        let color = fx
            .model
            .add_enum(EnumDef::new("Color", fx.program).with_value("RED", 1))
            .expect("add enum");
        let builder = DescriptorBuilder::new(&fx.model);

        assert_eq!(
            builder.describe(color, true, true).expect("describe").to_string(),
            "{enum, {'geo_shapes_types', 'color'}}"
        );
    }

    #[test]
    fn test_nested_fields_are_references() {
        let mut fx = fixture();
        let point = point(&mut fx);
        let points = fx.model.add_type(Type::List(point));
        let by_name = {
            let string_ty = fx.model.add_type(Type::Base(BaseType::String));
            fx.model.add_type(Type::Map {
                key: string_ty,
                value: point,
            })
        };
        let shape = fx
            .model
            .add_struct(
                StructDef::new("Shape", fx.program)
                    .with_field(Field::new(1, "origin", point))
                    .with_field(Field::new(2, "vertices", points))
                    .with_field(Field::new(3, "labels", by_name)),
            )
            .expect("add struct");
        let builder = DescriptorBuilder::new(&fx.model);

        let rendered = builder.describe(shape, true, false).expect("describe").to_string();
        assert_eq!(
            rendered,
            "{struct, [\n\
             \x20   {1, {struct, {'geo_shapes_types', 'point'}}},\n\
             \x20   {2, {list, {struct, {'geo_shapes_types', 'point'}}}},\n\
             \x20   {3, {map, string, {struct, {'geo_shapes_types', 'point'}}}}\n\
             ]}"
        );
    }

    #[test]
    fn test_self_referential_struct_terminates() {
        let mut fx = fixture();
        let node = TypeId(fx.model.next_type_id().0 + 1);
        let children = fx.model.add_type(Type::List(node));
        let added = fx
            .model
            .add_struct(
                StructDef::new("Node", fx.program)
                    .with_field(Field::new(1, "children", children).required()),
            )
            .expect("add struct");
        assert_eq!(added, node);
        let builder = DescriptorBuilder::new(&fx.model);

        let Descriptor::Struct(fields) = builder.describe(node, true, true).expect("describe")
        else {
            panic!("expected expanded struct");
        };
        assert!(matches!(
            &fields[0].ty,
            Descriptor::List(inner) if matches!(**inner, Descriptor::StructRef(_))
        ));
        assert_eq!(
            fields[0].render(),
            "{1, required, {list, {struct, {'geo_shapes_types', 'node'}}}, 'children', []}"
        );
    }

    #[test]
    fn test_aliases_are_transparent() {
        let mut fx = fixture();
        let alias = fx
            .model
            .add_typedef(fx.program, "Count", fx.i32_ty)
            .expect("typedef");
        let counts = fx.model.add_type(Type::Set(alias));
        let builder = DescriptorBuilder::new(&fx.model);

        assert_eq!(
            builder.describe(alias, true, true).expect("describe"),
            Descriptor::Base(BaseType::I32)
        );
        assert_eq!(
            builder
                .describe(counts, false, false)
                .expect("describe")
                .to_string(),
            "{set, i32}"
        );
    }

    #[test]
    fn test_void_in_container_is_unsupported() {
        let mut fx = fixture();
        let void = fx.model.add_type(Type::Void);
        let list = fx.model.add_type(Type::List(void));
        let builder = DescriptorBuilder::new(&fx.model);

        assert!(matches!(
            builder.describe(list, false, false),
            Err(CodegenError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_void_field_names_the_field() {
        let mut fx = fixture();
        let void = fx.model.add_type(Type::Void);
        let broken = fx
            .model
            .add_struct(
                StructDef::new("Broken", fx.program).with_field(Field::new(1, "nothing", void)),
            )
            .expect("add struct");
        let builder = DescriptorBuilder::new(&fx.model);

        match builder.describe(broken, true, false) {
            Err(CodegenError::UnsupportedType { context, .. }) => {
                assert_eq!(context, "field 'nothing' of 'Broken'");
            }
            other => panic!("expected unsupported type, got {other:?}"),
        }
    }

    #[test]
    fn test_extended_descriptor_carries_explicit_default() {
        let mut fx = fixture();
        let config = fx
            .model
            .add_struct(
                StructDef::new("Config", fx.program)
                    .with_field(
                        Field::new(1, "Retries", fx.i32_ty).with_default(ConstValue::Integer(3)),
                    ),
            )
            .expect("add struct");
        let builder = DescriptorBuilder::new(&fx.model);

        let rendered = builder.describe(config, true, true).expect("describe").render(4);
        assert_eq!(rendered, "{struct, [\n        {1, undefined, i32, 'retries', 3}\n    ]}");
    }
}
