//! Erlang literal terms.
//!
//! [`Literal`] is the output of constant rendering; [`DefaultValue`] adds the
//! synthesized empty aggregates and the absent sentinel used for record
//! field baselines and extended descriptors.

use std::fmt;
use thrifterl_model::naming::{escape_string, quote_atom};

/// A rendered constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer.
    Integer(i64),
    /// Float.
    Float(f64),
    /// Boolean atom.
    Bool(bool),
    /// Binary string.
    String(String),
    /// Quoted atom, used for enum values.
    Atom(String),
    /// Record with the explicitly assigned fields.
    Record {
        /// Record name.
        name: String,
        /// Assigned fields, in source order.
        fields: Vec<(String, Literal)>,
    },
    /// Map, in source order.
    Map(Vec<(Literal, Literal)>),
    /// Ordered set built from a literal sequence.
    Set(Vec<Literal>),
    /// List.
    List(Vec<Literal>),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(d) => f.write_str(&format_float(*d)),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Self::Atom(a) => f.write_str(&quote_atom(a)),
            Self::Record { name, fields } => {
                write!(f, "#{name}{{")?;
                write_joined(f, fields, |f, (field, value)| write!(f, "{field} = {value}"))?;
                f.write_str("}")
            }
            Self::Map(pairs) => {
                f.write_str("#{")?;
                write_joined(f, pairs, |f, (k, v)| write!(f, "{k}=>{v}"))?;
                f.write_str("}")
            }
            Self::Set(elems) => {
                f.write_str("ordsets:from_list([")?;
                write_joined(f, elems, |f, e| write!(f, "{e}"))?;
                f.write_str("])")
            }
            Self::List(elems) => {
                f.write_str("[")?;
                write_joined(f, elems, |f, e| write!(f, "{e}"))?;
                f.write_str("]")
            }
        }
    }
}

fn write_joined<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

/// Formats a float so Erlang reads it back as a float.
fn format_float(d: f64) -> String {
    let s = format!("{d}");
    if s.contains('.') { s } else { s + ".0" }
}

/// Kind of empty aggregate synthesized for a required field without a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyAggregate {
    /// Empty record of the named struct.
    Record(String),
    /// Empty map.
    Map,
    /// Empty ordered set.
    Set,
    /// Empty list.
    List,
}

/// A field's materialized default.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Rendered explicit default.
    Explicit(Literal),
    /// Synthesized empty aggregate.
    Empty(EmptyAggregate),
    /// No default.
    Absent,
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(literal) => write!(f, "{literal}"),
            Self::Empty(EmptyAggregate::Record(name)) => write!(f, "#{name}{{}}"),
            Self::Empty(EmptyAggregate::Map) => f.write_str("#{}"),
            Self::Empty(EmptyAggregate::Set) => f.write_str("ordsets:new()"),
            Self::Empty(EmptyAggregate::List) => f.write_str("[]"),
            Self::Absent => f.write_str("undefined"),
        }
    }
}
