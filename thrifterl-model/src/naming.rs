//! Identifier helpers for Erlang output.
//!
//! Program, service and type names become Erlang module, record and atom
//! names; these helpers perform the small case and escaping adjustments
//! needed for that.

use crate::error::ModelError;
use crate::model::{Model, Program};
use crate::types::ProgramId;

/// Upper-cases the first character.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character.
#[must_use]
pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a declared namespace into a module name prefix.
///
/// `.`, `-`, `/` and `\` become `_`; a non-empty result gets a trailing `_`.
#[must_use]
pub fn namespace_prefix(namespace: Option<&str>) -> String {
    let ns: String = namespace
        .unwrap_or_default()
        .chars()
        .map(|c| match c {
            '.' | '-' | '/' | '\\' => '_',
            other => other,
        })
        .collect();

    if ns.is_empty() { ns } else { ns + "_" }
}

/// Wraps a name in single quotes, escaping quotes and backslashes.
#[must_use]
pub fn quote_atom(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 2);
    result.push('\'');
    for c in name.chars() {
        if c == '\'' || c == '\\' {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('\'');
    result
}

/// Escapes a string for use inside an Erlang double-quoted literal.
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            other => result.push(other),
        }
    }
    result
}

impl Program {
    /// Returns the module name prefix derived from the namespace.
    #[must_use]
    pub fn module_prefix(&self) -> String {
        namespace_prefix(self.namespace.as_deref())
    }

    /// Returns the program name as used in macro names.
    #[must_use]
    pub fn erl_name(&self) -> String {
        uncapitalize(&self.name)
    }

    /// Returns the name of the module holding this program's types.
    #[must_use]
    pub fn types_module(&self) -> String {
        format!("{}{}_types", self.module_prefix(), self.erl_name())
    }
}

impl Model {
    /// Returns the types module of the program that owns a type.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownProgramId` if the program does not exist.
    pub fn types_module(&self, program: ProgramId) -> Result<String, ModelError> {
        Ok(self.program(program)?.types_module())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("red"), "Red");
        assert_eq!(capitalize("RED"), "RED");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_uncapitalize() {
        assert_eq!(uncapitalize("Point"), "point");
        assert_eq!(uncapitalize("HTTPRequest"), "hTTPRequest");
        assert_eq!(uncapitalize(""), "");
    }

    #[test]
    fn test_namespace_prefix() {
        assert_eq!(namespace_prefix(None), "");
        assert_eq!(namespace_prefix(Some("")), "");
        assert_eq!(namespace_prefix(Some("acme.rpc-v2/x\\y")), "acme_rpc_v2_x_y_");
    }

    #[test]
    fn test_quote_atom() {
        assert_eq!(quote_atom("point"), "'point'");
        assert_eq!(quote_atom("it's"), "'it\\'s'");
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("plain"), "plain");
        assert_eq!(escape_string("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }

    #[test]
    fn test_types_module() {
        let program = Program::new("Shared").with_namespace("acme.rpc");
        assert_eq!(program.types_module(), "acme_rpc_shared_types");
        assert_eq!(Program::new("tutorial").types_module(), "tutorial_types");
    }
}
