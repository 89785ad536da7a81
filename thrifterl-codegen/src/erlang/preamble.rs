//! Fixed text shared by every generated file.

/// Banner at the top of every generated `.erl` and constants file.
#[must_use]
pub fn autogen_comment() -> String {
    format!(
        "%%\n\
         %% Autogenerated by thrifterl ({})\n\
         %%\n\
         %% DO NOT EDIT UNLESS YOU ARE SURE THAT YOU KNOW WHAT YOU ARE DOING\n\
         %%\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Include guard opening a header file.
#[must_use]
pub fn hrl_header(name: &str) -> String {
    format!("-ifndef(_{name}_included).\n-define(_{name}_included, 42).\n")
}

/// Include guard closing a header file.
#[must_use]
pub const fn hrl_footer() -> &'static str {
    "-endif."
}

/// An `-include` directive.
#[must_use]
pub fn include(file: &str) -> String {
    format!("-include(\"{file}\").\n")
}

/// Accumulates `name/arity` entries for an `-export` attribute.
#[derive(Debug, Clone, Default)]
pub struct ExportList {
    entries: Vec<String>,
}

impl ExportList {
    /// Creates an empty export list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function.
    pub fn add(&mut self, name: &str, arity: usize) {
        self.entries.push(format!("{name}/{arity}"));
    }

    /// Renders the `-export` attribute.
    #[must_use]
    pub fn render(&self) -> String {
        format!("-export([{}]).\n", self.entries.join(", "))
    }
}

/// Opening of a generated module: banner, `-module` and its own header.
#[must_use]
pub fn module_header(module: &str, behaviour: Option<&str>) -> String {
    let mut output = autogen_comment();
    output.push('\n');
    output.push_str(&format!("-module({module}).\n"));
    if let Some(behaviour) = behaviour {
        output.push_str(&format!("-behaviour({behaviour}).\n\n"));
    }
    output.push('\n');
    output.push_str(&include(&format!("{module}.hrl")));
    output.push('\n');
    output
}
