mod parse_directives;

use std::fmt;

pub use parse_directives::{parse_requirements, DirectiveGrammar};

/// Where a requirement prefers to be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `"name"`: favour files next to the requiring file.
    Local,
    /// `<name>`: any configured root.
    Global,
}

/// Byte range `[start, end)` in a resource's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn source_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// A directive in one resource naming another resource by base name.
///
/// The span covers the whole directive, trailing newline included, and is
/// what the required content replaces during a merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    name: Box<str>,
    scope: Scope,
    span: Span,
}

impl Requirement {
    pub fn new(name: &str, scope: Scope, span: Span) -> Self {
        Self {
            name: name.to_lowercase().into_boxed_str(),
            scope,
            span,
        }
    }

    /// The lower-cased name, compared against `Resource::base_name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Scope::Local => write!(f, "\"{}\"", self.name),
            Scope::Global => write!(f, "<{}>", self.name),
        }
    }
}
