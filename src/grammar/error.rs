//! Error types for grammar construction and compilation.
//!
//! Both kinds of error surface at build time, before any input is matched.
//! Rejecting an input is not an error: matching returns `Option`.

use std::fmt;
use thiserror::Error;

/// Errors raised while building grammar nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// The class expression was the empty string.
    #[error("character class expression is empty")]
    EmptyClass,

    /// The expression is not a single atomic character class.
    #[error("`{expr}` is not a single character class")]
    NotAClass { expr: String },

    /// The expression carries a quantifier after the class.
    #[error("quantifier `{quantifier}` is not allowed in character class `{expr}`")]
    Quantifier { expr: String, quantifier: char },

    /// The regex engine refused the class expression.
    #[error("character class `{expr}` is malformed: {message}")]
    Syntax { expr: String, message: String },

    /// No named class is registered under this name.
    #[error("unknown character class name `{0}`")]
    UnknownClassName(String),

    /// An n-ary constructor was given fewer than two children.
    #[error("{kind} needs at least two children, got {count}")]
    TooFewChildren { kind: &'static str, count: usize },
}

/// Which of the two derived patterns an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Full,
    Prefix,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Full => write!(f, "full-match"),
            PatternKind::Prefix => write!(f, "prefix-match"),
        }
    }
}

/// Errors raised while compiling a node tree into a [`Grammar`](super::Grammar).
#[derive(Debug, Error)]
pub enum CompileError {
    /// A hand-built `Sequence` or `Any` has fewer than two children.
    #[error("{kind} node has {count} children; at least two are required")]
    TooFewChildren { kind: &'static str, count: usize },

    /// A literal sequence holds something other than character classes.
    #[error("literal {text:?} contains a node that is not a character class")]
    LiteralChild { text: String },

    /// The regex engine refused a derived pattern.
    #[error("failed to build the {kind} pattern: {source}")]
    Pattern {
        kind: PatternKind,
        #[source]
        source: regex::Error,
    },
}
