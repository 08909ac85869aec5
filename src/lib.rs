//! # relang
//!
//! Compile a small algebra of grammar nodes (concatenation, alternation,
//! literal, character class, named variable, repetition) into two regular
//! expressions: one that accepts exactly the grammar's strings, and one that
//! accepts every prefix of them. The second drives per-keystroke validation
//! and completion in line editors.
//!
//! ```text
//! let whitespace = charclass(r"\s")?;
//! let quoted = literal("\"") + repeat(charclass(r#"[^"]"#)?) + literal("\"");
//! let root = repeat(whitespace.clone()) + variable(quoted, "var1") + repeat(whitespace);
//!
//! let grammar = compile(&root)?;
//! assert!(grammar.match_full(r#"  "hello"  "#).is_some());
//! assert!(grammar.match_prefix(r#"  "hel"#).is_some());
//! ```
//!
//! ## Modules
//!
//! - [`grammar`]: nodes, compilation, match results and completion.
//! - [`definition`]: grammars written as YAML or JSON documents.
//! - [`config`]: layered configuration for regex limits and logging.
//! - [`telemetry`]: `tracing` subscriber setup used by the `relang` binary.

pub mod config;
pub mod definition;
pub mod grammar;
pub mod telemetry;

pub use config::{CompileOptions, RelangConfig};
pub use definition::{DefinitionError, GrammarDocument};
pub use grammar::{
    alt, charclass, compile, compile_with, literal, repeat, seq, variable, CharClass,
    CompileError, Completer, Completion, ConstructionError, Grammar, Match, MatchMode, Node,
    Variable, WordCompleter,
};
