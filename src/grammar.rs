//! Grammar-node algebra and its compilation to full-match and prefix-match
//! regular expressions.
//!
//! ## Pipeline
//!
//! ```text
//! Node tree ──validate──► full lowering   ──► Regex + GroupTable ─┐
//!                    └──► prefix lowering ──► Regex + GroupTable ─┴► Grammar
//! Grammar::match_full / match_prefix ──► Match ──► spans, values, variables
//! ```
//!
//! Nodes are built with the combinators in [`node`]. [`compile`] validates
//! the tree, lowers it twice and hands both patterns to the `regex` crate.
//! The prefix lowering is what makes incremental validation possible: the
//! prefix pattern accepts exactly the strings that can still be extended
//! into a full match.

pub mod char_class;
pub mod completion;
pub mod compiler;
pub mod error;
pub mod groups;
mod lower;
pub mod matcher;
pub mod node;
mod prefix;

pub use char_class::CharClass;
pub use completion::{Completer, Completion, WordCompleter};
pub use compiler::{compile, compile_with, CompiledPattern, Grammar};
pub use error::{CompileError, ConstructionError, PatternKind};
pub use groups::GroupTable;
pub use matcher::{Match, MatchMode, VariableMatch};
pub use node::{
    alt, charclass, literal, repeat, seq, variable, Node, NodeKind, Sequence, Transform, Variable,
};
