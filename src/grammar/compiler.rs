//! The compiled grammar handle.
//!
//! [`compile`] lowers a node tree twice, once with the full-match rules and
//! once with the prefix rules, and builds a regex for each. The resulting
//! [`Grammar`] is immutable: matching only reads it, so one handle can serve
//! any number of callers and threads.

use super::error::{CompileError, PatternKind};
use super::groups::GroupTable;
use super::lower::{validate, Lowering};
use super::matcher::{Match, MatchMode};
use super::node::Node;
use crate::config::CompileOptions;
use regex::{Captures, Regex, RegexBuilder};

/// One derived pattern with the table naming its groups.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    groups: GroupTable,
}

impl CompiledPattern {
    fn build(
        kind: PatternKind,
        source: String,
        groups: GroupTable,
        options: &CompileOptions,
    ) -> Result<Self, CompileError> {
        let regex = RegexBuilder::new(&source)
            .size_limit(options.size_limit)
            .dfa_size_limit(options.dfa_size_limit)
            .nest_limit(options.nest_limit)
            .build()
            .map_err(|source| CompileError::Pattern { kind, source })?;
        Ok(Self { regex, groups })
    }

    /// The pattern text handed to the regex engine.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    fn captures<'t>(&self, input: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(input)
    }
}

/// A grammar compiled for full and prefix matching.
#[derive(Debug, Clone)]
pub struct Grammar {
    root: Node,
    full: CompiledPattern,
    prefix: CompiledPattern,
}

/// Compile `root` with the regex engine's default limits.
pub fn compile(root: &Node) -> Result<Grammar, CompileError> {
    compile_with(root, &CompileOptions::default())
}

/// Compile `root` with explicit regex limits.
pub fn compile_with(root: &Node, options: &CompileOptions) -> Result<Grammar, CompileError> {
    if let Err(err) = validate(root) {
        tracing::debug!(error = %err, "rejected grammar tree");
        return Err(err);
    }

    let (full_source, full_groups) = Lowering::full_pattern(root);
    let (prefix_source, prefix_groups) = Lowering::prefix_pattern(root);

    let built = CompiledPattern::build(PatternKind::Full, full_source, full_groups, options)
        .and_then(|full| {
            CompiledPattern::build(PatternKind::Prefix, prefix_source, prefix_groups, options)
                .map(|prefix| (full, prefix))
        });
    let (full, prefix) = match built {
        Ok(patterns) => patterns,
        Err(err) => {
            tracing::debug!(error = %err, "regex engine refused derived pattern");
            return Err(err);
        }
    };

    tracing::debug!(
        full = full.as_str(),
        prefix = prefix.as_str(),
        full_groups = full.groups.len(),
        prefix_groups = prefix.groups.len(),
        "compiled grammar"
    );

    Ok(Grammar {
        root: root.clone(),
        full,
        prefix,
    })
}

impl Grammar {
    /// Match `input` as a complete, finished string.
    pub fn match_full<'g, 't>(&'g self, input: &'t str) -> Option<Match<'g, 't>> {
        self.run(MatchMode::Full, input)
    }

    /// Match `input` as a possibly unfinished prefix of some accepted string.
    ///
    /// An input that is already a full match is reported through the
    /// full-match pattern, so both modes extract the same variables from it.
    pub fn match_prefix<'g, 't>(&'g self, input: &'t str) -> Option<Match<'g, 't>> {
        self.run(MatchMode::Prefix, input)
    }

    fn run<'g, 't>(&'g self, mode: MatchMode, input: &'t str) -> Option<Match<'g, 't>> {
        let mut pattern = &self.full;
        let mut captures = self.full.captures(input);
        if captures.is_none() && mode == MatchMode::Prefix {
            pattern = &self.prefix;
            captures = self.prefix.captures(input);
        }
        tracing::trace!(
            ?mode,
            input_len = input.len(),
            accepted = captures.is_some(),
            complete = std::ptr::eq(pattern, &self.full),
            "matched input"
        );
        captures.map(|captures| Match::new(self, mode, pattern, input, captures))
    }

    pub(crate) fn full_pattern(&self) -> &CompiledPattern {
        &self.full
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The anchored full-match pattern.
    pub fn pattern(&self) -> &str {
        self.full.as_str()
    }

    /// The anchored prefix-match pattern.
    pub fn prefix_pattern(&self) -> &str {
        self.prefix.as_str()
    }

    /// Group names of the full-match pattern.
    pub fn groups(&self) -> &GroupTable {
        &self.full.groups
    }

    /// Group names of the prefix-match pattern.
    pub fn prefix_groups(&self) -> &GroupTable {
        &self.prefix.groups
    }

    /// Variable nodes of the grammar, pre-order.
    pub fn variables(&self) -> Vec<Node> {
        self.root.variables()
    }
}
