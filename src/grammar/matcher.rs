//! Match results: mapping capture groups back to grammar nodes.
//!
//! A [`Match`] wraps one successful regex match together with the group table
//! of the pattern that produced it. Groups are resolved to nodes, spans and
//! text on demand.
//!
//! ## Resolution policy
//!
//! A node can own several group names (see [`super::prefix`]). It resolves to
//! the first allocated name whose group took part in the match, not simply to
//! the first allocated name. The names of a node sit in mutually exclusive
//! alternation branches and only the taken branch reports a span, so reading
//! the first name alone would report a node as unset whenever a later branch
//! was taken. A node none of whose groups took part is unset.
//!
//! A prefix match of an input that is already a full match carries the
//! full-match captures and table; see [`Match::is_complete`].
//!
//! Variable names need not be unique. In [`Match::variables`] a later node
//! (by first allocation) overwrites an earlier one with the same name, even
//! when the later one is unset.

use super::compiler::{CompiledPattern, Grammar};
use super::groups::GroupTable;
use super::node::{Node, Variable};
use regex::Captures;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// Which of the two derived patterns produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Full,
    Prefix,
}

/// One successful match of a grammar against an input.
#[derive(Debug)]
pub struct Match<'g, 't> {
    grammar: &'g Grammar,
    mode: MatchMode,
    pattern: &'g CompiledPattern,
    input: &'t str,
    captures: Captures<'t>,
}

/// A variable node together with what it matched.
#[derive(Debug, Clone)]
pub struct VariableMatch<'g, 't> {
    pub node: &'g Node,
    pub variable: &'g Variable,
    pub span: Range<usize>,
    /// Matched text, before the unwrap transform.
    pub text: &'t str,
}

impl<'g, 't> Match<'g, 't> {
    pub(crate) fn new(
        grammar: &'g Grammar,
        mode: MatchMode,
        pattern: &'g CompiledPattern,
        input: &'t str,
        captures: Captures<'t>,
    ) -> Self {
        Self {
            grammar,
            mode,
            pattern,
            input,
            captures,
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn input(&self) -> &'t str {
        self.input
    }

    /// Whether the input is a full match, whichever mode was asked for.
    pub fn is_complete(&self) -> bool {
        std::ptr::eq(self.pattern, self.grammar.full_pattern())
    }

    fn groups(&self) -> &'g GroupTable {
        self.pattern.groups()
    }

    /// Every node that owns a group, with its span, in first-allocation order.
    fn resolve(&self) -> Vec<(&'g Node, Option<Range<usize>>)> {
        let mut resolved: Vec<(&'g Node, Option<Range<usize>>)> = Vec::new();
        let mut position: HashMap<&'g Node, usize> = HashMap::new();
        for (name, node) in self.groups().iter() {
            let span = self.captures.name(name).map(|m| m.range());
            match position.get(node) {
                Some(&i) => {
                    if resolved[i].1.is_none() {
                        resolved[i].1 = span;
                    }
                }
                None => {
                    position.insert(node, resolved.len());
                    resolved.push((node, span));
                }
            }
        }
        resolved
    }

    /// Span of every node that owns a group; `None` when its branch was not taken.
    pub fn nodes_to_spans(&self) -> HashMap<Node, Option<Range<usize>>> {
        self.resolve()
            .into_iter()
            .map(|(node, span)| (node.clone(), span))
            .collect()
    }

    /// Matched text of every node that owns a group.
    pub fn nodes_to_values(&self) -> HashMap<Node, Option<&'t str>> {
        let input = self.input;
        self.resolve()
            .into_iter()
            .map(|(node, span)| (node.clone(), span.map(|s| &input[s])))
            .collect()
    }

    /// Variable name to unwrapped text; `None` for variables outside the taken branch.
    pub fn variables(&self) -> BTreeMap<String, Option<String>> {
        let mut variables = BTreeMap::new();
        for (node, span) in self.resolve() {
            if let Some(var) = node.as_variable() {
                let value = span.map(|s| var.unwrap(&self.input[s]));
                variables.insert(var.name().to_string(), value);
            }
        }
        variables
    }

    /// Matched variables in first-allocation order.
    pub fn variable_matches(&self) -> Vec<VariableMatch<'g, 't>> {
        let input = self.input;
        self.resolve()
            .into_iter()
            .filter_map(|(node, span)| {
                let variable = node.as_variable()?;
                let span = span?;
                Some(VariableMatch {
                    node,
                    variable,
                    text: &input[span.clone()],
                    span,
                })
            })
            .collect()
    }

    /// The innermost variable whose span contains `offset`, ends included.
    pub fn variable_at(&self, offset: usize) -> Option<VariableMatch<'g, 't>> {
        self.variable_matches()
            .into_iter()
            .rev()
            .filter(|m| m.span.start <= offset && offset <= m.span.end)
            .min_by_key(|m| m.span.len())
    }

    /// Variables whose span reaches the end of the input.
    pub fn trailing_variables(&self) -> Vec<VariableMatch<'g, 't>> {
        let end = self.input.len();
        self.variable_matches()
            .into_iter()
            .filter(|m| m.span.end == end)
            .collect()
    }

    /// Spans of matched variables that carry a tag, ordered by start.
    pub fn highlights(&self) -> Vec<(Range<usize>, &'g str)> {
        let mut spans: Vec<_> = self
            .variable_matches()
            .into_iter()
            .filter_map(|m| m.variable.tag().map(|tag| (m.span, tag)))
            .collect();
        spans.sort_by_key(|(span, _)| (span.start, span.end));
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::compiler::compile;
    use crate::grammar::node::{charclass, literal, repeat, variable, Variable};

    fn word() -> Node {
        let letter = charclass("[a-z]").unwrap();
        letter.clone() + repeat(letter)
    }

    #[test]
    fn test_spans_and_values() {
        let v = variable(literal("hello"), "greeting");
        let w = variable(literal("world"), "target");
        let grammar = compile(&(v.clone() + literal(" ") + w.clone())).unwrap();
        let m = grammar.match_full("hello world").unwrap();

        let spans = m.nodes_to_spans();
        assert_eq!(spans[&v], Some(0..5));
        assert_eq!(spans[&w], Some(6..11));

        let values = m.nodes_to_values();
        assert_eq!(values[&v], Some("hello"));
        assert_eq!(values[&w], Some("world"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_branch_not_taken_is_unset() {
        let v = variable(literal("a"), "v");
        let grammar = compile(&(v.clone() | literal("b"))).unwrap();
        let m = grammar.match_full("b").unwrap();
        assert_eq!(m.nodes_to_spans()[&v], None);
        assert_eq!(m.variables(), BTreeMap::from([("v".to_string(), None)]));
    }

    #[test]
    fn test_prefix_resolves_the_live_branch() {
        let v = variable(word(), "v");
        let grammar = compile(&(literal(">") + v.clone() + literal(";"))).unwrap();

        // Input ends on the separator: the variable has begun and is empty.
        let m = grammar.match_prefix(">").unwrap();
        assert_eq!(m.nodes_to_values()[&v], Some(""));

        let m = grammar.match_prefix(">ab").unwrap();
        assert_eq!(m.nodes_to_values()[&v], Some("ab"));
        assert!(!m.is_complete());

        let m = grammar.match_prefix(">ab;").unwrap();
        assert_eq!(m.nodes_to_values()[&v], Some("ab"));
        assert!(m.is_complete());
        assert_eq!(grammar.prefix_groups().names_for(&v).count(), 2);
    }

    #[test]
    fn test_unwrap_is_applied_to_variables_only() {
        let quoted = literal("'") + word() + literal("'");
        let v = Variable::new(quoted, "name").with_unwrap(|s| s.trim_matches('\'').to_string());
        let v: Node = v.into();
        let grammar = compile(&v).unwrap();
        let m = grammar.match_full("'abc'").unwrap();
        assert_eq!(
            m.variables(),
            BTreeMap::from([("name".to_string(), Some("abc".to_string()))])
        );
        assert_eq!(m.nodes_to_values()[&v], Some("'abc'"));
    }

    #[test]
    fn test_duplicate_names_last_resolved_wins() {
        let first = variable(literal("a"), "x");
        let second = variable(literal("b"), "x");

        let grammar = compile(&(first.clone() + second.clone())).unwrap();
        let m = grammar.match_full("ab").unwrap();
        assert_eq!(m.variables()["x"], Some("b".to_string()));

        // A later unset node still overwrites an earlier set one.
        let grammar = compile(&(first | second)).unwrap();
        let m = grammar.match_full("a").unwrap();
        assert_eq!(m.variables()["x"], None);
    }

    #[test]
    fn test_variable_at_prefers_the_innermost() {
        let inner = variable(word(), "inner");
        let outer = variable(literal("(") + inner + literal(")"), "outer");
        let grammar = compile(&(word() + literal(" ") + outer)).unwrap();
        let m = grammar.match_full("f (xy)").unwrap();

        assert_eq!(m.variable_at(3).unwrap().variable.name(), "inner");
        assert_eq!(m.variable_at(4).unwrap().text, "xy");
        assert_eq!(m.variable_at(2).unwrap().variable.name(), "outer");
        assert!(m.variable_at(0).is_none());
    }

    #[test]
    fn test_trailing_variables_and_highlights() {
        let cmd = Variable::new(word(), "cmd").with_tag("keyword");
        let arg = Variable::new(word(), "arg").with_tag("argument");
        let root = Node::from(cmd) + literal(" ") + Node::from(arg);
        let grammar = compile(&root).unwrap();

        let m = grammar.match_prefix("ls do").unwrap();
        let trailing: Vec<_> = m.trailing_variables().iter().map(|v| v.text).collect();
        assert_eq!(trailing, vec!["do"]);
        assert_eq!(m.highlights(), vec![(0..2, "keyword"), (3..5, "argument")]);
        assert_eq!(m.mode(), MatchMode::Prefix);
        assert_eq!(m.input(), "ls do");
    }
}
