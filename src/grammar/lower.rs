//! Full-match lowering: node tree to regex fragment.
//!
//! ## Rules
//!
//! | Node              | Fragment                               |
//! |-------------------|----------------------------------------|
//! | `CharClass(c)`    | `c`                                    |
//! | `Sequence(a, b)`  | `full(a) full(b)`                      |
//! | `Any(a, b)`       | `(?:full(a)\|full(b))`                 |
//! | `Repeat(a)`       | `(?:full(a))*`                         |
//! | `Variable(a)`     | `(?P<node_N>full(a))`                  |
//!
//! Only variables open capture groups. Each emission allocates a fresh name in
//! the [`GroupTable`] owned by the lowering, so one table describes exactly
//! one pattern. The prefix rules live in [`super::prefix`] and share this
//! struct, since deriving a prefix fragment needs full fragments too.

use super::error::CompileError;
use super::groups::GroupTable;
use super::node::{Node, NodeKind};

/// One pass over a node tree, producing one pattern and its group table.
#[derive(Debug, Default)]
pub(crate) struct Lowering {
    groups: GroupTable,
}

impl Lowering {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Lower `root` to an anchored full-match pattern.
    pub(crate) fn full_pattern(root: &Node) -> (String, GroupTable) {
        let mut lowering = Self::new();
        let body = lowering.full(root);
        (anchor(&body), lowering.groups)
    }

    pub(crate) fn into_groups(self) -> GroupTable {
        self.groups
    }

    pub(crate) fn allocate(&mut self, node: &Node) -> String {
        self.groups.allocate(node)
    }

    /// The fragment accepting exactly the language of `node`.
    pub(crate) fn full(&mut self, node: &Node) -> String {
        match node.kind() {
            NodeKind::CharClass(class) => class.as_str().to_string(),
            NodeKind::Sequence(seq) => seq.children.iter().map(|c| self.full(c)).collect(),
            NodeKind::Any(children) => {
                let branches: Vec<String> = children.iter().map(|c| self.full(c)).collect();
                format!("(?:{})", branches.join("|"))
            }
            NodeKind::Repeat(child) => format!("(?:{})*", self.full(child)),
            NodeKind::Variable(var) => {
                let name = self.allocate(node);
                format!("(?P<{}>{})", name, self.full(var.child()))
            }
        }
    }
}

/// Anchor a fragment so it must span the whole input.
pub(crate) fn anchor(body: &str) -> String {
    format!("^(?:{})$", body)
}

/// Check the structural invariants the combinators guarantee.
///
/// Hand-built trees can break them, so compilation runs this first.
pub(crate) fn validate(node: &Node) -> Result<(), CompileError> {
    match node.kind() {
        NodeKind::Sequence(seq) => match &seq.literal {
            Some(text) => {
                let all_classes = seq
                    .children
                    .iter()
                    .all(|c| matches!(c.kind(), NodeKind::CharClass(_)));
                if !all_classes {
                    return Err(CompileError::LiteralChild { text: text.clone() });
                }
            }
            None if seq.children.len() < 2 => {
                return Err(CompileError::TooFewChildren {
                    kind: "sequence",
                    count: seq.children.len(),
                })
            }
            None => {}
        },
        NodeKind::Any(children) if children.len() < 2 => {
            return Err(CompileError::TooFewChildren {
                kind: "alternation",
                count: children.len(),
            })
        }
        _ => {}
    }

    node.children().iter().try_for_each(validate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::char_class::CharClass;
    use crate::grammar::node::{charclass, literal, repeat, variable, Sequence};

    #[test]
    fn test_lowering_rules() {
        let (pattern, groups) = Lowering::full_pattern(&(literal("ab") | literal("c")));
        insta::assert_snapshot!(pattern, @"^(?:(?:[a][b]|[c]))$");
        assert!(groups.is_empty());

        let (pattern, _) = Lowering::full_pattern(&repeat(charclass(r"\d").unwrap()));
        insta::assert_snapshot!(pattern, @r"^(?:(?:\d)*)$");
    }

    #[test]
    fn test_empty_literal_lowers_to_nothing() {
        let (pattern, _) = Lowering::full_pattern(&literal(""));
        assert_eq!(pattern, "^(?:)$");
    }

    #[test]
    fn test_variables_open_named_groups() {
        let inner = variable(literal("x"), "inner");
        let outer = variable(inner.clone() + literal("y"), "outer");
        let (pattern, groups) = Lowering::full_pattern(&outer);
        insta::assert_snapshot!(pattern, @"^(?:(?P<node_0>(?P<node_1>[x])[y]))$");
        assert_eq!(groups.node("node_0"), Some(&outer));
        assert_eq!(groups.node("node_1"), Some(&inner));
    }

    #[test]
    fn test_shared_node_gets_one_name_per_emission() {
        let shared = variable(literal("a"), "v");
        let root = shared.clone() + shared.clone();
        let (pattern, groups) = Lowering::full_pattern(&root);
        assert_eq!(pattern, "^(?:(?P<node_0>[a])(?P<node_1>[a]))$");
        assert_eq!(groups.names_for(&shared).count(), 2);
    }

    #[test]
    fn test_validate_rejects_hand_built_degenerate_nodes() {
        let empty_any = Node::new(NodeKind::Any(vec![]));
        assert!(matches!(
            validate(&empty_any),
            Err(CompileError::TooFewChildren { kind: "alternation", count: 0 })
        ));

        let lonely = Node::new(NodeKind::Sequence(Sequence {
            children: vec![literal("a")],
            literal: None,
        }));
        assert!(matches!(
            validate(&repeat(lonely)),
            Err(CompileError::TooFewChildren { kind: "sequence", count: 1 })
        ));

        let bad_literal = Node::new(NodeKind::Sequence(Sequence {
            children: vec![CharClass::literal('a').into(), literal("b")],
            literal: Some("ab".to_string()),
        }));
        assert!(matches!(
            validate(&bad_literal),
            Err(CompileError::LiteralChild { .. })
        ));

        assert!(validate(&(literal("") | variable(literal("a"), "a"))).is_ok());
    }
}
