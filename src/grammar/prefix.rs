//! Prefix-match lowering.
//!
//! Derives, from the same node tree, a pattern whose language is the prefix
//! closure of the grammar: every string that can still be completed into a
//! full match, including the empty string and every full match itself. The
//! derivation is structural; nothing enumerates the grammar's language.
//!
//! ## Rules
//!
//! `full(n)` is the fragment from [`super::lower`], `prefix(n)` the one built
//! here. Every `prefix(n)` accepts the empty string.
//!
//! | Node                 | Prefix fragment                                  |
//! |----------------------|--------------------------------------------------|
//! | `CharClass(c)`       | `c?`                                             |
//! | `Any(a, b)`          | `(?:prefix(a)\|prefix(b))?`                      |
//! | `Sequence(A ++ B)`   | `(?:full(A) prefix(B)\|prefix(A))`               |
//! | `Repeat(a)`          | `(?:full(a))*prefix(a)`                          |
//! | `Variable(a)`        | `(?P<node_N>prefix(a))?`                         |
//!
//! A sequence prefix is a full match of some leading run of children followed
//! by a prefix of the next child. The children are split into halves `A` and
//! `B`: either `A` is complete and `B` is in progress, or the input stops
//! inside `A`. Each half recurses the same way, so the pattern grows as
//! `n log n` in the number of children and nests `log n` deep, where listing
//! every truncation point would grow quadratically.
//!
//! The complete-`A` branch comes first. Under leftmost-first priority an input
//! ending exactly on a child boundary is read as "that child is done and the
//! next one has begun", so a variable right after a separator is reported as
//! present and empty. Children are still emitted more than once, so a single
//! variable below a sequence ends up with several group names.
//!
//! A repeat prefix is any number of complete repetitions followed by exactly
//! one partial repetition. Quantifying `prefix(a)` directly would let several
//! repetitions be partial (`aab` for `repeat(literal("ab"))`), which is not a
//! prefix of the grammar. The partial copy is allocated first, so variables in
//! the repeated child report the repetition being typed.

use super::groups::GroupTable;
use super::lower::{anchor, Lowering};
use super::node::{Node, NodeKind};

impl Lowering {
    /// Lower `root` to an anchored prefix-match pattern.
    pub(crate) fn prefix_pattern(root: &Node) -> (String, GroupTable) {
        let mut lowering = Self::new();
        let body = lowering.prefix(root);
        (anchor(&body), lowering.into_groups())
    }

    /// The fragment accepting every prefix of the language of `node`.
    pub(crate) fn prefix(&mut self, node: &Node) -> String {
        match node.kind() {
            NodeKind::CharClass(class) => format!("{}?", class.as_str()),
            NodeKind::Any(children) => {
                let branches: Vec<String> = children.iter().map(|c| self.prefix(c)).collect();
                format!("(?:{})?", branches.join("|"))
            }
            NodeKind::Sequence(seq) => self.prefix_sequence(&seq.children),
            NodeKind::Repeat(child) => {
                let partial = self.prefix(child);
                let complete = self.full(child);
                format!("(?:{})*{}", complete, partial)
            }
            NodeKind::Variable(var) => {
                let name = self.allocate(node);
                format!("(?P<{}>{})?", name, self.prefix(var.child()))
            }
        }
    }

    fn prefix_sequence(&mut self, children: &[Node]) -> String {
        match children {
            [] => String::new(),
            [only] => self.prefix(only),
            _ => {
                let (head, tail) = children.split_at(children.len() / 2);
                let partial = self.prefix_sequence(head);
                let complete: String = head.iter().map(|c| self.full(c)).collect();
                let rest = self.prefix_sequence(tail);
                format!("(?:{}{}|{})", complete, rest, partial)
            }
        }
    }
}
