//! Capture-group bookkeeping for one compiled pattern.
//!
//! Each compilation owns its own [`GroupTable`], so the full and prefix
//! patterns number their groups independently. A node may be emitted more than
//! once into the same pattern (shared sub-nodes, or the prefix derivation of a
//! sequence emitting children in both full and prefix position), and every
//! emission gets a fresh name. The table is therefore one-to-many from node to
//! names, while every name maps back to exactly one node.

use super::node::Node;

const GROUP_PREFIX: &str = "node_";

/// Ordered `(group name, node)` allocations for one pattern.
#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    entries: Vec<(String, Node)>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next free group name for `node`.
    pub(crate) fn allocate(&mut self, node: &Node) -> String {
        let name = format!("{}{}", GROUP_PREFIX, self.entries.len());
        self.entries.push((name.clone(), node.clone()));
        name
    }

    /// The node a group name was allocated for.
    pub fn node(&self, name: &str) -> Option<&Node> {
        let index: usize = name.strip_prefix(GROUP_PREFIX)?.parse().ok()?;
        self.entries
            .get(index)
            .filter(|(allocated, _)| allocated == name)
            .map(|(_, node)| node)
    }

    /// Every name allocated for `node`, in allocation order.
    pub fn names_for<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(_, n)| n == node)
            .map(|(name, _)| name.as_str())
    }

    /// All allocations, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::node::{literal, variable};

    #[test]
    fn test_names_are_sequential_and_resolve_back() {
        let a = variable(literal("a"), "a");
        let b = variable(literal("b"), "b");
        let mut table = GroupTable::new();
        assert_eq!(table.allocate(&a), "node_0");
        assert_eq!(table.allocate(&b), "node_1");
        assert_eq!(table.allocate(&a), "node_2");

        assert_eq!(table.node("node_0"), Some(&a));
        assert_eq!(table.node("node_1"), Some(&b));
        assert_eq!(table.node("node_2"), Some(&a));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_one_node_many_names() {
        let a = variable(literal("a"), "a");
        let b = variable(literal("b"), "b");
        let mut table = GroupTable::new();
        table.allocate(&a);
        table.allocate(&b);
        table.allocate(&a);

        let names: Vec<_> = table.names_for(&a).collect();
        assert_eq!(names, vec!["node_0", "node_2"]);
    }

    #[test]
    fn test_unknown_names() {
        let mut table = GroupTable::new();
        table.allocate(&literal("a"));
        assert!(table.node("node_1").is_none());
        assert!(table.node("node_x").is_none());
        assert!(table.node("other_0").is_none());
        assert!(table.node("node_00").is_none());
    }
}
