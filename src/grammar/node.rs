//! Grammar nodes and the combinators that build them.
//!
//! A grammar is a tree of immutable [`Node`]s. Combinators never mutate their
//! operands: `a + b` and `a | b` build new nodes that share `a` and `b`, so a
//! grammar is a persistent DAG in which the same node may be reachable along
//! several paths.
//!
//! Nodes compare and hash by identity, not by structure. Two literals built
//! from the same text are different nodes and get different capture groups.
//!
//! ## Example
//!
//! ```text
//! let quoted = literal("\"") + repeat(charclass(r#"[^"]"#)?) + literal("\"");
//! let grammar = repeat(whitespace) + variable(quoted, "var1") + repeat(whitespace);
//! ```

use super::char_class::CharClass;
use super::completion::Completer;
use super::error::ConstructionError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, BitOr};
use std::sync::Arc;

/// A text transform applied to a variable's matched or completed text.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A shared handle to one grammar node.
#[derive(Clone)]
pub struct Node(Arc<NodeKind>);

/// The closed set of node variants.
#[derive(Debug)]
pub enum NodeKind {
    /// Concatenation of the children's languages, in order.
    Sequence(Sequence),
    /// Union of the children's languages.
    Any(Vec<Node>),
    /// Exactly one character from the class.
    CharClass(CharClass),
    /// A named capture point around one child.
    Variable(Variable),
    /// Zero or more repetitions of the child.
    Repeat(Node),
}

/// Children of a sequence node.
///
/// Literals are sequences too: `literal` is `Some(text)` and the children are
/// one [`CharClass`] per character. Literal sequences may have any number of
/// children, including none; other sequences need at least two.
#[derive(Debug)]
pub struct Sequence {
    pub children: Vec<Node>,
    pub literal: Option<String>,
}

/// A named, capturable sub-grammar.
pub struct Variable {
    child: Node,
    name: String,
    completer: Option<Arc<dyn Completer>>,
    wrap: Option<Transform>,
    unwrap: Option<Transform>,
    tag: Option<String>,
}

impl Node {
    /// Wrap a hand-built node kind.
    ///
    /// Trees built this way are checked again at compile time, since nothing
    /// stops a caller from building an `Any` with no children.
    pub fn new(kind: NodeKind) -> Self {
        Self(Arc::new(kind))
    }

    /// Build a sequence from two or more children.
    pub fn sequence(children: Vec<Node>) -> Result<Self, ConstructionError> {
        if children.len() < 2 {
            return Err(ConstructionError::TooFewChildren {
                kind: "sequence",
                count: children.len(),
            });
        }
        Ok(Self::new(NodeKind::Sequence(Sequence {
            children,
            literal: None,
        })))
    }

    /// Build an alternation from two or more children.
    pub fn any(children: Vec<Node>) -> Result<Self, ConstructionError> {
        if children.len() < 2 {
            return Err(ConstructionError::TooFewChildren {
                kind: "alternation",
                count: children.len(),
            });
        }
        Ok(Self::new(NodeKind::Any(children)))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0
    }

    /// The variable carried by this node, if it is one.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self.kind() {
            NodeKind::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// Direct children, in order.
    pub fn children(&self) -> &[Node] {
        match self.kind() {
            NodeKind::Sequence(seq) => &seq.children,
            NodeKind::Any(children) => children,
            NodeKind::CharClass(_) => &[],
            NodeKind::Variable(var) => std::slice::from_ref(&var.child),
            NodeKind::Repeat(child) => std::slice::from_ref(child),
        }
    }

    /// Visit this node and every node below it, pre-order.
    ///
    /// A node reachable along several paths is visited once per path.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Variable nodes in pre-order.
    pub fn variables(&self) -> Vec<Node> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.as_variable().is_some() {
                found.push(node.clone());
            }
        });
        found
    }

    fn as_combined_sequence(&self) -> Option<&[Node]> {
        match self.kind() {
            NodeKind::Sequence(seq) if seq.literal.is_none() => Some(&seq.children),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Sequence(Sequence {
                literal: Some(text),
                ..
            }) => write!(f, "Literal({:?})", text),
            NodeKind::Sequence(seq) => f.debug_tuple("Sequence").field(&seq.children).finish(),
            NodeKind::Any(children) => f.debug_tuple("Any").field(children).finish(),
            NodeKind::CharClass(class) => write!(f, "CharClass({:?})", class.as_str()),
            NodeKind::Variable(var) => fmt::Debug::fmt(var, f),
            NodeKind::Repeat(child) => f.debug_tuple("Repeat").field(child).finish(),
        }
    }
}

impl Variable {
    pub fn new(child: Node, name: impl Into<String>) -> Self {
        Self {
            child,
            name: name.into(),
            completer: None,
            wrap: None,
            unwrap: None,
            tag: None,
        }
    }

    /// Attach the completer that proposes candidates for this variable.
    pub fn with_completer(mut self, completer: impl Completer + 'static) -> Self {
        self.completer = Some(Arc::new(completer));
        self
    }

    /// Transform applied to completion candidates before they are inserted.
    pub fn with_wrap(mut self, wrap: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.wrap = Some(Arc::new(wrap));
        self
    }

    /// Transform applied to matched text before it is reported.
    pub fn with_unwrap(
        mut self,
        unwrap: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.unwrap = Some(Arc::new(unwrap));
        self
    }

    /// Opaque classification for consumers such as highlighters.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn child(&self) -> &Node {
        &self.child
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn completer(&self) -> Option<&dyn Completer> {
        self.completer.as_deref()
    }

    /// Apply the wrap transform, or return `text` unchanged.
    pub fn wrap(&self, text: &str) -> String {
        match &self.wrap {
            Some(wrap) => wrap(text),
            None => text.to_string(),
        }
    }

    /// Apply the unwrap transform, or return `text` unchanged.
    pub fn unwrap(&self, text: &str) -> String {
        match &self.unwrap {
            Some(unwrap) => unwrap(text),
            None => text.to_string(),
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("child", &self.child)
            .field("tag", &self.tag)
            .field("completer", &self.completer.is_some())
            .finish()
    }
}

impl From<Variable> for Node {
    fn from(var: Variable) -> Self {
        Node::new(NodeKind::Variable(var))
    }
}

impl From<CharClass> for Node {
    fn from(class: CharClass) -> Self {
        Node::new(NodeKind::CharClass(class))
    }
}

/// `a` followed by `b`.
///
/// If `a` is already a combinator sequence, `b` is appended to a copy of its
/// children, so `a + b + c` is one three-child sequence.
pub fn seq(a: Node, b: Node) -> Node {
    let children = match a.as_combined_sequence() {
        Some(children) => {
            let mut children = children.to_vec();
            children.push(b);
            children
        }
        None => vec![a, b],
    };
    Node::new(NodeKind::Sequence(Sequence {
        children,
        literal: None,
    }))
}

/// `a` or `b`. Chained alternations flatten the same way as [`seq`].
pub fn alt(a: Node, b: Node) -> Node {
    let children = match a.kind() {
        NodeKind::Any(children) => {
            let mut children = children.clone();
            children.push(b);
            children
        }
        _ => vec![a, b],
    };
    Node::new(NodeKind::Any(children))
}

/// Fixed text, as a sequence of one-character classes.
pub fn literal(text: &str) -> Node {
    Node::new(NodeKind::Sequence(Sequence {
        children: text.chars().map(|c| CharClass::literal(c).into()).collect(),
        literal: Some(text.to_string()),
    }))
}

/// One character matching the class expression `expr`.
pub fn charclass(expr: &str) -> Result<Node, ConstructionError> {
    CharClass::new(expr).map(Node::from)
}

/// A variable without completer, transforms or tag.
///
/// Use [`Variable::new`] and its `with_*` methods for the full form.
pub fn variable(child: Node, name: &str) -> Node {
    Variable::new(child, name).into()
}

/// Zero or more repetitions of `child`.
pub fn repeat(child: Node) -> Node {
    Node::new(NodeKind::Repeat(child))
}

impl Add for Node {
    type Output = Node;

    fn add(self, rhs: Node) -> Node {
        seq(self, rhs)
    }
}

impl BitOr for Node {
    type Output = Node;

    fn bitor(self, rhs: Node) -> Node {
        alt(self, rhs)
    }
}
