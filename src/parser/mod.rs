//! Syntax tree construction for Python snippets.
//!
//! This module provides:
//! - `SyntaxTree`: an arena of `Node`s with parent indices
//! - `NodeKind`: the node kinds the detectors care about, with their attributes
//! - `parse`: the tree builder (tree-sitter backed, see `builder.rs`)
//!
//! The arena mirrors Python's own abstract syntax rather than the concrete
//! tree-sitter tree, so that ancestor counts match what a Python programmer
//! would call nesting.

mod builder;
mod validate;

use std::fmt;

pub use builder::parse;

/// Index of a node inside a `SyntaxTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a parameter binds arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Declared before a `/` marker.
    PositionalOnly,
    /// Plain parameter.
    PositionalOrKeyword,
    /// `*args`
    VarPositional,
    /// Declared after `*` or `*args`.
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

/// A declared function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    /// Node holding the default value expression, if any.
    pub default: Option<NodeId>,
}

/// Attributes of a `def` / `async def`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub is_async: bool,
    pub params: Vec<Parameter>,
    /// Number of statements directly in the body (docstring included).
    pub body_len: usize,
    pub docstring: Option<String>,
}

impl FunctionDef {
    /// Parameters that can be passed either positionally or by keyword.
    pub fn positional_or_keyword(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .filter(|p| p.kind == ParamKind::PositionalOrKeyword)
    }
}

/// Attributes of a `class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub docstring: Option<String>,
}

/// Attributes of a `for` / `async for` loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForLoop {
    /// The iterated expression (`range(n)` in `for i in range(n)`).
    pub iter: Option<NodeId>,
    pub is_async: bool,
}

/// Attributes of a call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Callee name when the callee is a bare identifier (`print`, not `log.info`).
    pub callee: Option<String>,
}

/// Kind of a syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    If,
    For(ForLoop),
    While,
    Try,
    /// `try` with `except*` handlers.
    TryStar,
    ExceptHandler,
    With,
    AsyncWith,
    Match,
    MatchCase,
    Call(Call),
    List,
    Dict,
    Set,
    /// Any other construct, kept under its grammar name.
    Other(&'static str),
}

impl NodeKind {
    /// Short name used in logs and debug output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Module => "module",
            NodeKind::FunctionDef(_) => "function_def",
            NodeKind::ClassDef(_) => "class_def",
            NodeKind::If => "if",
            NodeKind::For(_) => "for",
            NodeKind::While => "while",
            NodeKind::Try => "try",
            NodeKind::TryStar => "try_star",
            NodeKind::ExceptHandler => "except_handler",
            NodeKind::With => "with",
            NodeKind::AsyncWith => "async_with",
            NodeKind::Match => "match",
            NodeKind::MatchCase => "match_case",
            NodeKind::Call(_) => "call",
            NodeKind::List => "list",
            NodeKind::Dict => "dict",
            NodeKind::Set => "set",
            NodeKind::Other(kind) => kind,
        }
    }

    /// Block statements that open a new level of nesting: `if`, `for`,
    /// `while`, `try` and `with`. The async forms and `try`/`except*` are
    /// distinct statements and do not count.
    pub fn is_nesting_block(&self) -> bool {
        match self {
            NodeKind::If | NodeKind::While | NodeKind::Try | NodeKind::With => true,
            NodeKind::For(for_loop) => !for_loop.is_async,
            _ => false,
        }
    }

    /// List, dict and set displays (mutable when used as defaults).
    pub fn is_mutable_literal(&self) -> bool {
        matches!(self, NodeKind::List | NodeKind::Dict | NodeKind::Set)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Structural parent; `None` only for the root.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Start line (1-indexed).
    pub line: usize,
}

/// Parsed snippet. Parents always precede their children in the arena.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// The module node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Kind of a node, if the id is valid.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Iterate over the strict ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Number of parent links followed to reach the root (root = 0).
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Breadth-first order: the root, then every level in source order.
    pub fn breadth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }
        order.push(self.root());
        let mut cursor = 0;
        while cursor < order.len() {
            let id = order[cursor];
            cursor += 1;
            if let Some(node) = self.get(id) {
                order.extend(node.children.iter().copied());
            }
        }
        order
    }

    /// All nodes in arena (pre-order) sequence.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

/// Iterator returned by [`SyntaxTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
