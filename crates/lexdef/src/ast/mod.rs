//! The annotated regex AST.
//!
//! Composite nodes are [`Node::Or`] and [`Node::Concat`] with two or more
//! children in source order, and the three postfix operators with exactly
//! one child. The collapse helpers keep the arity invariant: a would-be
//! composite with no children vanishes, with one child it *is* that child,
//! and only with two or more does a composite node exist.
//!
//! Leaves carry the optional action annotation; `$name` after a subtree
//! pushes the action down to every leaf of that subtree, and a later
//! annotation overwrites an earlier one.

pub mod render;

use crate::intern::{SetIdx, Symbol};

/// What a leaf matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// A `%name` reference to another rule.
    RegexpName(Symbol),
    /// A single character.
    Char(char),
    /// A named character class, as an interned set.
    Class(SetIdx),
    /// A `[^` … `^]` complement, as an interned set.
    ClassComplement(SetIdx),
}

/// A leaf with its action annotation. `None` renders as index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub kind: LeafKind,
    pub action: Option<Symbol>,
}

impl Leaf {
    #[must_use]
    pub fn new(kind: LeafKind) -> Self {
        Self { kind, action: None }
    }
}

/// One node of the regex AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Alternation; always two or more children, in source order.
    Or(Vec<Node>),
    /// Concatenation; always two or more children, in source order.
    Concat(Vec<Node>),
    /// `*`.
    Kleene(Box<Node>),
    /// `+`.
    Positive(Box<Node>),
    /// `?`.
    Optional(Box<Node>),
    Leaf(Leaf),
}

/// Composite kinds as seen by a [`Visitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
    Or,
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryKind {
    Kleene,
    Positive,
    Optional,
}

/// Read-only traversal over the tree. Composite callbacks receive the
/// children and decide themselves whether and when to recurse into them
/// via [`Node::accept`].
pub trait Visitor {
    fn visit_binary(&mut self, kind: BinaryKind, children: &[Node]);
    fn visit_unary(&mut self, kind: UnaryKind, child: &Node);
    fn visit_regexp_name(&mut self, name: Symbol, action: Option<Symbol>);
    fn visit_char(&mut self, c: char, action: Option<Symbol>);
    fn visit_class(&mut self, set: SetIdx, action: Option<Symbol>);
    fn visit_class_complement(&mut self, set: SetIdx, action: Option<Symbol>);
}

impl Node {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        match self {
            Node::Or(children) => visitor.visit_binary(BinaryKind::Or, children),
            Node::Concat(children) => visitor.visit_binary(BinaryKind::Concat, children),
            Node::Kleene(child) => visitor.visit_unary(UnaryKind::Kleene, child),
            Node::Positive(child) => visitor.visit_unary(UnaryKind::Positive, child),
            Node::Optional(child) => visitor.visit_unary(UnaryKind::Optional, child),
            Node::Leaf(leaf) => match leaf.kind {
                LeafKind::RegexpName(name) => visitor.visit_regexp_name(name, leaf.action),
                LeafKind::Char(c) => visitor.visit_char(c, leaf.action),
                LeafKind::Class(set) => visitor.visit_class(set, leaf.action),
                LeafKind::ClassComplement(set) => {
                    visitor.visit_class_complement(set, leaf.action);
                }
            },
        }
    }
}

impl Node {
    /// Build an alternation over `children`, collapsing degenerate arities.
    #[must_use]
    pub fn or(children: Vec<Node>) -> Option<Node> {
        Self::composite(children, Node::Or)
    }

    /// Build a concatenation over `children`, collapsing degenerate arities.
    #[must_use]
    pub fn concat(children: Vec<Node>) -> Option<Node> {
        Self::composite(children, Node::Concat)
    }

    fn composite(mut children: Vec<Node>, make: fn(Vec<Node>) -> Node) -> Option<Node> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(make(children)),
        }
    }

    /// Attach `action` to every leaf of this subtree, overwriting any
    /// earlier annotation.
    pub fn apply_action(&mut self, action: Symbol) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Or(children) | Node::Concat(children) => stack.extend(children.iter_mut()),
                Node::Kleene(child) | Node::Positive(child) | Node::Optional(child) => {
                    stack.push(child);
                }
                Node::Leaf(leaf) => leaf.action = Some(action),
            }
        }
    }
}

/// A whole regex body. `root` is `None` when the body failed to parse (or
/// was empty); a tree that exists always satisfies the arity invariant.
///
/// Teardown is iterative: dropping a deeply left- or right-nested tree
/// must not recurse once per level.
#[derive(Debug, Default)]
pub struct Ast {
    pub root: Option<Node>,
}

impl Ast {
    #[must_use]
    pub fn new(root: Option<Node>) -> Self {
        Self { root }
    }

    /// Run a visitor over the root, if there is one.
    pub fn traverse<V: Visitor>(&self, visitor: &mut V) {
        if let Some(root) = &self.root {
            root.accept(visitor);
        }
    }
}

impl Drop for Ast {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        if let Some(root) = self.root.take() {
            stack.push(root);
        }
        while let Some(node) = stack.pop() {
            match node {
                Node::Or(children) | Node::Concat(children) => stack.extend(children),
                Node::Kleene(child) | Node::Positive(child) | Node::Optional(child) => {
                    stack.push(*child);
                }
                Node::Leaf(_) => {}
            }
        }
    }
}
