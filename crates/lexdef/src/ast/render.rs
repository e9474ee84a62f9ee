//! Textual AST dump, as a [`Visitor`].
//!
//! Composites open with `{Or`, `{Concat`, `{Kleene`, `{Positive` or
//! `{Optional` on their own line, children indented four more spaces, and a
//! closing `}` back at the parent's indent. Leaves render on one line as
//! `{<kind> <payload>[action_idx_ : <n>]}` where `n` is the 1-based action
//! symbol index, 0 when no action is attached. Character payloads use
//! escaped quoted form, so a newline leaf reads `{Char '\n'…}`.

use super::{Ast, BinaryKind, Node, UnaryKind, Visitor};
use crate::intern::{SetIdx, Symbol};
use std::fmt::Write;

const INDENT: usize = 4;

impl Ast {
    /// Dump the whole tree; an absent root dumps as the empty string.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut dumper = Dumper {
            indent: 0,
            out: String::new(),
        };
        self.traverse(&mut dumper);
        dumper.out
    }
}

struct Dumper {
    indent: usize,
    out: String,
}

impl Dumper {
    fn composite(&mut self, name: &str, children: &[&Node]) {
        let pad = " ".repeat(self.indent);
        let _ = writeln!(self.out, "{pad}{{{name}");
        self.indent += INDENT;
        for child in children {
            child.accept(self);
        }
        self.indent -= INDENT;
        let _ = writeln!(self.out, "{pad}}}");
    }

    fn leaf(&mut self, kind: &str, payload: impl std::fmt::Display, action: Option<Symbol>) {
        let pad = " ".repeat(self.indent);
        let action = action.map_or(0, Symbol::as_usize);
        let _ = writeln!(
            self.out,
            "{pad}{{{kind} {payload}[action_idx_ : {action}]}}"
        );
    }
}

impl Visitor for Dumper {
    fn visit_binary(&mut self, kind: BinaryKind, children: &[Node]) {
        let name = match kind {
            BinaryKind::Or => "Or",
            BinaryKind::Concat => "Concat",
        };
        let children: Vec<&Node> = children.iter().collect();
        self.composite(name, &children);
    }

    fn visit_unary(&mut self, kind: UnaryKind, child: &Node) {
        let name = match kind {
            UnaryKind::Kleene => "Kleene",
            UnaryKind::Positive => "Positive",
            UnaryKind::Optional => "Optional",
        };
        self.composite(name, &[child]);
    }

    fn visit_regexp_name(&mut self, name: Symbol, action: Option<Symbol>) {
        self.leaf("Regexp_name", name.as_usize(), action);
    }

    fn visit_char(&mut self, c: char, action: Option<Symbol>) {
        self.leaf("Char", format_args!("{c:?}"), action);
    }

    fn visit_class(&mut self, set: SetIdx, action: Option<Symbol>) {
        self.leaf("Char_class", set.as_usize(), action);
    }

    fn visit_class_complement(&mut self, set: SetIdx, action: Option<Symbol>) {
        self.leaf("Char_class_complement", set.as_usize(), action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Leaf, LeafKind};
    use crate::intern::Interner;

    #[test]
    fn test_leaf_dump_forms() {
        let mut ids = Interner::new();
        let action = ids.intern("write");
        let mut leaf = Leaf::new(LeafKind::Char('\n'));
        assert_eq!(
            Ast::new(Some(Node::Leaf(leaf))).dump(),
            "{Char '\\n'[action_idx_ : 0]}\n"
        );
        leaf.action = Some(action);
        assert_eq!(
            Ast::new(Some(Node::Leaf(leaf))).dump(),
            "{Char '\\n'[action_idx_ : 1]}\n"
        );
    }

    #[test]
    fn test_nested_dump_layout() {
        let a = Node::Leaf(Leaf::new(LeafKind::Char('a')));
        let b = Node::Leaf(Leaf::new(LeafKind::Char('b')));
        let tree = Node::Concat(vec![
            Node::Kleene(Box::new(a)),
            Node::Optional(Box::new(b)),
        ]);
        let expected = "{Concat\n    {Kleene\n        {Char 'a'[action_idx_ : 0]}\n    }\n    {Optional\n        {Char 'b'[action_idx_ : 0]}\n    }\n}\n";
        assert_eq!(Ast::new(Some(tree)).dump(), expected);
    }

    #[test]
    fn test_absent_root_dumps_empty() {
        assert_eq!(Ast::default().dump(), "");
    }
}
