//! The symbol table: attributes attached to interned identifiers and
//! string literals.
//!
//! An identifier may play several roles at once (the same name can be a
//! lexeme code and, say, a rule name), so the role is a bitset rather than
//! an enum. String literals carry their own role bitset plus the lexeme
//! code when they represent a keyword or a delimiter.

use hashbrown::HashMap;

use crate::intern::Symbol;

bitflags::bitflags! {
    /// Roles an identifier can play.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct IdKinds: u8 {
        const SCANNER_NAME = 1 << 0;
        const CODES_TYPE_NAME = 1 << 1;
        const IDENT_NAME = 1 << 2;
        const CODE_OF_LEXEM = 1 << 3;
        const LEXEM_INFO_NAME = 1 << 4;
        const ACTION_NAME = 1 << 5;
        const REGEXP_NAME = 1 << 6;
    }
}

bitflags::bitflags! {
    /// Roles a string literal can play.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StrKinds: u16 {
        const ADDED_TOKEN_FIELDS = 1 << 0;
        const ADDED_MEMBERS = 1 << 1;
        const KEYWORD_REPRES = 1 << 2;
        const DELIMITER_REPRES = 1 << 3;
        const ACTION_DEFINITION = 1 << 4;
        const SINGLE_LINED_COMMENT_BEGIN = 1 << 5;
        const MULTI_LINED_COMMENT_BEGIN = 1 << 6;
        const MULTI_LINED_COMMENT_END = 1 << 7;
        const HEADER_ADDITIONS = 1 << 8;
        const IMPL_ADDITIONS = 1 << 9;
        const INIT_ACTIONS = 1 << 10;
        const POST_ACTIONS = 1 << 11;
    }
}

/// Attributes of one identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdAttributes {
    pub kinds: IdKinds,
    /// The numeric lexeme code, when [`IdKinds::CODE_OF_LEXEM`] is set.
    pub code: usize,
    /// The definition string literal, when [`IdKinds::ACTION_NAME`] is set.
    pub definition: Option<Symbol>,
}

/// Attributes of one string literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrAttributes {
    pub kinds: StrKinds,
    /// The lexeme code, when the literal represents a keyword or delimiter.
    pub code: usize,
}

/// What [`Scope::check_rule_name`] decided about a would-be rule name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleNameCheck {
    Ok,
    AlreadyDefined,
}

/// The two attribute maps, keyed by interned symbol.
#[derive(Debug, Default)]
pub struct Scope {
    ids: HashMap<Symbol, IdAttributes>,
    strs: HashMap<Symbol, StrAttributes>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as an action with its definition literal.
    pub fn define_action(&mut self, name: Symbol, definition: Symbol) {
        let attrs = self.ids.entry(name).or_default();
        attrs.kinds |= IdKinds::ACTION_NAME;
        attrs.definition = Some(definition);
        self.strs.entry(definition).or_default().kinds |= StrKinds::ACTION_DEFINITION;
    }

    /// Is `name` known, in any role?
    #[must_use]
    pub fn contains_id(&self, name: Symbol) -> bool {
        self.ids.contains_key(&name)
    }

    /// Is `name` registered as an action?
    #[must_use]
    pub fn is_action(&self, name: Symbol) -> bool {
        self.ids
            .get(&name)
            .is_some_and(|a| a.kinds.contains(IdKinds::ACTION_NAME))
    }

    /// Register `name` as a rule name, merging the role into whatever else
    /// the identifier already is. A second registration as a rule name is
    /// rejected.
    pub fn check_rule_name(&mut self, name: Symbol) -> RuleNameCheck {
        let attrs = self.ids.entry(name).or_default();
        if attrs.kinds.contains(IdKinds::REGEXP_NAME) {
            return RuleNameCheck::AlreadyDefined;
        }
        attrs.kinds |= IdKinds::REGEXP_NAME;
        RuleNameCheck::Ok
    }

    #[must_use]
    pub fn id_attributes(&self, name: Symbol) -> Option<&IdAttributes> {
        self.ids.get(&name)
    }

    #[must_use]
    pub fn str_attributes(&self, literal: Symbol) -> Option<&StrAttributes> {
        self.strs.get(&literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    #[test]
    fn test_rule_name_roles_merge() {
        let mut ids = Interner::new();
        let mut scope = Scope::new();
        let write = ids.intern("write");
        let body = ids.intern("buffer += ch;");
        scope.define_action(write, body);

        // An action name may also become a rule name, once.
        assert_eq!(scope.check_rule_name(write), RuleNameCheck::Ok);
        assert_eq!(scope.check_rule_name(write), RuleNameCheck::AlreadyDefined);
        assert!(scope.is_action(write));
        let attrs = scope.id_attributes(write).unwrap();
        assert!(attrs.kinds.contains(IdKinds::ACTION_NAME | IdKinds::REGEXP_NAME));
        assert_eq!(attrs.definition, Some(body));
    }

    #[test]
    fn test_unknown_identifier() {
        let mut ids = Interner::new();
        let scope = Scope::new();
        let ghost = ids.intern("ghost");
        assert!(!scope.contains_id(ghost));
        assert!(!scope.is_action(ghost));
    }
}
