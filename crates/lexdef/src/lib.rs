//! # Lexdef
//!
//! The front end of a lexer-generator tool. It compiles one textual rule of
//! the form
//!
//! ```text
//! name -> {regex}
//! ```
//!
//! into an annotated abstract syntax tree plus a symbol table, reporting
//! line-numbered diagnostics for malformed input.
//!
//! The regex alphabet covers literal characters, `\`-escapes, named character
//! classes `[:name:]` and their complements `[^`…`^]`, named sub-regex
//! references `%name`, inline semantic actions `$name`, grouping `( )`, and
//! the operators `| * + ?`.
//!
//! ## Pipeline
//!
//! Raw text → [`scanner::rule::RuleScanner`] tokens → [`compiler::RuleCompiler`],
//! which on the rule body hands the shared cursor over to the
//! [`scanner::regex::RegexScanner`] / [`parser::Parser`] pair → [`ast::Ast`]
//! packaged into a [`compiler::Rule`] → optional textual dump via
//! [`ast::render`].
//!
//! Compilation is single-threaded and pull-based: all shared mutable state
//! (cursor, interners, diagnostics) travels in a [`session::Session`] passed
//! by `&mut` into every `next token` call.

pub mod ast;
pub mod compiler;
pub mod error;
pub mod intern;
pub mod parser;
pub mod scanner;
pub mod scope;
pub mod session;
pub mod source;

pub use ast::Ast;
pub use compiler::{Rule, RuleCompiler};
pub use error::{Diag, Diagnostics};
pub use intern::{ClassSetInterner, Interner, SetIdx, Symbol};
pub use scope::Scope;
pub use session::Session;
pub use source::{Cursor, SourceText};
