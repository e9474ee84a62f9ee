//! Diagnostics: the message catalogue and the shared error counter.
//!
//! Every diagnostic is printed at the moment of detection as
//! `Line <n>: <description>.` with a 1-based source line number, and bumps
//! the running error count that gates the final success/failure of a
//! compilation. Emitted messages are also retained so tests can inspect
//! them.

use thiserror::Error;

/// A diagnostic description. The surrounding `Line <n>: … .` framing is
/// added by [`Diagnostics::report`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diag {
    // Lexical.
    #[error("expects {0}")]
    Expects(&'static str),
    #[error("one of the following characters is expected: {0}")]
    ExpectsOneOf(String),
    #[error("a Latin letter or an underscore is expected")]
    LatinLetterExpected,
    #[error("unexpected end of a string literal")]
    UnterminatedString,
    #[error("unexpected end of a character-class complement")]
    UnterminatedClassComplement,

    // Syntactic.
    #[error("expected a rule name")]
    ExpectedRuleName,
    #[error("expected an arrow")]
    ExpectedArrow,
    #[error("expected an opening curly brace")]
    ExpectedOpeningBrace,
    #[error("expected a closing curly brace")]
    ExpectedClosingBrace,
    #[error("expected a closing round bracket")]
    ExpectedClosingParen,
    #[error("unexpected end of regexp")]
    UnexpectedEndOfRegexp,
    #[error("unexpected action name")]
    UnexpectedAction,
    #[error("unexpected operator |")]
    UnexpectedOr,
    #[error("unexpected postfix operator")]
    UnexpectedPostfixOperator,
    #[error("unexpected begin of regexp")]
    UnexpectedRegexpBegin,
    #[error("unexpected closing curly brace")]
    UnexpectedCloseBrace,
    #[error("unexpected closing round bracket")]
    UnexpectedClosingParen,
    #[error("unexpected end of text")]
    UnexpectedEndOfText,

    // Semantic.
    #[error("the action {0} is not defined")]
    UndefinedAction(String),
    #[error("the identifier {0} is not an action name")]
    NotAnActionName(String),
    #[error("the rule name {0} is already defined")]
    RuleNameAlreadyDefined(String),
}

/// The shared error counter and message sink.
#[derive(Debug, Default)]
pub struct Diagnostics {
    count: usize,
    messages: Vec<String>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one diagnostic: print it to stderr immediately, retain the text,
    /// and increment the error count.
    pub fn report(&mut self, line: usize, diag: Diag) {
        let message = format!("Line {line}: {diag}.");
        eprintln!("{message}");
        self.messages.push(message);
        self.count += 1;
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count
    }

    /// All messages emitted so far, in order of detection.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_framing() {
        let mut diags = Diagnostics::new();
        diags.report(3, Diag::ExpectedArrow);
        diags.report(7, Diag::Expects("%action"));
        assert_eq!(diags.error_count(), 2);
        assert_eq!(diags.messages()[0], "Line 3: expected an arrow.");
        assert_eq!(diags.messages()[1], "Line 7: expects %action.");
    }
}
