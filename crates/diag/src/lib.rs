//! Diagnostic reporting.
//!
//! Every failure the interpreter can produce — a lex error, a parse
//! error, an unbound variable, pool exhaustion — is represented as an
//! [`Error`] and printed as a single line. These diagnostics never
//! carry a rendered source snippet: the language they describe is
//! small enough that "unexpected token: `foo`" is the whole story, so
//! there is no snippet/label machinery to speak of.

use std::fmt;
use std::io;

use owo_colors::OwoColorize;
use span::Span;
use thiserror::Error;

/// One of the diagnostics a parse or evaluation can raise.
///
/// Variant text matches the wording a conforming implementation of the
/// interpreter is required to print, verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("Unexpected character: {0}.")]
  UnexpectedChar(char),
  #[error("Unexpected token: {0}.")]
  UnexpectedToken(String),
  #[error("Unexpected end of input.")]
  UnexpectedEnd,
  #[error("Unbound variable: {0}.")]
  UnboundVariable(String),
  #[error("Out of memory.")]
  OutOfMemory,
}

/// A diagnostic paired with the span of source text that provoked it.
///
/// The span is tracked even though the current rendering does not
/// display it, so that a future revision can add a source excerpt
/// without threading position information through the lexer and
/// parser again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
  pub error: Error,
  pub span: Span,
}

impl Report {
  pub fn new(error: Error, span: impl Into<Span>) -> Self {
    Self {
      error,
      span: span.into(),
    }
  }

  /// Write this report to `w` as a single line, colored red when `color`
  /// is set.
  pub fn emit<W: io::Write>(&self, w: &mut W, color: bool) -> io::Result<()> {
    if color {
      writeln!(w, "{}", self.error.to_string().red())
    } else {
      writeln!(w, "{}", self.error)
    }
  }
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.error)
  }
}

impl std::error::Error for Report {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn diagnostic_text_matches_the_required_wording() {
    assert_eq!(
      Error::UnexpectedChar('$').to_string(),
      "Unexpected character: $."
    );
    assert_eq!(
      Error::UnexpectedToken(")".into()).to_string(),
      "Unexpected token: )."
    );
    assert_eq!(Error::UnexpectedEnd.to_string(), "Unexpected end of input.");
    assert_eq!(
      Error::UnboundVariable("foo".into()).to_string(),
      "Unbound variable: foo."
    );
    assert_eq!(Error::OutOfMemory.to_string(), "Out of memory.");
  }

  #[test]
  fn emit_without_color_is_plain() {
    let report = Report::new(Error::UnexpectedEnd, 0..0);
    let mut buf = Vec::new();
    report.emit(&mut buf, false).unwrap();
    assert_eq!(buf, b"Unexpected end of input.\n");
  }
}
