//! The interpreter's error type.
//!
//! A lex error, a parse error, an unbound variable and pool exhaustion are
//! all [`diag::Error`] values wrapped in a [`diag::Report`] carrying the
//! span that provoked them (pool exhaustion has no single provoking span,
//! so it is reported against an empty one). A CAM transition that finds the
//! machine in a state the optimizer should never have produced — an `Fst`
//! applied to something other than a pair, an empty save stack — is not
//! part of that diagnostic vocabulary; it is a bug, but it is represented
//! as a typed error rather than a panic so the REPL can report it and keep
//! reading lines instead of aborting the process.

use crate::pool;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("{0}")]
  Diagnostic(#[from] diag::Report),
  #[error("Internal error: {0}.")]
  Invariant(&'static str),
}

impl Error {
  pub fn unexpected_char(c: char, span: impl Into<span::Span>) -> Self {
    diag::Report::new(diag::Error::UnexpectedChar(c), span).into()
  }

  pub fn unexpected_token(lexeme: impl Into<String>, span: impl Into<span::Span>) -> Self {
    diag::Report::new(diag::Error::UnexpectedToken(lexeme.into()), span).into()
  }

  pub fn unexpected_end(span: impl Into<span::Span>) -> Self {
    diag::Report::new(diag::Error::UnexpectedEnd, span).into()
  }

  pub fn unbound_variable(name: impl Into<String>, span: impl Into<span::Span>) -> Self {
    diag::Report::new(diag::Error::UnboundVariable(name.into()), span).into()
  }

  pub fn out_of_memory() -> Self {
    diag::Report::new(diag::Error::OutOfMemory, span::Span::default()).into()
  }

  /// Writes this error to `w` as a single line, colored red when `color`
  /// is set. Delegates to [`diag::Report::emit`] for the diagnostic
  /// vocabulary; an internal invariant violation has no `Report` to defer
  /// to, so it is written plainly regardless of `color`.
  pub fn emit<W: std::io::Write>(&self, w: &mut W, color: bool) -> std::io::Result<()> {
    match self {
      Error::Diagnostic(report) => report.emit(w, color),
      Error::Invariant(_) => writeln!(w, "{self}"),
    }
  }
}

impl From<pool::Exhausted> for Error {
  fn from(_: pool::Exhausted) -> Self {
    Error::out_of_memory()
  }
}
