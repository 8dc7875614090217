//! A single REPL session: the three pools an evaluation needs, bundled so
//! a failed line can be undone by clearing all of them at once.

use crate::ast::Ast;
use crate::cam::Cam;
use crate::env::{Env, Value};
use crate::error::{Error, Result};
use crate::optimize::optimize;
use crate::parser::{parse_in, Scope};
use crate::pool;

pub struct Session {
  ast: Ast,
  env: Env,
  scope: Scope,
}

impl Session {
  pub fn new() -> Self {
    Self::with_capacity(pool::DEFAULT_CAPACITY)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      ast: Ast::new(capacity),
      env: Env::new(capacity),
      scope: Scope::new(capacity),
    }
  }

  /// Parses, optimizes and runs one line, returning the integer it
  /// reduces to. Leaves all three pools cleared, regardless of outcome, so
  /// the next call starts from a clean slate.
  pub fn eval(&mut self, line: &str) -> Result<i64> {
    let result = self.eval_inner(line);
    self.reset();
    result
  }

  /// Parses and optimizes `line` without executing it, returning the
  /// disassembled combinator tree. Used by the `--dump-ir` flag; leaves
  /// the pools cleared afterward just like [`Session::eval`].
  pub fn dump_ir(&mut self, line: &str) -> Option<String> {
    let result = parse_in(&mut self.ast, &mut self.scope, line)
      .and_then(|root| optimize(&mut self.ast, root))
      .map(|root| crate::disasm::disassemble(&self.ast, root));
    self.reset();
    result.ok()
  }

  fn eval_inner(&mut self, line: &str) -> Result<i64> {
    let root = parse_in(&mut self.ast, &mut self.scope, line)?;
    let root = optimize(&mut self.ast, root)?;
    match Cam::run(&self.ast, root, &mut self.env)? {
      Value::Int(n) => Ok(n),
      other => Err(Error::Invariant(match other {
        Value::Nil => "program reduced to Nil instead of an Int",
        Value::Pair(..) => "program reduced to a Pair instead of an Int",
        Value::Closure(..) => "program reduced to a Closure instead of an Int",
        Value::Int(_) => unreachable!(),
      })),
    }
  }

  /// Bulk-clears all three pools in O(1). Every diagnostic this crate
  /// raises is recoverable: a session that failed to evaluate one line is
  /// exactly as usable for the next line as a fresh one.
  pub fn reset(&mut self) {
    self.ast.clear();
    self.env.clear();
    self.scope.clear();
  }
}

impl Default for Session {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn evaluates_a_sequence_of_independent_lines() {
    let mut session = Session::new();
    assert_eq!(session.eval("(+ 1 2)").unwrap(), 3);
    assert_eq!(session.eval("((lambda (x) x) 7)").unwrap(), 7);
  }

  #[test]
  fn recovers_after_a_parse_error() {
    let mut session = Session::new();
    assert!(session.eval("(").is_err());
    assert_eq!(session.eval("42").unwrap(), 42);
  }

  #[test]
  fn recovers_after_an_unbound_variable() {
    let mut session = Session::new();
    assert_eq!(
      session.eval("foo").unwrap_err().to_string(),
      "Unbound variable: foo."
    );
    assert_eq!(session.eval("(+ 1 2 3 4)").unwrap(), 10);
  }

  #[test]
  fn recovers_after_a_parse_error_that_leaves_names_bound() {
    let mut session = Session::new();
    // Missing the closing parens: `x` and `y` are bound but never popped,
    // since that only happens once `parse_abs` finishes successfully.
    assert!(session.eval("(lambda (x y) x").is_err());
    assert_eq!(session.eval("((lambda (y) y) 9)").unwrap(), 9);
  }
}
