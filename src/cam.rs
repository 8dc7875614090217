//! The categorical abstract machine.
//!
//! Interprets a combinator tree by keeping one `env` register and a save
//! stack, driven by the same [`Visitor`]/[`walk`] protocol the optimizer
//! uses. `APP` is the only hook that recurses outside the current walk: it
//! rebinds `env` to the closure's body and calls [`walk`] again directly,
//! so a chain of applications runs as ordinary Rust call recursion rather
//! than an explicit trampoline.

use crate::ast::{walk, Ast, AstId, Flow, Visitor};
use crate::env::{Env, EnvId, Value};
use crate::error::{Error, Result};

pub struct Cam<'env> {
  env_pool: &'env mut Env,
  env: EnvId,
  stack: Vec<EnvId>,
}

impl<'env> Cam<'env> {
  pub fn new(env_pool: &'env mut Env) -> Result<Self> {
    let env = env_pool.nil()?;
    Ok(Self {
      env_pool,
      env,
      stack: Vec::new(),
    })
  }

  /// Runs `code` to completion against an empty environment and returns
  /// the resulting value.
  pub fn run(ast: &Ast, code: AstId, env_pool: &'env mut Env) -> Result<Value> {
    let mut cam = Self::new(env_pool)?;
    walk(ast, code, &mut cam)?;
    debug_assert!(cam.stack.is_empty(), "save stack not empty at end of run");
    Ok(cam.env_pool.get(cam.env))
  }
}

impl<'env> Visitor for Cam<'env> {
  fn visit_quote(&mut self, ast: &Ast, id: AstId) -> Result<Flow> {
    self.env_pool.free(self.env);
    self.env = self.env_pool.int(ast.get(id).value)?;
    Ok(Flow::Continue)
  }

  fn visit_fst(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    match self.env_pool.get(self.env) {
      Value::Pair(l, r) => {
        self.env_pool.free_node(self.env);
        self.env_pool.free(r);
        self.env = l;
      }
      _ => return Err(Error::Invariant("FST ran against a non-Pair environment")),
    }
    Ok(Flow::Continue)
  }

  fn visit_snd(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    match self.env_pool.get(self.env) {
      Value::Pair(l, r) => {
        self.env_pool.free_node(self.env);
        self.env_pool.free(l);
        self.env = r;
      }
      _ => return Err(Error::Invariant("SND ran against a non-Pair environment")),
    }
    Ok(Flow::Continue)
  }

  fn pre_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    let saved = self.env_pool.deep_copy(self.env)?;
    self.stack.push(saved);
    Ok(Flow::Continue)
  }

  fn in_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    let saved = self.stack.pop().expect("PAIR in-hook with an empty save stack");
    self.stack.push(self.env);
    self.env = saved;
    Ok(())
  }

  fn post_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    let left = self.stack.pop().expect("PAIR post-hook with an empty save stack");
    self.env = self.env_pool.pair(left, self.env)?;
    Ok(())
  }

  fn pre_cur(&mut self, ast: &Ast, id: AstId) -> Result<Flow> {
    let body = ast.children(id)[0];
    self.env = self.env_pool.closure(self.env, body)?;
    Ok(Flow::Skip)
  }

  fn visit_app(&mut self, ast: &Ast, _id: AstId) -> Result<Flow> {
    let pair_id = self.env;
    let (closure_id, arg) = match self.env_pool.get(pair_id) {
      Value::Pair(c, a) => (c, a),
      _ => return Err(Error::Invariant("APP ran against a non-Pair environment")),
    };
    let (ctx, code) = match self.env_pool.get(closure_id) {
      Value::Closure(ctx, code) => (ctx, code),
      _ => return Err(Error::Invariant("APP's left operand is not a Closure")),
    };
    self.env_pool.free_node(closure_id);
    self.env_pool.free_node(pair_id);
    self.env = self.env_pool.pair(ctx, arg)?;
    walk(ast, code, self)?;
    Ok(Flow::Continue)
  }

  fn visit_plus(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    let pair_id = self.env;
    let (l, r) = match self.env_pool.get(pair_id) {
      Value::Pair(l, r) => (l, r),
      _ => return Err(Error::Invariant("PLUS ran against a non-Pair environment")),
    };
    let a = match self.env_pool.get(l) {
      Value::Int(n) => n,
      _ => return Err(Error::Invariant("PLUS's left operand is not an Int")),
    };
    let b = match self.env_pool.get(r) {
      Value::Int(n) => n,
      _ => return Err(Error::Invariant("PLUS's right operand is not an Int")),
    };
    self.env_pool.free_node(l);
    self.env_pool.free_node(r);
    self.env_pool.free_node(pair_id);
    self.env = self.env_pool.int(a + b)?;
    Ok(Flow::Continue)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::optimize::optimize;
  use crate::parser::parse;
  use crate::pool::DEFAULT_CAPACITY;

  fn eval(src: &str) -> i64 {
    let mut ast = Ast::new(DEFAULT_CAPACITY);
    let root = parse(&mut ast, src).unwrap();
    let root = optimize(&mut ast, root).unwrap();
    let mut env = Env::new(DEFAULT_CAPACITY);
    match Cam::run(&ast, root, &mut env).unwrap() {
      Value::Int(n) => n,
      other => panic!("expected an Int result, got {other:?}"),
    }
  }

  #[test]
  fn evaluates_a_literal() {
    assert_eq!(eval("42"), 42);
  }

  #[test]
  fn evaluates_a_variadic_sum() {
    assert_eq!(eval("(+ 1 2 3 4)"), 10);
  }

  #[test]
  fn evaluates_identity_application() {
    assert_eq!(eval("((lambda (x) x) 7)"), 7);
  }

  #[test]
  fn evaluates_multi_argument_lambda() {
    assert_eq!(eval("((lambda (x y) (+ x y)) 3 4)"), 7);
  }

  #[test]
  fn evaluates_a_function_passed_as_an_argument() {
    assert_eq!(
      eval("((lambda (f x) (f x x)) (lambda (a b) (+ a b)) 5)"),
      10
    );
  }
}
