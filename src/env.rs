//! The CAM's value model: `Nil | Int | Pair | Closure`.
//!
//! Values live in their own pool, separate from the `Ast` pool that holds
//! the (read-only, during execution) combinator tree. A `Closure`'s `code`
//! field is an `AstId` borrowed from that tree, never owned by the `Env`
//! pool and never freed through it.

use crate::ast::AstId;
use crate::error::Result;
use crate::pool::{Id, Pool};

pub type EnvId = Id<Value>;

#[derive(Debug, Clone, Copy)]
pub enum Value {
  Nil,
  Int(i64),
  Pair(EnvId, EnvId),
  Closure(EnvId, AstId),
}

pub struct Env {
  pool: Pool<Value>,
}

impl Env {
  pub fn new(capacity: usize) -> Self {
    Self {
      pool: Pool::new(capacity),
    }
  }

  pub fn get(&self, id: EnvId) -> Value {
    *self.pool.get(id)
  }

  pub fn nil(&mut self) -> Result<EnvId> {
    Ok(self.pool.alloc(Value::Nil)?)
  }

  pub fn int(&mut self, n: i64) -> Result<EnvId> {
    Ok(self.pool.alloc(Value::Int(n))?)
  }

  pub fn pair(&mut self, left: EnvId, right: EnvId) -> Result<EnvId> {
    Ok(self.pool.alloc(Value::Pair(left, right))?)
  }

  pub fn closure(&mut self, ctx: EnvId, code: AstId) -> Result<EnvId> {
    Ok(self.pool.alloc(Value::Closure(ctx, code))?)
  }

  /// Recursively duplicates `id`. Used by `PAIR`'s pre-hook: both branches
  /// of a pair run against the same starting environment, so the original
  /// must survive the first branch's in-place mutation.
  pub fn deep_copy(&mut self, id: EnvId) -> Result<EnvId> {
    match self.get(id) {
      Value::Nil => self.nil(),
      Value::Int(n) => self.int(n),
      Value::Pair(l, r) => {
        let l = self.deep_copy(l)?;
        let r = self.deep_copy(r)?;
        self.pair(l, r)
      }
      Value::Closure(ctx, code) => {
        let ctx = self.deep_copy(ctx)?;
        self.closure(ctx, code)
      }
    }
  }

  /// Frees a single slot without touching whatever it pointed to. Used
  /// when the value's children are about to be reused elsewhere, e.g. the
  /// closure record and applicand pair that `APP` discards while keeping
  /// their contents.
  pub fn free_node(&mut self, id: EnvId) {
    self.pool.free(id);
  }

  /// Frees `id` and, recursively, everything it owns (a pair's two
  /// branches, a closure's captured context). Never follows a closure's
  /// `code`, which belongs to the `Ast` pool.
  pub fn free(&mut self, id: EnvId) {
    match self.get(id) {
      Value::Nil | Value::Int(_) => {}
      Value::Pair(l, r) => {
        self.free(l);
        self.free(r);
      }
      Value::Closure(ctx, _) => self.free(ctx),
    }
    self.pool.free(id);
  }

  pub fn clear(&mut self) {
    self.pool.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deep_copy_produces_independent_pair() {
    let mut env = Env::new(16);
    let a = env.int(1).unwrap();
    let b = env.int(2).unwrap();
    let pair = env.pair(a, b).unwrap();
    let copy = env.deep_copy(pair).unwrap();
    assert_ne!(copy, pair);
    if let Value::Pair(l, r) = env.get(copy) {
      assert_ne!(l, a);
      assert_ne!(r, b);
      assert!(matches!(env.get(l), Value::Int(1)));
      assert!(matches!(env.get(r), Value::Int(2)));
    } else {
      panic!("expected Pair");
    }
  }
}
