//! Peephole optimizer.
//!
//! Walks the input tree read-only and rebuilds it into a fresh `Ast` on an
//! explicit stack of entries, each either a `Placeholder` for a parent whose
//! children are still arriving or a `Built` entry (an id into the *output*
//! tree) for a finished subtree. The post-hook for `Comp`/`Pair`/`Cur` pops
//! entries until it finds its own placeholder, possibly folding `Id`
//! children away and splicing nested `Comp`s as it goes, then pushes one
//! finished entry for the node it just closed. `optimize` drives this to a
//! fixed point: each pass rebuilds the whole tree into a new pool and
//! reports how many rewrites it made, discarding the previous pool once the
//! new one is in hand. The driver stops once a pass makes no rewrites.

use crate::ast::{walk, Ast, AstId, Flow, Kind, Visitor};
use crate::error::Result;

enum Entry {
  Placeholder(Kind),
  Built(AstId),
}

struct Optimizer {
  output: Ast,
  stack: Vec<Entry>,
  mutations: usize,
}

impl Optimizer {
  fn new(capacity: usize) -> Self {
    Self {
      output: Ast::new(capacity),
      stack: Vec::new(),
      mutations: 0,
    }
  }

  fn leaf_copy(&mut self, kind: Kind, value: i64) -> Result<Flow> {
    let copy = match kind {
      Kind::Id => self.output.id()?,
      Kind::Quote => self.output.quote(value)?,
      Kind::Plus => self.output.plus()?,
      _ => unreachable!("leaf_copy only called for Id/Quote/Plus"),
    };
    self.stack.push(Entry::Built(copy));
    Ok(Flow::Continue)
  }

  fn completed_pair(&self) -> Option<AstId> {
    match self.stack.last() {
      Some(Entry::Built(id)) if self.output.kind(*id) == Kind::Pair => Some(*id),
      _ => None,
    }
  }

  fn project(&mut self, keep: usize, drop: usize, pair_id: AstId) -> Result<Flow> {
    self.stack.pop();
    let kept = self.output.children(pair_id)[keep];
    let dropped = self.output.children(pair_id)[drop];
    self.output.free_subtree(dropped);
    self.output.free_node(pair_id);
    self.mutations += 1;
    self.stack.push(Entry::Built(kept));
    Ok(Flow::Skip)
  }

  fn post_parent(&mut self, kind: Kind) -> Result<()> {
    let mut reversed = Vec::new();
    loop {
      match self.stack.pop().expect("rebuild stack underflow") {
        Entry::Placeholder(k) => {
          debug_assert_eq!(k, kind, "rebuild stack placeholder mismatch");
          break;
        }
        Entry::Built(child) => {
          if kind == Kind::Comp {
            match self.output.kind(child) {
              Kind::Id => {
                self.output.free_node(child);
                self.mutations += 1;
                continue;
              }
              Kind::Comp => {
                let inner = self.output.children(child).to_vec();
                for c in inner.into_iter().rev() {
                  reversed.push(c);
                }
                self.output.free_node(child);
                self.mutations += 1;
                continue;
              }
              _ => {}
            }
          }
          reversed.push(child);
        }
      }
    }
    reversed.reverse();
    let built = match kind {
      Kind::Comp => self.output.comp(reversed)?,
      Kind::Pair => self.output.pair(reversed[0], reversed[1])?,
      Kind::Cur => self.output.cur(reversed[0])?,
      _ => unreachable!("post_parent only called for Comp/Pair/Cur"),
    };
    self.stack.push(Entry::Built(built));
    Ok(())
  }
}

impl Visitor for Optimizer {
  fn visit_id(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    self.leaf_copy(Kind::Id, 0)
  }

  fn visit_quote(&mut self, ast: &Ast, id: AstId) -> Result<Flow> {
    self.leaf_copy(Kind::Quote, ast.get(id).value)
  }

  fn visit_plus(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    self.leaf_copy(Kind::Plus, 0)
  }

  fn visit_fst(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    if let Some(pair_id) = self.completed_pair() {
      return self.project(0, 1, pair_id);
    }
    let node = self.output.fst()?;
    self.stack.push(Entry::Built(node));
    Ok(Flow::Continue)
  }

  fn visit_snd(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    if let Some(pair_id) = self.completed_pair() {
      return self.project(1, 0, pair_id);
    }
    let node = self.output.snd()?;
    self.stack.push(Entry::Built(node));
    Ok(Flow::Continue)
  }

  fn visit_app(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    if let Some(pair_id) = self.completed_pair() {
      let left = self.output.children(pair_id)[0];
      if self.output.kind(left) == Kind::Cur {
        let body = self.output.children(left)[0];
        let fresh_id = self.output.id()?;
        self.output.get_mut(pair_id).children[0] = fresh_id;
        self.output.free_node(left);
        self.mutations += 1;
        self.stack.push(Entry::Built(body));
        return Ok(Flow::Skip);
      }
    }
    let node = self.output.app()?;
    self.stack.push(Entry::Built(node));
    Ok(Flow::Continue)
  }

  fn pre_comp(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    self.stack.push(Entry::Placeholder(Kind::Comp));
    Ok(Flow::Continue)
  }
  fn post_comp(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    self.post_parent(Kind::Comp)
  }

  fn pre_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    self.stack.push(Entry::Placeholder(Kind::Pair));
    Ok(Flow::Continue)
  }
  fn post_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    self.post_parent(Kind::Pair)
  }

  fn pre_cur(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    self.stack.push(Entry::Placeholder(Kind::Cur));
    Ok(Flow::Continue)
  }
  fn post_cur(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    self.post_parent(Kind::Cur)
  }
}

/// Runs one optimization pass over `root`, returning the rebuilt tree (a
/// fresh pool, entirely independent of `ast`) together with its root and
/// how many rewrites fired.
fn pass(ast: &Ast, root: AstId) -> Result<(Ast, AstId, usize)> {
  let mut optimizer = Optimizer::new(ast.capacity());
  walk(ast, root, &mut optimizer)?;
  let mutations = optimizer.mutations;
  let new_root = match optimizer.stack.pop() {
    Some(Entry::Built(id)) => id,
    _ => unreachable!("a complete pass leaves exactly one built entry"),
  };
  debug_assert!(optimizer.stack.is_empty());
  Ok((optimizer.output, new_root, mutations))
}

/// Repeatedly rewrites `root` until a pass performs zero mutations,
/// returning the final tree's root. `*ast` is replaced with the rebuilt
/// pool on every pass; the previous pool is simply dropped.
pub fn optimize(ast: &mut Ast, mut root: AstId) -> Result<AstId> {
  loop {
    let (new_ast, new_root, mutations) = pass(ast, root)?;
    *ast = new_ast;
    root = new_root;
    if mutations == 0 {
      return Ok(root);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::parse;

  fn optimized_kind_chain(src: &str) -> Vec<Kind> {
    let mut ast = Ast::new(crate::pool::DEFAULT_CAPACITY);
    let root = parse(&mut ast, src).unwrap();
    let root = optimize(&mut ast, root).unwrap();
    fn collect(ast: &Ast, id: AstId, out: &mut Vec<Kind>) {
      out.push(ast.kind(id));
      for child in ast.children(id) {
        collect(ast, *child, out);
      }
    }
    let mut out = Vec::new();
    collect(&ast, root, &mut out);
    out
  }

  #[test]
  fn identity_application_reduces_to_quote() {
    // ((lambda (x) x) 7) beta-reduces and projects down to QUOTE(7) wrapped
    // in a single-child COMP: the fixed point folds away every ID and PAIR
    // along the way, but a one-child COMP has no rule that drops the COMP
    // itself (only an empty one rewrites to ID).
    assert_eq!(
      optimized_kind_chain("((lambda (x) x) 7)"),
      vec![Kind::Comp, Kind::Quote]
    );
  }

  #[test]
  fn optimizing_twice_is_the_same_as_once() {
    let mut ast = Ast::new(crate::pool::DEFAULT_CAPACITY);
    let root = parse(&mut ast, "((lambda (x y) (+ x y)) 3 4)").unwrap();
    let once = optimize(&mut ast, root).unwrap();
    let (_second_ast, _twice, mutations) = pass(&ast, once).unwrap();
    assert_eq!(mutations, 0);
  }

  fn fixed_point(src: &str) -> String {
    let mut ast = Ast::new(crate::pool::DEFAULT_CAPACITY);
    let root = parse(&mut ast, src).unwrap();
    let root = optimize(&mut ast, root).unwrap();
    crate::disasm::disassemble(&ast, root)
  }

  #[test]
  fn fixed_point_of_a_literal_is_unchanged() {
    assert_eq!(fixed_point("42"), "QUOTE(42)");
  }

  #[test]
  fn fixed_point_of_an_identity_application_drops_the_closure_and_pair() {
    assert_eq!(fixed_point("((lambda (x) x) 7)"), "COMP(QUOTE(7))");
  }
}
