//! The combinator intermediate representation.
//!
//! A parsed expression is lowered directly to a point-free term over nine
//! combinators (`Id`, `App`, `Quote`, `Plus`, `Fst`, `Snd`, `Comp`, `Pair`,
//! `Cur`); there is no separate named-variable AST. Nodes live in an
//! [`Ast`] pool and are addressed by [`AstId`]; `Comp`, `Pair` and `Cur`
//! are the only node kinds with children.

use crate::error::Result;
use crate::pool::{Id, Pool};

pub type AstId = Id<Node>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
  Id,
  App,
  Quote,
  Plus,
  Fst,
  Snd,
  Comp,
  Pair,
  Cur,
}

#[derive(Debug)]
pub struct Node {
  pub kind: Kind,
  /// Only meaningful for `Quote`.
  pub value: i64,
  /// Empty for the six leaf kinds, one entry for `Cur`, two for `Pair`,
  /// zero or more for `Comp`.
  pub children: Vec<AstId>,
}

pub struct Ast {
  pool: Pool<Node>,
}

impl Ast {
  pub fn new(capacity: usize) -> Self {
    Self {
      pool: Pool::new(capacity),
    }
  }

  pub fn get(&self, id: AstId) -> &Node {
    self.pool.get(id)
  }

  pub fn kind(&self, id: AstId) -> Kind {
    self.pool.get(id).kind
  }

  pub fn children(&self, id: AstId) -> &[AstId] {
    &self.pool.get(id).children
  }

  pub fn get_mut(&mut self, id: AstId) -> &mut Node {
    self.pool.get_mut(id)
  }

  fn alloc(&mut self, kind: Kind, value: i64, children: Vec<AstId>) -> Result<AstId> {
    Ok(self.pool.alloc(Node { kind, value, children })?)
  }

  pub fn id(&mut self) -> Result<AstId> {
    self.alloc(Kind::Id, 0, Vec::new())
  }

  pub fn app(&mut self) -> Result<AstId> {
    self.alloc(Kind::App, 0, Vec::new())
  }

  pub fn plus(&mut self) -> Result<AstId> {
    self.alloc(Kind::Plus, 0, Vec::new())
  }

  pub fn fst(&mut self) -> Result<AstId> {
    self.alloc(Kind::Fst, 0, Vec::new())
  }

  pub fn snd(&mut self) -> Result<AstId> {
    self.alloc(Kind::Snd, 0, Vec::new())
  }

  pub fn quote(&mut self, value: i64) -> Result<AstId> {
    self.alloc(Kind::Quote, value, Vec::new())
  }

  pub fn cur(&mut self, body: AstId) -> Result<AstId> {
    self.alloc(Kind::Cur, 0, vec![body])
  }

  pub fn pair(&mut self, left: AstId, right: AstId) -> Result<AstId> {
    self.alloc(Kind::Pair, 0, vec![left, right])
  }

  /// `Comp` with zero children is not a legal end state (the optimizer
  /// rewrites it to `Id` before it can be observed), but the raw
  /// constructor accepts any arity so the parser can build it incrementally.
  pub fn comp(&mut self, children: Vec<AstId>) -> Result<AstId> {
    if children.is_empty() {
      self.id()
    } else {
      self.alloc(Kind::Comp, 0, children)
    }
  }

  /// Two-ary composition, the shape the parser actually builds.
  pub fn comp2(&mut self, first: AstId, second: AstId) -> Result<AstId> {
    self.comp(vec![first, second])
  }

  /// Frees a single node's slot without touching its children. Used when
  /// the children have already been detached and reused elsewhere.
  pub fn free_node(&mut self, id: AstId) {
    self.pool.free(id);
  }

  /// Frees `id` and everything reachable from it. Used when a whole
  /// subtree is being discarded, e.g. the unselected side of `Fst`/`Snd`.
  pub fn free_subtree(&mut self, id: AstId) {
    let children = std::mem::take(&mut self.pool.get_mut(id).children);
    for child in children {
      self.free_subtree(child);
    }
    self.pool.free(id);
  }

  pub fn clear(&mut self) {
    self.pool.clear();
  }

  pub fn capacity(&self) -> usize {
    self.pool.capacity()
  }
}

/// What a visit hook wants the walker to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Skip,
}

/// The traversal protocol over [`Ast`] trees.
///
/// Every method has a no-op default so a visitor only overrides the hooks
/// it cares about. Leaf kinds (`Id`, `App`, `Quote`, `Plus`, `Fst`, `Snd`)
/// get a single visit call each; the three parent kinds (`Comp`, `Pair`,
/// `Cur`) get a pre-hook before their children are walked, and `Pair`
/// additionally gets an in-hook between its first and second child. `Comp`
/// and `Cur` get a post-hook once their children are done; `Pair`'s
/// post-hook follows the same rule. A pre-hook returning [`Flow::Skip`]
/// suppresses the walk into that node's children, but the post-hook for
/// `Comp`/`Pair`/`Cur` still runs.
pub trait Visitor {
  fn visit_id(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn visit_app(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn visit_quote(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn visit_plus(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn visit_fst(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn visit_snd(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn pre_comp(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn post_comp(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    Ok(())
  }
  fn pre_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn in_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    Ok(())
  }
  fn post_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    Ok(())
  }
  fn pre_cur(&mut self, _ast: &Ast, _id: AstId) -> Result<Flow> {
    Ok(Flow::Continue)
  }
  fn post_cur(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
    Ok(())
  }
}

/// Drives a [`Visitor`] over the tree rooted at `id`.
pub fn walk<V: Visitor>(ast: &Ast, id: AstId, visitor: &mut V) -> Result<()> {
  let kind = ast.kind(id);
  let flow = match kind {
    Kind::Id => visitor.visit_id(ast, id)?,
    Kind::App => visitor.visit_app(ast, id)?,
    Kind::Quote => visitor.visit_quote(ast, id)?,
    Kind::Plus => visitor.visit_plus(ast, id)?,
    Kind::Fst => visitor.visit_fst(ast, id)?,
    Kind::Snd => visitor.visit_snd(ast, id)?,
    Kind::Comp => visitor.pre_comp(ast, id)?,
    Kind::Pair => visitor.pre_pair(ast, id)?,
    Kind::Cur => visitor.pre_cur(ast, id)?,
  };

  if flow == Flow::Continue {
    let children = ast.children(id).to_vec();
    if let Some((first, rest)) = children.split_first() {
      walk(ast, *first, visitor)?;
      if kind == Kind::Pair {
        visitor.in_pair(ast, id)?;
      }
      for child in rest {
        walk(ast, *child, visitor)?;
      }
    }
  }

  match kind {
    Kind::Comp => visitor.post_comp(ast, id)?,
    Kind::Pair => visitor.post_pair(ast, id)?,
    Kind::Cur => visitor.post_cur(ast, id)?,
    _ => {}
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn comp_with_no_children_becomes_id() {
    let mut ast = Ast::new(16);
    let id = ast.comp(Vec::new()).unwrap();
    assert_eq!(ast.kind(id), Kind::Id);
  }

  #[test]
  fn walk_visits_pair_children_in_order_with_in_hook() {
    struct Trace(Vec<&'static str>);
    impl Visitor for Trace {
      fn visit_quote(&mut self, ast: &Ast, id: AstId) -> Result<Flow> {
        self.0.push(if ast.get(id).value == 1 { "left" } else { "right" });
        Ok(Flow::Continue)
      }
      fn in_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
        self.0.push("in");
        Ok(())
      }
      fn post_pair(&mut self, _ast: &Ast, _id: AstId) -> Result<()> {
        self.0.push("post");
        Ok(())
      }
    }

    let mut ast = Ast::new(16);
    let l = ast.quote(1).unwrap();
    let r = ast.quote(2).unwrap();
    let pair = ast.pair(l, r).unwrap();

    let mut trace = Trace(Vec::new());
    walk(&ast, pair, &mut trace).unwrap();
    assert_eq!(trace.0, vec!["left", "in", "right", "post"]);
  }

  #[test]
  fn free_subtree_removes_every_descendant() {
    let mut ast = Ast::new(16);
    let l = ast.quote(1).unwrap();
    let r = ast.quote(2).unwrap();
    let pair = ast.pair(l, r).unwrap();
    ast.free_subtree(pair);
    assert!(ast.pool.is_empty());
  }
}
