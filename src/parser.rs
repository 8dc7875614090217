//! Recursive-descent parser and lowering to combinator IR.
//!
//! ```text
//! expr   ::= VAR | NUM
//!          | '(' '+' expr expr { expr } ')'
//!          | '(' 'lambda' '(' VAR { VAR } ')' expr ')'
//!          | '(' expr { expr } ')'
//! ```
//! The last form is a left-associative application whose head is itself an
//! `expr` (almost always a literal lambda, but nothing stops it from being
//! a bound variable — `(f x x)` inside `(lambda (f x) (f x x))` is exactly
//! that case). Variable resolution and the lowering to `ID`/`APP`/`COMP`/
//! `PAIR`/`CUR`/`PLUS` nodes happen inline, during parsing: there is no
//! separate named-variable AST this crate ever materializes.

use crate::ast::{Ast, AstId};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::pool::{Id, Pool};

type SymbolId = Id<String>;

/// The bound-name stack a parse threads through nested `lambda`s. Owns its
/// names (rather than borrowing from the source text) so it can outlive any
/// one parse and be reused, and bulk-reset, across a [`Session`](crate::session::Session)'s
/// lifetime the same way the `Ast` and `Env` pools are.
pub struct Scope {
  symbols: Pool<String>,
  bound: Vec<SymbolId>,
}

impl Scope {
  pub fn new(capacity: usize) -> Self {
    Self {
      symbols: Pool::new(capacity),
      bound: Vec::new(),
    }
  }

  fn push(&mut self, name: &str) -> Result<()> {
    let id = self.symbols.alloc(name.to_string())?;
    self.bound.push(id);
    Ok(())
  }

  fn pop(&mut self) {
    let id = self.bound.pop().expect("scope underflow");
    self.symbols.free(id);
  }

  /// 0-based distance from the most recently bound name, or `None` if
  /// `name` is not in scope.
  fn resolve(&self, name: &str) -> Option<usize> {
    self
      .bound
      .iter()
      .rev()
      .position(|&id| self.symbols.get(id) == name)
  }

  /// Bulk-resets the symbol pool. Used after a failed parse leaves names
  /// bound partway through a `lambda`'s parameter list or body.
  pub fn clear(&mut self) {
    self.symbols.clear();
    self.bound.clear();
  }
}

pub struct Parser<'ast, 'src> {
  ast: &'ast mut Ast,
  lexer: Lexer<'src>,
  current: Token,
  scope: &'ast mut Scope,
}

impl<'ast, 'src> Parser<'ast, 'src> {
  pub fn new(ast: &'ast mut Ast, scope: &'ast mut Scope, src: &'src str) -> Self {
    let mut lexer = Lexer::new(src);
    let current = lexer.next();
    Self {
      ast,
      lexer,
      current,
      scope,
    }
  }

  fn bump(&mut self) {
    self.current = self.lexer.next();
  }

  fn lexeme(&self) -> &'src str {
    self.lexer.lexeme(self.current)
  }

  fn expect(&mut self, kind: TokenKind) -> Result<()> {
    match self.current.kind {
      k if k == kind => {
        self.bump();
        Ok(())
      }
      TokenKind::Eof => Err(Error::unexpected_end(self.current.span)),
      TokenKind::Error => Err(Error::unexpected_char(
        self.lexeme().chars().next().unwrap_or('\u{0}'),
        self.current.span,
      )),
      _ => Err(Error::unexpected_token(self.lexeme(), self.current.span)),
    }
  }

  fn at(&self, kind: TokenKind) -> bool {
    self.current.kind == kind
  }

  pub fn parse(mut self) -> Result<AstId> {
    self.parse_expr()
  }

  fn parse_expr(&mut self) -> Result<AstId> {
    match self.current.kind {
      TokenKind::Var => {
        let name = self.lexeme();
        let span = self.current.span;
        self.bump();
        self.parse_var(name, span)
      }
      TokenKind::Num => {
        let lexeme = self.lexeme();
        self.bump();
        let value: i64 = lexeme.parse().expect("lexer only emits ASCII digit runs");
        self.ast.quote(value)
      }
      TokenKind::LParen => {
        self.bump();
        if self.at(TokenKind::Plus) {
          self.bump();
          self.parse_sum()
        } else if self.at(TokenKind::Lambda) {
          self.bump();
          self.parse_abs()
        } else {
          self.parse_app()
        }
      }
      TokenKind::Eof => Err(Error::unexpected_end(self.current.span)),
      TokenKind::Error => Err(Error::unexpected_char(
        self.lexeme().chars().next().unwrap_or('\u{0}'),
        self.current.span,
      )),
      _ => Err(Error::unexpected_token(self.lexeme(), self.current.span)),
    }
  }

  fn parse_var(&mut self, name: &'src str, span: span::Span) -> Result<AstId> {
    let k = self
      .scope
      .resolve(name)
      .ok_or_else(|| Error::unbound_variable(name, span))?;
    let mut children = Vec::with_capacity(k + 1);
    for _ in 0..k {
      children.push(self.ast.fst()?);
    }
    children.push(self.ast.snd()?);
    self.ast.comp(children)
  }

  fn plus_step(&mut self, acc: AstId, arg: AstId) -> Result<AstId> {
    let pair = self.ast.pair(acc, arg)?;
    let plus = self.ast.plus()?;
    self.ast.comp2(pair, plus)
  }

  /// Entered just after consuming `+`.
  fn parse_sum(&mut self) -> Result<AstId> {
    let first = self.parse_expr()?;
    let second = self.parse_expr()?;
    let mut acc = self.plus_step(first, second)?;
    while !self.at(TokenKind::RParen) {
      let arg = self.parse_expr()?;
      acc = self.plus_step(acc, arg)?;
    }
    self.expect(TokenKind::RParen)?;
    Ok(acc)
  }

  /// Entered just after consuming `lambda`.
  fn parse_abs(&mut self) -> Result<AstId> {
    self.expect(TokenKind::LParen)?;
    self.bind_param()?;
    let mut arity = 1;
    while !self.at(TokenKind::RParen) {
      self.bind_param()?;
      arity += 1;
    }
    self.expect(TokenKind::RParen)?;
    let body = self.parse_expr()?;
    self.expect(TokenKind::RParen)?;

    let mut node = body;
    for _ in 0..arity {
      node = self.ast.cur(node)?;
      self.scope.pop();
    }
    Ok(node)
  }

  fn bind_param(&mut self) -> Result<()> {
    match self.current.kind {
      TokenKind::Var => {
        let name = self.lexeme();
        self.bump();
        self.scope.push(name)
      }
      TokenKind::Eof => Err(Error::unexpected_end(self.current.span)),
      _ => Err(Error::unexpected_token(self.lexeme(), self.current.span)),
    }
  }

  /// Entered just after consuming the application's opening `(`, with the
  /// head expression still unparsed.
  fn parse_app(&mut self) -> Result<AstId> {
    let mut acc = self.parse_expr()?;
    while !self.at(TokenKind::RParen) {
      let arg = self.parse_expr()?;
      let pair = self.ast.pair(acc, arg)?;
      let app = self.ast.app()?;
      acc = self.ast.comp2(pair, app)?;
    }
    self.expect(TokenKind::RParen)?;
    Ok(acc)
  }
}

/// Parses `src` in `scope`, threading a caller-owned symbol pool through the
/// parse. Used by [`Session`](crate::session::Session), whose scope pool
/// persists (and is bulk-reset) across lines the same way its `Ast`/`Env`
/// pools do.
pub fn parse_in(ast: &mut Ast, scope: &mut Scope, src: &str) -> Result<AstId> {
  Parser::new(ast, scope, src).parse()
}

/// Parses `src` with a fresh, one-shot scope. Convenient for callers (tests,
/// mainly) that only ever parse a single line and don't need the symbol pool
/// to outlive the call.
pub fn parse(ast: &mut Ast, src: &str) -> Result<AstId> {
  let mut scope = Scope::new(crate::pool::DEFAULT_CAPACITY);
  parse_in(ast, &mut scope, src)
}
