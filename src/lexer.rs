//! Tokenizer.
//!
//! Identifiers and number literals are capped at ten bytes by the regexes
//! themselves: `logos` simply stops matching after the tenth character and
//! leaves the rest of the run to be lexed as a separate token, which is
//! exactly the truncate-and-continue behavior the longest overrun token
//! would otherwise need special-cased code to get right.

use logos::Logos;
use span::Span;

pub const MAX_LEXEME: usize = 10;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  #[token("lambda")]
  Lambda,

  #[regex("[a-zA-Z][a-zA-Z]?[a-zA-Z]?[a-zA-Z]?[a-zA-Z]?[a-zA-Z]?[a-zA-Z]?[a-zA-Z]?[a-zA-Z]?[a-zA-Z]?")]
  Var,

  #[regex("[0-9][0-9]?[0-9]?[0-9]?[0-9]?[0-9]?[0-9]?[0-9]?[0-9]?[0-9]?")]
  Num,

  #[token("(")]
  LParen,

  #[token(")")]
  RParen,

  #[token("+")]
  Plus,

  Eof,

  #[regex(r"[ \t\r\n]+", logos::skip)]
  Whitespace,

  #[error]
  Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub span: Span,
}

pub struct Lexer<'src> {
  src: &'src str,
  inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
  pub fn new(src: &'src str) -> Self {
    Self {
      src,
      inner: TokenKind::lexer(src),
    }
  }

  pub fn lexeme(&self, token: Token) -> &'src str {
    &self.src[token.span.range()]
  }

  /// Returns the next token, or an `Eof` token once the input is exhausted.
  /// An `Error` token means the byte at its span could not start any token.
  pub fn next(&mut self) -> Token {
    match self.inner.next() {
      Some(kind) => Token {
        kind,
        span: self.inner.span().into(),
      },
      None => {
        let end = self.src.len();
        Token {
          kind: TokenKind::Eof,
          span: (end, end).into(),
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds(src: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(src);
    let mut out = Vec::new();
    loop {
      let tok = lexer.next();
      if tok.kind == TokenKind::Eof {
        break;
      }
      out.push(tok.kind);
    }
    out
  }

  #[test]
  fn lexes_application() {
    use TokenKind::*;
    assert_eq!(kinds("(f x)"), vec![LParen, Var, Var, RParen]);
  }

  #[test]
  fn lexes_lambda_and_number() {
    use TokenKind::*;
    assert_eq!(
      kinds("(lambda x 42)"),
      vec![LParen, Lambda, Var, Num, RParen]
    );
  }

  #[test]
  fn identifier_longer_than_ten_bytes_splits_into_two_tokens() {
    let mut lexer = Lexer::new("abcdefghijk");
    let first = lexer.next();
    assert_eq!(first.kind, TokenKind::Var);
    assert_eq!(lexer.lexeme(first), "abcdefghij");
    let second = lexer.next();
    assert_eq!(second.kind, TokenKind::Var);
    assert_eq!(lexer.lexeme(second), "k");
  }

  #[test]
  fn unexpected_char_is_reported_as_error_token() {
    let mut lexer = Lexer::new("$");
    let tok = lexer.next();
    assert_eq!(tok.kind, TokenKind::Error);
    assert_eq!(lexer.lexeme(tok), "$");
  }
}
