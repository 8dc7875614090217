//! A REPL for a small lambda calculus, evaluated on a categorical abstract
//! machine.
//!
//! A line of source runs through four stages, each its own module: [`lexer`]
//! and [`parser`] turn it into a point-free [`ast::Ast`] over nine
//! combinators, [`optimize`] rewrites that tree to a fixed point, and
//! [`cam`] interprets the result. [`pool`] underlies all three node types
//! (`ast::Node`, `env::Value`, and the parser's bound-name symbols) with a
//! fixed-capacity arena, so a line that runs away hits a diagnostic instead
//! of unbounded memory growth. [`session`] bundles the pools an evaluation
//! needs and resets them after every line, successful or not.

pub mod ast;
pub mod cam;
pub mod disasm;
pub mod env;
pub mod error;
pub mod lexer;
pub mod optimize;
pub mod parser;
pub mod pool;
pub mod session;

pub use error::{Error, Result};
pub use session::Session;
