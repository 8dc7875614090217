//! Pretty-printer for the combinator tree, used by the REPL's `--dump-ir`
//! flag to show what a line lowered and optimized to.

use std::fmt::Write;

use crate::ast::{Ast, AstId, Kind};

pub fn disassemble(ast: &Ast, root: AstId) -> String {
  let mut out = String::new();
  write_node(ast, root, &mut out);
  out
}

fn write_node(ast: &Ast, id: AstId, out: &mut String) {
  match ast.kind(id) {
    Kind::Id => out.push_str("ID"),
    Kind::App => out.push_str("APP"),
    Kind::Plus => out.push_str("PLUS"),
    Kind::Fst => out.push_str("FST"),
    Kind::Snd => out.push_str("SND"),
    Kind::Quote => {
      write!(out, "QUOTE({})", ast.get(id).value).unwrap();
    }
    Kind::Cur => {
      out.push_str("CUR(");
      write_node(ast, ast.children(id)[0], out);
      out.push(')');
    }
    Kind::Pair => {
      out.push_str("PAIR(");
      write_node(ast, ast.children(id)[0], out);
      out.push_str(", ");
      write_node(ast, ast.children(id)[1], out);
      out.push(')');
    }
    Kind::Comp => {
      out.push_str("COMP(");
      for (i, child) in ast.children(id).iter().enumerate() {
        if i > 0 {
          out.push_str(", ");
        }
        write_node(ast, *child, out);
      }
      out.push(')');
    }
  }
}
