use std::fs;
use std::io::{self, Write};

use cam::session::Session;
use clap::Parser as _;

const MAX_LINE: usize = 255;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Evaluate every line of this file instead of starting an interactive
  /// REPL.
  script: Option<std::path::PathBuf>,

  /// Print the optimized combinator tree before executing each line.
  #[arg(long)]
  dump_ir: bool,
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  match &cli.script {
    Some(path) => run_script(path, cli.dump_ir),
    None => run_repl(cli.dump_ir),
  }
}

fn run_script(path: &std::path::Path, dump_ir: bool) -> anyhow::Result<()> {
  let source = fs::read_to_string(path)?;
  let mut session = Session::new();
  let stdout = io::stdout();
  let mut out = stdout.lock();
  for line in source.lines() {
    if line == "halt" {
      return Ok(());
    }
    if line.len() > MAX_LINE {
      eprintln!("Input too long.");
      continue;
    }
    eval_line(&mut session, line, dump_ir, &mut out);
  }
  Ok(())
}

fn run_repl(dump_ir: bool) -> anyhow::Result<()> {
  let mut editor = rustyline::Editor::<()>::new()?;
  let mut session = Session::new();
  let stdout = io::stdout();
  let mut out = stdout.lock();

  println!(
    "cam REPL v{}\nPress CTRL-D or type halt to exit",
    env!("CARGO_PKG_VERSION")
  );

  loop {
    let line = match editor.readline("> ") {
      Ok(line) => line,
      Err(rustyline::error::ReadlineError::Eof)
      | Err(rustyline::error::ReadlineError::Interrupted) => return Ok(()),
      Err(e) => return Err(e.into()),
    };
    editor.add_history_entry(&line);

    if line == "halt" {
      return Ok(());
    }
    if line.len() > MAX_LINE {
      eprintln!("Input too long.");
      continue;
    }
    eval_line(&mut session, &line, dump_ir, &mut out);
  }
}

fn eval_line(session: &mut Session, line: &str, dump_ir: bool, out: &mut impl Write) {
  if dump_ir {
    if let Some(ir) = session.dump_ir(line) {
      let _ = writeln!(out, "{ir}");
    }
  }
  match session.eval(line) {
    Ok(n) => {
      let _ = writeln!(out, "{n}");
    }
    Err(e) => {
      let color = supports_color::on(supports_color::Stream::Stderr)
        .map(|c| c.has_basic)
        .unwrap_or(false);
      let _ = e.emit(&mut io::stderr(), color);
    }
  }
}
