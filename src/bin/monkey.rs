//! Monkey interpreter command line.
//!
//! When called without arguments it drops into an interactive
//! read-evaluate-print loop.
//!
//! When called with arguments, it interprets the corresponding files in a
//! single interpreter session (so definitions are shared between files).

use std::env;
use std::fs;
use std::io;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use monkey::interpreter::Interpreter;
use monkey::object::Object;

const PROMPT: &str = ">> ";

fn main() -> anyhow::Result<()> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if !args.is_empty() {
        run_all_files(args)
    } else {
        run_prompt()
    }
}

fn run_all_files(paths: Vec<String>) -> anyhow::Result<()> {
    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::new(&mut interp_stdout);

    for path in &paths {
        let source =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
        match interp.eval(&source) {
            Ok(Object::Error(message)) => anyhow::bail!("{}: ERROR: {}", path, message),
            Ok(_) => (),
            Err(errors) => anyhow::bail!("{}: parse errors:\n{}", path, errors),
        }
    }

    Ok(())
}

fn run_prompt() -> anyhow::Result<()> {
    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::new(&mut interp_stdout);
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                match interp.eval(&line) {
                    Ok(result) => println!("{}", result),
                    Err(errors) => {
                        for error in &errors.0 {
                            println!("\t{}", error);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
