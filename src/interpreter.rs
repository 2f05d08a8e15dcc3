//! API to control the interpreter.

use std::io::prelude::*;
use std::rc::Rc;

use crate::diag::ParseErrors;
use crate::env::Environment;
use crate::eval::Evaluator;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;

/// Tree-walk interpreter with a persistent top-level environment.
///
/// Each call to [`eval`](Interpreter::eval) runs `lex → parse → eval`
/// against the same environment, so definitions accumulate across calls the
/// way a REPL session expects.
///
/// # Example
///
/// Define a function in one call and apply it in later ones:
///
/// ```
/// use monkey::interpreter::Interpreter;
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// interp.eval("let newAdder = fn(x) { fn(y) { x + y } };").expect("parse error");
/// interp.eval("let addTwo = newAdder(2);").expect("parse error");
/// let result = interp.eval("addTwo(3);").expect("parse error");
///
/// assert_eq!(result.to_string(), "5");
/// ```
#[derive(Debug)]
pub struct Interpreter<'a, W: Write> {
    evaluator: Evaluator<'a, W>,
    env: Rc<Environment>,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(output: &'a mut W) -> Interpreter<'a, W> {
        Interpreter {
            evaluator: Evaluator::new(output),
            env: Environment::new(),
        }
    }

    /// Runs `source` through the pipeline.
    ///
    /// Nothing is evaluated when the parser reported diagnostics. A runtime
    /// failure is not an `Err`: it comes back as an [`Object::Error`] whose
    /// Inspect form is `ERROR: ...`.
    pub fn eval(&mut self, source: &str) -> Result<Object, ParseErrors> {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            return Err(ParseErrors(parser.errors().to_vec()));
        }
        Ok(self.evaluator.eval(&program, &self.env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::ParseError;

    fn interpret(input: &str) -> Result<(String, String), ParseErrors> {
        let mut output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut output);
        let result = interp.eval(input)?;
        let printed = String::from_utf8(output).expect("output is not UTF-8");
        Ok((result.to_string(), printed))
    }

    #[test]
    fn evaluates_a_program() -> Result<(), ParseErrors> {
        let (result, printed) = interpret("let a = 5; let b = a; a + b;")?;
        assert_eq!(result, "10");
        assert_eq!(printed, "");
        Ok(())
    }

    #[test]
    fn puts_goes_through_the_injected_writer() -> Result<(), ParseErrors> {
        let (result, printed) = interpret(r#"puts("Hello"); puts("World");"#)?;
        assert_eq!(result, "null");
        assert_eq!(printed, "Hello\nWorld\n");
        Ok(())
    }

    #[test]
    fn definitions_persist_across_eval_calls() -> Result<(), ParseErrors> {
        let mut output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut output);
        interp.eval("let max = fn(x, y) { if (x > y) { x } else { y } };")?;
        assert_eq!(interp.eval("max(10, 20);")?.to_string(), "20");
        assert_eq!(interp.eval("max(5, 4);")?.to_string(), "5");
        Ok(())
    }

    #[test]
    fn runtime_errors_are_in_band_objects() -> Result<(), ParseErrors> {
        let (result, _) = interpret("foobar;")?;
        assert_eq!(result, "ERROR: identifier not found: foobar");
        Ok(())
    }

    #[test]
    fn parse_errors_suppress_evaluation() {
        let mut output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut output);
        let errors = interp
            .eval(r#"puts("should not run"); let x 5;"#)
            .expect_err("expected parse errors");
        assert_eq!(
            errors,
            ParseErrors(vec![ParseError::UnexpectedToken {
                expected: "=".to_string(),
                got: "INT".to_string(),
            }])
        );
        assert!(output.is_empty());
    }

    #[test]
    fn all_diagnostics_are_reported() {
        let mut output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut output);
        let errors = interp
            .eval("let x 5; let 7;")
            .expect_err("expected parse errors");
        assert_eq!(errors.0.len(), 2);
    }
}
