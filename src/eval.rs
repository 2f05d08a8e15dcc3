//! Tree-walking evaluator.
//!
//! One dispatch arm per AST kind, evaluated against the current environment
//! frame. Failures travel as `RuntimeError` through `?` and are rendered
//! into an in-band [`Object::Error`] at the top of evaluation; a `return`
//! travels as an in-band [`Object::Return`] carrier that blocks pass
//! through untouched and the program top level or a function application
//! unwraps.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::io;
use std::io::prelude::*;
use std::rc::Rc;

use crate::ast::{Block, Expr, Program, Stmt};
use crate::env::Environment;
use crate::object::{Builtin, Function, Object, FALSE, NULL, TRUE};
use crate::token::Token;

/// Errors raised while evaluating.
#[derive(Debug)]
pub enum RuntimeError {
    TypeMismatch {
        left: &'static str,
        op: Token,
        right: &'static str,
    },
    UnknownPrefixOperator {
        op: Token,
        right: &'static str,
    },
    UnknownInfixOperator {
        left: &'static str,
        op: Token,
        right: &'static str,
    },
    IdentifierNotFound(String),
    NotAFunction(&'static str),
    IndexNotSupported(&'static str),
    UnusableHashKey(&'static str),
    BadArgument {
        name: &'static str,
        got: &'static str,
    },
    WrongNumberOfArguments {
        got: usize,
        want: usize,
    },
    DivisionByZero,
    Io(io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::TypeMismatch { left, op, right } => {
                write!(f, "type mismatch: {} {} {}", left, op, right)
            }
            RuntimeError::UnknownPrefixOperator { op, right } => {
                write!(f, "unknown operator: {}{}", op, right)
            }
            RuntimeError::UnknownInfixOperator { left, op, right } => {
                write!(f, "unknown operator: {} {} {}", left, op, right)
            }
            RuntimeError::IdentifierNotFound(name) => {
                write!(f, "identifier not found: {}", name)
            }
            RuntimeError::NotAFunction(kind) => write!(f, "not a function: {}", kind),
            RuntimeError::IndexNotSupported(kind) => {
                write!(f, "index operator not supported: {}", kind)
            }
            RuntimeError::UnusableHashKey(kind) => {
                write!(f, "unusable as hash key: {}", kind)
            }
            RuntimeError::BadArgument { name, got } => {
                write!(f, "argument to \"{}\" not supported, got {}", name, got)
            }
            RuntimeError::WrongNumberOfArguments { got, want } => {
                write!(f, "wrong number of arguments. got={}, want={}", got, want)
            }
            RuntimeError::DivisionByZero => f.write_str("division by zero"),
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> RuntimeError {
        RuntimeError::Io(e)
    }
}

/// Evaluates AST nodes against an environment chain.
///
/// Everything `puts` prints goes through the injected writer, so the
/// evaluator itself never touches stdout.
#[derive(Debug)]
pub struct Evaluator<'a, W: Write> {
    output: &'a mut W,
}

impl<'a, W: Write> Evaluator<'a, W> {
    pub fn new(output: &'a mut W) -> Evaluator<'a, W> {
        Evaluator { output }
    }

    /// Evaluates a whole program. Total: a runtime failure comes back as an
    /// [`Object::Error`], never as a panic.
    pub fn eval(&mut self, program: &Program, env: &Rc<Environment>) -> Object {
        match self.eval_program(program, env) {
            Ok(object) => object,
            Err(e) => Object::Error(e.to_string()),
        }
    }

    /// The program top level unwraps a terminal `Return` carrier.
    fn eval_program(
        &mut self,
        program: &Program,
        env: &Rc<Environment>,
    ) -> Result<Object, RuntimeError> {
        let mut result = NULL;
        for stmt in &program.statements {
            result = self.eval_statement(stmt, env)?;
            if let Object::Return(value) = result {
                return Ok(*value);
            }
        }
        Ok(result)
    }

    /// Blocks pass a `Return` carrier through untouched so it can unwind
    /// nested blocks up to the enclosing function frame.
    fn eval_block(&mut self, block: &Block, env: &Rc<Environment>) -> Result<Object, RuntimeError> {
        let mut result = NULL;
        for stmt in &block.statements {
            result = self.eval_statement(stmt, env)?;
            if let Object::Return(_) = result {
                return Ok(result);
            }
        }
        Ok(result)
    }

    fn eval_statement(&mut self, stmt: &Stmt, env: &Rc<Environment>) -> Result<Object, RuntimeError> {
        match stmt {
            Stmt::Expr { value } => self.eval_expression(value, env),
            Stmt::Let { name, value } => {
                let value = self.eval_expression(value, env)?;
                env.set(name, value);
                Ok(NULL)
            }
            Stmt::Return { value } => {
                let value = self.eval_expression(value, env)?;
                Ok(Object::Return(Box::new(value)))
            }
        }
    }

    fn eval_expression(&mut self, expr: &Expr, env: &Rc<Environment>) -> Result<Object, RuntimeError> {
        match expr {
            Expr::Int(value) => Ok(Object::Integer(*value)),
            Expr::Bool(value) => Ok(Object::from_native_bool(*value)),
            Expr::Str(value) => Ok(Object::Str(value.clone())),
            Expr::Ident(name) => eval_identifier(name, env),
            Expr::Prefix { op, right } => {
                let right = self.eval_expression(right, env)?;
                eval_prefix(op, right)
            }
            Expr::Infix { op, left, right } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                eval_infix(op, left, right)
            }
            Expr::If {
                cond,
                consequence,
                alternative,
            } => {
                let cond = self.eval_expression(cond, env)?;
                if is_truthy(&cond) {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    Ok(NULL)
                }
            }
            Expr::Function { params, body } => Ok(Object::Function(Rc::new(Function {
                params: params.clone(),
                body: body.clone(),
                env: Rc::clone(env),
            }))),
            Expr::Call { function, args } => {
                let function = self.eval_expression(function, env)?;
                let args = self.eval_expressions(args, env)?;
                self.apply_function(function, args)
            }
            Expr::Array(elements) => Ok(Object::Array(self.eval_expressions(elements, env)?)),
            Expr::Index { left, index } => {
                let left = self.eval_expression(left, env)?;
                let index = self.eval_expression(index, env)?;
                eval_index(left, index)
            }
            Expr::Hash(pairs) => self.eval_hash_literal(pairs, env),
        }
    }

    /// Left to right; the first failure aborts the whole list.
    fn eval_expressions(
        &mut self,
        exprs: &[Expr],
        env: &Rc<Environment>,
    ) -> Result<Vec<Object>, RuntimeError> {
        exprs.iter().map(|e| self.eval_expression(e, env)).collect()
    }

    fn apply_function(
        &mut self,
        function: Object,
        args: Vec<Object>,
    ) -> Result<Object, RuntimeError> {
        match function {
            Object::Function(function) => {
                let frame = Environment::enclosed(Rc::clone(&function.env));
                for (param, arg) in function.params.iter().zip(args) {
                    frame.set(param, arg);
                }
                match self.eval_block(&function.body, &frame)? {
                    Object::Return(value) => Ok(*value),
                    object => Ok(object),
                }
            }
            Object::Builtin(builtin) => self.apply_builtin(builtin, args),
            other => Err(RuntimeError::NotAFunction(other.type_name())),
        }
    }

    fn apply_builtin(&mut self, builtin: Builtin, args: Vec<Object>) -> Result<Object, RuntimeError> {
        match builtin {
            Builtin::Len => match single_arg(args)? {
                Object::Str(value) => Ok(Object::Integer(value.len() as i64)),
                Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
                other => Err(RuntimeError::BadArgument {
                    name: builtin.name(),
                    got: other.type_name(),
                }),
            },
            Builtin::First => match single_arg(args)? {
                Object::Array(elements) => Ok(elements.first().cloned().unwrap_or(NULL)),
                other => Err(RuntimeError::BadArgument {
                    name: builtin.name(),
                    got: other.type_name(),
                }),
            },
            Builtin::Last => match single_arg(args)? {
                Object::Array(elements) => Ok(elements.last().cloned().unwrap_or(NULL)),
                other => Err(RuntimeError::BadArgument {
                    name: builtin.name(),
                    got: other.type_name(),
                }),
            },
            Builtin::Rest => match single_arg(args)? {
                Object::Array(elements) => {
                    if elements.is_empty() {
                        Ok(NULL)
                    } else {
                        Ok(Object::Array(elements[1..].to_vec()))
                    }
                }
                other => Err(RuntimeError::BadArgument {
                    name: builtin.name(),
                    got: other.type_name(),
                }),
            },
            Builtin::Push => match &args[..] {
                [Object::Array(elements), value] => {
                    // Immutable update: the source array is left alone.
                    let mut elements = elements.clone();
                    elements.push(value.clone());
                    Ok(Object::Array(elements))
                }
                [other, _] => Err(RuntimeError::BadArgument {
                    name: builtin.name(),
                    got: other.type_name(),
                }),
                _ => Err(RuntimeError::WrongNumberOfArguments {
                    got: args.len(),
                    want: 2,
                }),
            },
            Builtin::Puts => {
                for arg in &args {
                    writeln!(self.output, "{}", arg)?;
                }
                Ok(NULL)
            }
        }
    }

    fn eval_hash_literal(
        &mut self,
        pairs: &[(Expr, Expr)],
        env: &Rc<Environment>,
    ) -> Result<Object, RuntimeError> {
        let mut entries = HashMap::new();
        for (key_expr, value_expr) in pairs {
            let key = self.eval_expression(key_expr, env)?;
            let key = key
                .hash_key()
                .ok_or_else(|| RuntimeError::UnusableHashKey(key.type_name()))?;
            let value = self.eval_expression(value_expr, env)?;
            entries.insert(key, value);
        }
        Ok(Object::Hash(entries))
    }
}

/// Everything is truthy except the canonical `false` and `null`.
fn is_truthy(object: &Object) -> bool {
    !matches!(object, Object::Boolean(false) | Object::Null)
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Result<Object, RuntimeError> {
    if let Some(value) = env.get(name) {
        Ok(value)
    } else if let Some(builtin) = Builtin::lookup(name) {
        Ok(Object::Builtin(builtin))
    } else {
        Err(RuntimeError::IdentifierNotFound(name.to_string()))
    }
}

fn eval_prefix(op: &Token, right: Object) -> Result<Object, RuntimeError> {
    match op {
        Token::Bang => Ok(eval_bang(right)),
        Token::Minus => match right {
            Object::Integer(value) => Ok(Object::Integer(value.wrapping_neg())),
            other => Err(RuntimeError::UnknownPrefixOperator {
                op: op.clone(),
                right: other.type_name(),
            }),
        },
        other => Err(RuntimeError::UnknownPrefixOperator {
            op: other.clone(),
            right: right.type_name(),
        }),
    }
}

fn eval_bang(right: Object) -> Object {
    match right {
        Object::Boolean(true) => FALSE,
        Object::Boolean(false) => TRUE,
        Object::Null => TRUE,
        _ => FALSE,
    }
}

fn eval_infix(op: &Token, left: Object, right: Object) -> Result<Object, RuntimeError> {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(op, l, r),
        (Object::Str(l), Object::Str(r)) => match op {
            Token::Plus => Ok(Object::Str(l + &r)),
            _ => Err(RuntimeError::UnknownInfixOperator {
                left: "STRING",
                op: op.clone(),
                right: "STRING",
            }),
        },
        (left, right) if left.type_name() != right.type_name() => {
            Err(RuntimeError::TypeMismatch {
                left: left.type_name(),
                op: op.clone(),
                right: right.type_name(),
            })
        }
        (left, right) => match op {
            Token::Eq => Ok(Object::from_native_bool(left == right)),
            Token::NotEq => Ok(Object::from_native_bool(left != right)),
            _ => Err(RuntimeError::UnknownInfixOperator {
                left: left.type_name(),
                op: op.clone(),
                right: right.type_name(),
            }),
        },
    }
}

/// Arithmetic wraps on overflow; `wrapping_div` also absorbs
/// `i64::MIN / -1`.
fn eval_integer_infix(op: &Token, l: i64, r: i64) -> Result<Object, RuntimeError> {
    match op {
        Token::Plus => Ok(Object::Integer(l.wrapping_add(r))),
        Token::Minus => Ok(Object::Integer(l.wrapping_sub(r))),
        Token::Asterisk => Ok(Object::Integer(l.wrapping_mul(r))),
        Token::Slash => {
            if r == 0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Object::Integer(l.wrapping_div(r)))
            }
        }
        Token::Lt => Ok(Object::from_native_bool(l < r)),
        Token::Gt => Ok(Object::from_native_bool(l > r)),
        Token::Eq => Ok(Object::from_native_bool(l == r)),
        Token::NotEq => Ok(Object::from_native_bool(l != r)),
        _ => Err(RuntimeError::UnknownInfixOperator {
            left: "INTEGER",
            op: op.clone(),
            right: "INTEGER",
        }),
    }
}

fn eval_index(left: Object, index: Object) -> Result<Object, RuntimeError> {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => {
            // Out of bounds, including negative, is null rather than an
            // error.
            if i < 0 {
                return Ok(NULL);
            }
            Ok(elements.get(i as usize).cloned().unwrap_or(NULL))
        }
        (Object::Hash(entries), key) => match key.hash_key() {
            Some(key) => Ok(entries.get(&key).cloned().unwrap_or(NULL)),
            None => Err(RuntimeError::UnusableHashKey(key.type_name())),
        },
        (other, _) => Err(RuntimeError::IndexNotSupported(other.type_name())),
    }
}

fn single_arg(mut args: Vec<Object>) -> Result<Object, RuntimeError> {
    if args.len() == 1 {
        Ok(args.remove(0))
    } else {
        Err(RuntimeError::WrongNumberOfArguments {
            got: args.len(),
            want: 1,
        })
    }
}
