//! Abstract syntax tree produced by the parser.
//!
//! The tree is immutable once built. `Display` renders the canonical
//! source form; prefix and infix nodes are printed fully parenthesized so
//! the rendering re-parses to the same tree shape.

use std::fmt;

use crate::token::Token;

/// A parsed source file: the ordered list of top-level statements.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Let { name: String, value: Expr },
    Return { value: Expr },
    Expr { value: Expr },
}

/// Statement list between `{` and `}`. Blocks appear only as the body of
/// an `if` arm or a function literal; a `{` in expression position starts
/// a hash literal instead.
#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Ident(String),
    Int(i64),
    Bool(bool),
    Str(String),
    Prefix {
        op: Token,
        right: Box<Expr>,
    },
    Infix {
        op: Token,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function {
        params: Vec<String>,
        body: Block,
    },
    Call {
        function: Box<Expr>,
        args: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
    Hash(Vec<(Expr, Expr)>),
}

pub(crate) fn comma_separated<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value } => write!(f, "let {} = {};", name, value),
            Stmt::Return { value } => write!(f, "return {};", value),
            Stmt::Expr { value } => write!(f, "{}", value),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => f.write_str(name),
            Expr::Int(value) => write!(f, "{}", value),
            Expr::Bool(value) => write!(f, "{}", value),
            Expr::Str(value) => f.write_str(value),
            Expr::Prefix { op, right } => write!(f, "({}{})", op, right),
            Expr::Infix { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::If {
                cond,
                consequence,
                alternative,
            } => {
                write!(f, "if {} {}", cond, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Expr::Function { params, body } => write!(f, "fn({}) {}", params.join(", "), body),
            Expr::Call { function, args } => {
                write!(f, "{}({})", function, comma_separated(args))
            }
            Expr::Array(elements) => write!(f, "[{}]", comma_separated(elements)),
            Expr::Index { left, index } => write!(f, "({}[{}])", left, index),
            Expr::Hash(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", pairs.join(", "))
            }
        }
    }
}
