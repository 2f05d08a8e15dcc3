//! Runtime values.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{comma_separated, Block};
use crate::env::Environment;

/// A runtime value. `Display` renders the Inspect form shown by the REPL.
///
/// `Return` and `Error` are evaluation-internal carriers: the evaluator
/// unwraps a `Return` at the program top level and at function application,
/// and an `Error` only ever surfaces as the final result of a whole
/// evaluation.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Str(String),
    Null,
    Array(Vec<Object>),
    Hash(HashMap<HashKey, Object>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Return(Box<Object>),
    Error(String),
}

/// Canonical boolean and null values.
pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

impl Object {
    pub fn from_native_bool(value: bool) -> Object {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    /// The kind name interpolated into runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Str(_) => "STRING",
            Object::Null => "NULL",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Return(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
        }
    }

    /// The hash key for this value, or `None` when the kind is not
    /// hashable. Only integers, booleans and strings admit keys.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(value) => Some(HashKey::Integer(*value)),
            Object::Boolean(value) => Some(HashKey::Boolean(*value)),
            Object::Str(value) => Some(HashKey::Str(value.clone())),
            _ => None,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(l), Object::Integer(r)) => l == r,
            (Object::Boolean(l), Object::Boolean(r)) => l == r,
            (Object::Str(l), Object::Str(r)) => l == r,
            (Object::Null, Object::Null) => true,
            (Object::Array(l), Object::Array(r)) => l == r,
            (Object::Hash(l), Object::Hash(r)) => l == r,
            // Functions compare by identity, like the closures they are.
            (Object::Function(l), Object::Function(r)) => Rc::ptr_eq(l, r),
            (Object::Builtin(l), Object::Builtin(r)) => l == r,
            (Object::Return(l), Object::Return(r)) => l == r,
            (Object::Error(l), Object::Error(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Str(value) => f.write_str(value),
            Object::Null => f.write_str("null"),
            Object::Array(elements) => write!(f, "[{}]", comma_separated(elements)),
            Object::Hash(entries) => {
                let pairs = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Object::Function(function) => write!(
                f,
                "fn({}) {{\n{}\n}}",
                function.params.join(", "),
                function.body
            ),
            Object::Builtin(_) => f.write_str("builtin function"),
            Object::Return(value) => write!(f, "{}", value),
            Object::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}

/// A user-defined function together with the environment it closed over.
pub struct Function {
    pub params: Vec<String>,
    pub body: Block,
    pub env: Rc<Environment>,
}

// Hand-written because the captured environment can reach back to the
// function itself.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Key of a hash entry: kind plus content, so `1`, `true` and `"1"` can
/// never collide.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    Str(String),
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(value) => write!(f, "{}", value),
            HashKey::Boolean(value) => write!(f, "{}", value),
            HashKey::Str(value) => f.write_str(value),
        }
    }
}

/// Host-supplied functions, reachable by name without any `let` binding.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
    Puts,
}

impl Builtin {
    /// Resolves a name the environment chain did not bind.
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "len" => Some(Builtin::Len),
            "first" => Some(Builtin::First),
            "last" => Some(Builtin::Last),
            "rest" => Some(Builtin::Rest),
            "push" => Some(Builtin::Push),
            "puts" => Some(Builtin::Puts),
            _ => None,
        }
    }

    /// The surface name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::First => "first",
            Builtin::Last => "last",
            Builtin::Rest => "rest",
            Builtin::Push => "push",
            Builtin::Puts => "puts",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_forms() {
        assert_eq!(Object::Integer(5).to_string(), "5");
        assert_eq!(TRUE.to_string(), "true");
        assert_eq!(FALSE.to_string(), "false");
        assert_eq!(NULL.to_string(), "null");
        assert_eq!(Object::Str("Hello World".to_string()).to_string(), "Hello World");
        assert_eq!(
            Object::Array(vec![Object::Integer(1), Object::Integer(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(
            Object::Error("identifier not found: foobar".to_string()).to_string(),
            "ERROR: identifier not found: foobar"
        );
    }

    #[test]
    fn hash_inspect() {
        let mut entries = HashMap::new();
        entries.insert(HashKey::Str("foo".to_string()), Object::Integer(5));
        assert_eq!(Object::Hash(entries).to_string(), "{foo: 5}");
    }

    #[test]
    fn hash_keys_encode_kind_and_content() {
        assert_eq!(
            Object::Integer(1).hash_key(),
            Some(HashKey::Integer(1))
        );
        assert_ne!(
            Object::Integer(1).hash_key(),
            Object::Boolean(true).hash_key()
        );
        assert_ne!(
            Object::Integer(1).hash_key(),
            Object::Str("1".to_string()).hash_key()
        );
        assert_eq!(
            Object::Str("a".to_string()).hash_key(),
            Object::Str("a".to_string()).hash_key()
        );
    }

    #[test]
    fn only_integers_booleans_and_strings_are_hashable() {
        assert!(Object::Null.hash_key().is_none());
        assert!(Object::Array(vec![]).hash_key().is_none());
        assert!(Object::Hash(HashMap::new()).hash_key().is_none());
        assert!(Object::Builtin(Builtin::Len).hash_key().is_none());
    }

    #[test]
    fn type_names() {
        assert_eq!(Object::Integer(1).type_name(), "INTEGER");
        assert_eq!(TRUE.type_name(), "BOOLEAN");
        assert_eq!(Object::Str(String::new()).type_name(), "STRING");
        assert_eq!(NULL.type_name(), "NULL");
        assert_eq!(Object::Array(vec![]).type_name(), "ARRAY");
    }

    #[test]
    fn builtin_lookup() {
        assert_eq!(Builtin::lookup("len"), Some(Builtin::Len));
        assert_eq!(Builtin::lookup("puts"), Some(Builtin::Puts));
        assert_eq!(Builtin::lookup("map"), None);
    }
}
