use crate::ast::{BlockStatement, InfixOperator, PrefixOperator};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

pub use crate::object::environment::{Env, Environment};

pub mod builtins;
pub mod environment;

pub type BuiltInFunction = fn(Vec<Object>) -> EvalResult;

#[derive(Clone, Debug)]
pub enum Object {
    Null,
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Object>),
    /// Keyed by the content hash; the original key object is retained for
    /// rendering and kept alongside the value.
    Hash(IndexMap<HashKey, (Object, Object)>),
    Function(Vec<String>, BlockStatement, Env),
    BuiltIn(BuiltInFunction),
    /// Control marker produced by a `return` statement, intercepted at the
    /// program level or at function application, never operated on.
    Return(Box<Object>),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Integer(v) => write!(f, "{}", v),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::String(s) => write!(f, "{}", s),
            Object::Array(elements) => {
                let rendered = elements
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{}]", rendered)
            }
            Object::Hash(pairs) => {
                let rendered = pairs
                    .values()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "hash{{{}}}", rendered)
            }
            Object::Function(parameters, body, _) => {
                write!(f, "fn({}) {}", parameters.join(", "), body)
            }
            Object::BuiltIn(_) => write!(f, "builtin function"),
            Object::Return(obj) => write!(f, "{}", obj),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Null, Object::Null) => true,
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Hash(a), Object::Hash(b)) => a == b,
            // Captured environments compare by identity: a closure is only
            // equal to itself. Anything deeper would recurse through cycles.
            (Object::Function(ap, ab, ae), Object::Function(bp, bb, be)) => {
                ap == bp && ab == bb && Rc::ptr_eq(ae, be)
            }
            (Object::BuiltIn(a), Object::BuiltIn(b)) => a == b,
            (Object::Return(a), Object::Return(b)) => a == b,
            _ => false,
        }
    }
}

impl Object {
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Null => false,
            Object::Boolean(b) => *b,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Object::Null => "NULL",
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_, _, _) => "FUNCTION",
            Object::BuiltIn(_) => "BUILTIN",
            Object::Return(_) => "RETURN",
        }
    }

    /// Content hash for values usable as hash keys. Only integers, booleans
    /// and strings are hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(v) => Some(HashKey::Integer(*v as u64)),
            Object::Boolean(b) => Some(HashKey::Boolean(*b as u64)),
            Object::String(s) => Some(HashKey::String(fnv1a(s.as_bytes()))),
            _ => None,
        }
    }
}

/// A value's variant tag paired with a 64-bit hash of its content. Two keys
/// are equal only when both the tag and the hash match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HashKey {
    Integer(u64),
    Boolean(u64),
    String(u64),
}

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

pub type EvalResult = std::result::Result<Object, EvalError>;

#[derive(Debug, PartialEq)]
pub enum EvalError {
    IdentifierNotFound(String),
    TypeMismatch(InfixOperator, Object, Object),
    UnknownInfixOperator(InfixOperator, Object, Object),
    UnknownPrefixOperator(PrefixOperator, Object),
    NotCallable(Object),
    WrongArgumentCount { expected: usize, actual: usize },
    UnsupportedArguments(String, Vec<Object>),
    UnsupportedIndexOperation(Object),
    UnusableHashKey(Object),
    DivisionByZero,
    IntegerOverflow,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::IdentifierNotFound(name) => write!(f, "identifier not found: {}", name),
            EvalError::TypeMismatch(operator, left, right) => write!(
                f,
                "type mismatch: {} {} {}",
                left.type_name(),
                operator,
                right.type_name()
            ),
            EvalError::UnknownInfixOperator(operator, left, right) => write!(
                f,
                "unknown operator: {} {} {}",
                left.type_name(),
                operator,
                right.type_name()
            ),
            EvalError::UnknownPrefixOperator(operator, obj) => {
                write!(f, "unknown operator: {}{}", operator, obj.type_name())
            }
            EvalError::NotCallable(obj) => write!(f, "not a function: {}", obj.type_name()),
            EvalError::WrongArgumentCount { expected, actual } => write!(
                f,
                "wrong number of arguments. got={}, want={}",
                actual, expected
            ),
            EvalError::UnsupportedArguments(name, args) => write!(
                f,
                "argument to `{}` not supported, got {}",
                name,
                args[0].type_name()
            ),
            EvalError::UnsupportedIndexOperation(obj) => {
                write!(f, "index operator not supported: {}", obj.type_name())
            }
            EvalError::UnusableHashKey(obj) => {
                write!(f, "unusable as hash key: {}", obj.type_name())
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::IntegerOverflow => write!(f, "integer overflow"),
        }
    }
}

pub(crate) fn assert_argument_count(expected: usize, args: &[Object]) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(EvalError::WrongArgumentCount {
            expected,
            actual: args.len(),
        });
    }

    Ok(())
}
