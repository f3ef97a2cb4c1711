use super::object::Object;
use crate::frontend::operator::{InfixOperator, PrefixOperator};

use std::fmt;

#[derive(Debug, PartialEq)]
pub enum InterpreterError {
    TypeMismatch(InfixOperator, Object, Object),
    UnknownInfixOperation(InfixOperator, Object, Object),
    UnknownPrefixOperation(PrefixOperator, Object),
    UndefinedIdentifier(String),
    NotCallable(Object),
    DivisionByZero,
    UnusableHashKey(Object),
    IndexNotSupported(Object),
    InvalidIndexType(Object, Object),
    Builtin(String),
    /// Control-flow marker for `return`. Blocks pass it through untouched;
    /// function calls and the program root unwrap it. Never user-visible.
    Return(Object),
}

pub type RuntimeResult<T> = Result<T, InterpreterError>;

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterpreterError::TypeMismatch(op, lhs, rhs) => {
                write!(
                    f,
                    "type mismatch: {} {} {}",
                    lhs.type_name(),
                    op.symbol(),
                    rhs.type_name()
                )
            }
            InterpreterError::UnknownInfixOperation(op, lhs, rhs) => {
                write!(
                    f,
                    "unknown operator: {} {} {}",
                    lhs.type_name(),
                    op.symbol(),
                    rhs.type_name()
                )
            }
            InterpreterError::UnknownPrefixOperation(op, value) => {
                write!(f, "unknown operator: {}{}", op.symbol(), value.type_name())
            }
            InterpreterError::UndefinedIdentifier(name) => {
                write!(f, "identifier not found: {}", name)
            }
            InterpreterError::NotCallable(obj) => {
                write!(f, "not a function: {}", obj.type_name())
            }
            InterpreterError::DivisionByZero => write!(f, "division by zero"),
            InterpreterError::UnusableHashKey(obj) => {
                write!(f, "unusable as hash key: {}", obj.type_name())
            }
            InterpreterError::IndexNotSupported(obj) => {
                write!(f, "index operator not supported: {}", obj.type_name())
            }
            InterpreterError::InvalidIndexType(collection, index) => {
                write!(
                    f,
                    "invalid index type for {}: {}",
                    collection.type_name(),
                    index.type_name()
                )
            }
            InterpreterError::Builtin(message) => write!(f, "{}", message),
            InterpreterError::Return(obj) => write!(f, "return {}", obj.inspect()),
        }
    }
}
