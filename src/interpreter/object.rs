use super::builtins::NativeFn;
use super::errors::{InterpreterError, RuntimeResult};
use super::function::TuskFn;
use crate::frontend::operator::{InfixOperator, PrefixOperator};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(ArrayDataPtr),
    Hash(HashDataPtr),
    TuskFn(TuskFn),
    NativeFn(NativeFn),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Null => "NULL",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::TuskFn(_) => "FUNCTION",
            Object::NativeFn(_) => "BUILTIN",
        }
    }

    /// Null, false and 0 are falsey; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(
            self,
            Object::Null | Object::Boolean(false) | Object::Integer(0)
        )
    }

    /// User-facing string representation.
    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(n) => n.to_string(),
            Object::Boolean(b) => b.to_string(),
            Object::String(s) => s.clone(),
            Object::Null => "null".to_owned(),
            Object::Array(arr) => arr.inspect(),
            Object::Hash(hash) => hash.inspect(),
            Object::TuskFn(f) => f.inspect(),
            Object::NativeFn(f) => format!("<native-func {}>", f.name()),
        }
    }

    pub fn apply_infix_op(op: InfixOperator, lhs: Object, rhs: Object) -> RuntimeResult<Object> {
        match (lhs, rhs) {
            (Object::Integer(a), Object::Integer(b)) => integer_infix_op(op, a, b),
            (Object::String(a), Object::String(b)) => match op {
                InfixOperator::Add => Ok(Object::String(a + &b)),
                InfixOperator::EqualTo => Ok(Object::Boolean(a == b)),
                InfixOperator::NotEqualTo => Ok(Object::Boolean(a != b)),
                _ => Err(InterpreterError::UnknownInfixOperation(
                    op,
                    Object::String(a),
                    Object::String(b),
                )),
            },
            (lhs, rhs) if lhs.type_name() != rhs.type_name() => match op {
                InfixOperator::EqualTo => Ok(Object::Boolean(false)),
                InfixOperator::NotEqualTo => Ok(Object::Boolean(true)),
                _ => Err(InterpreterError::TypeMismatch(op, lhs, rhs)),
            },
            // Remaining same-type pairs compare by identity only.
            (lhs, rhs) => match op {
                InfixOperator::EqualTo => Ok(Object::Boolean(lhs == rhs)),
                InfixOperator::NotEqualTo => Ok(Object::Boolean(lhs != rhs)),
                _ => Err(InterpreterError::UnknownInfixOperation(op, lhs, rhs)),
            },
        }
    }

    pub fn apply_prefix_op(op: PrefixOperator, value: Object) -> RuntimeResult<Object> {
        match op {
            PrefixOperator::Negate => match value {
                Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
                _ => Err(InterpreterError::UnknownPrefixOperation(op, value)),
            },
            PrefixOperator::LogicalNot => Ok(Object::Boolean(!value.is_truthy())),
        }
    }
}

fn integer_infix_op(op: InfixOperator, a: i64, b: i64) -> RuntimeResult<Object> {
    let result = match op {
        InfixOperator::Add => Object::Integer(a.wrapping_add(b)),
        InfixOperator::Subtract => Object::Integer(a.wrapping_sub(b)),
        InfixOperator::Multiply => Object::Integer(a.wrapping_mul(b)),
        InfixOperator::Divide => {
            if b == 0 {
                return Err(InterpreterError::DivisionByZero);
            }
            // Truncates toward zero.
            Object::Integer(a.wrapping_div(b))
        }
        InfixOperator::LessThan => Object::Boolean(a < b),
        InfixOperator::GreaterThan => Object::Boolean(a > b),
        InfixOperator::EqualTo => Object::Boolean(a == b),
        InfixOperator::NotEqualTo => Object::Boolean(a != b),
    };

    Ok(result)
}

/// Shared, in-place-mutable array storage. Bindings alias the same elements,
/// so `push`/`pop`/`replace` through one binding are visible through all.
#[derive(Clone)]
pub struct ArrayDataPtr(Rc<RefCell<Vec<Object>>>);

impl ArrayDataPtr {
    pub fn new(elements: Vec<Object>) -> Self {
        ArrayDataPtr(Rc::new(RefCell::new(elements)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Object> {
        self.0.borrow().get(index).cloned()
    }

    pub fn first(&self) -> Option<Object> {
        self.0.borrow().first().cloned()
    }

    pub fn last(&self) -> Option<Object> {
        self.0.borrow().last().cloned()
    }

    /// A fresh array holding everything but the first element.
    pub fn rest(&self) -> Option<ArrayDataPtr> {
        let elements = self.0.borrow();
        if elements.is_empty() {
            None
        } else {
            Some(ArrayDataPtr::new(elements[1..].to_vec()))
        }
    }

    pub fn push(&self, value: Object) {
        self.0.borrow_mut().push(value);
    }

    pub fn pop(&self) -> Option<Object> {
        self.0.borrow_mut().pop()
    }

    pub fn set(&self, index: usize, value: Object) {
        self.0.borrow_mut()[index] = value;
    }

    pub fn inspect(&self) -> String {
        let elements: Vec<_> = self.0.borrow().iter().map(|e| e.inspect()).collect();
        format!("[{}]", elements.join(", "))
    }
}

impl PartialEq<ArrayDataPtr> for ArrayDataPtr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ArrayDataPtr {}

impl fmt::Debug for ArrayDataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

/// Hash storage. Entries are keyed by `HashKey` and keep the original key
/// object around for display.
#[derive(Clone)]
pub struct HashDataPtr(Rc<RefCell<HashMap<HashKey, (Object, Object)>>>);

impl HashDataPtr {
    pub fn new() -> Self {
        HashDataPtr(Rc::new(RefCell::new(HashMap::new())))
    }

    /// Later duplicates overwrite earlier entries.
    pub fn insert(&self, hash_key: HashKey, key: Object, value: Object) {
        self.0.borrow_mut().insert(hash_key, (key, value));
    }

    pub fn get(&self, hash_key: &HashKey) -> Option<Object> {
        self.0.borrow().get(hash_key).map(|(_, value)| value.clone())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn inspect(&self) -> String {
        let pairs: Vec<_> = self
            .0
            .borrow()
            .values()
            .map(|(key, value)| format!("{}: {}", key.inspect(), value.inspect()))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

impl PartialEq<HashDataPtr> for HashDataPtr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for HashDataPtr {}

impl fmt::Debug for HashDataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
enum HashTag {
    Integer,
    Boolean,
    String,
}

/// Lookup index for hash values: a type tag paired with a 64-bit key.
/// Hashing the same logical key always yields the same `HashKey`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct HashKey {
    tag: HashTag,
    value: u64,
}

impl HashKey {
    pub fn from_object(obj: &Object) -> RuntimeResult<HashKey> {
        let key = match obj {
            Object::Integer(n) => HashKey {
                tag: HashTag::Integer,
                value: *n as u64,
            },
            Object::Boolean(b) => HashKey {
                tag: HashTag::Boolean,
                value: u64::from(*b),
            },
            Object::String(s) => HashKey {
                tag: HashTag::String,
                value: fnv1a(s.as_bytes()),
            },
            _ => return Err(InterpreterError::UnusableHashKey(obj.clone())),
        };

        Ok(key)
    }
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
