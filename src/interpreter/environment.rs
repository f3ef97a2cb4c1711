use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::object::Object;

/// A name→value binding table plus a handle on the enclosing scope.
/// Cloning clones handles, not bindings, so closures over the same scope
/// observe each other's definitions.
#[derive(Clone)]
pub struct Environment {
    bindings: Rc<RefCell<HashMap<String, Object>>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: Rc::new(RefCell::new(HashMap::new())),
            outer: None,
        }
    }

    /// A fresh innermost frame chained onto `outer`.
    pub fn enclosed(outer: &Environment) -> Self {
        Environment {
            bindings: Rc::new(RefCell::new(HashMap::new())),
            outer: Some(Rc::new(outer.clone())),
        }
    }

    /// Add or replace a binding in the current frame, shadowing any
    /// definition in an enclosing frame.
    pub fn define(&self, name: String, value: Object) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Get variable value, walking outward through the enclosing frames.
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(obj) = self.bindings.borrow().get(name) {
            return Some(obj.clone());
        }

        self.outer.as_ref().and_then(|outer| outer.get(name))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_and_chain_lookup() {
        let outer = Environment::new();
        outer.define("x".to_owned(), Object::Integer(1));
        outer.define("y".to_owned(), Object::Integer(2));

        let inner = Environment::enclosed(&outer);
        inner.define("x".to_owned(), Object::Integer(10));

        assert_eq!(inner.get("x"), Some(Object::Integer(10)));
        assert_eq!(inner.get("y"), Some(Object::Integer(2)));
        assert_eq!(outer.get("x"), Some(Object::Integer(1)));
        assert_eq!(inner.get("z"), None);
    }

    #[test]
    fn test_shared_handles_see_definitions() {
        let env = Environment::new();
        let alias = env.clone();
        env.define("x".to_owned(), Object::Integer(5));
        assert_eq!(alias.get("x"), Some(Object::Integer(5)));
    }

    #[test]
    fn test_inner_frames_share_the_outer_bindings() {
        let outer = Environment::new();
        let a = Environment::enclosed(&outer);
        let b = Environment::enclosed(&outer);

        outer.define("x".to_owned(), Object::Integer(1));
        assert_eq!(a.get("x"), Some(Object::Integer(1)));
        assert_eq!(b.get("x"), Some(Object::Integer(1)));
    }
}
