//! Lexically scoped name-to-value frames.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

/// One scope frame: bindings plus an optional enclosing frame.
///
/// Frames are shared by reference. A closure keeps the frame that was
/// current at its definition alive, so bindings added to that frame after
/// the closure was created are visible to it.
#[derive(Debug, Default)]
pub struct Environment {
    store: RefCell<HashMap<String, Object>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates an outermost frame.
    pub fn new() -> Rc<Environment> {
        Rc::new(Environment::default())
    }

    /// Creates a frame enclosed by `outer`, as function application does.
    pub fn enclosed(outer: Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Looks `name` up through the frame chain.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.borrow().get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Binds `name` in this frame, shadowing any outer binding of the same
    /// name. `let` never writes to an enclosing frame.
    pub fn set(&self, name: &str, value: Object) {
        self.store.borrow_mut().insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let env = Environment::new();
        env.set("a", Object::Integer(1));
        assert_eq!(env.get("a"), Some(Object::Integer(1)));
        assert_eq!(env.get("b"), None);
    }

    #[test]
    fn rebinding_replaces_the_value() {
        let env = Environment::new();
        env.set("a", Object::Integer(1));
        env.set("a", Object::Integer(2));
        assert_eq!(env.get("a"), Some(Object::Integer(2)));
    }

    #[test]
    fn lookup_walks_the_outer_chain() {
        let outer = Environment::new();
        outer.set("a", Object::Integer(1));
        let inner = Environment::enclosed(outer);
        assert_eq!(inner.get("a"), Some(Object::Integer(1)));
    }

    #[test]
    fn set_writes_the_innermost_frame() {
        let outer = Environment::new();
        outer.set("a", Object::Integer(1));
        let inner = Environment::enclosed(Rc::clone(&outer));
        inner.set("a", Object::Integer(2));
        assert_eq!(inner.get("a"), Some(Object::Integer(2)));
        assert_eq!(outer.get("a"), Some(Object::Integer(1)));
    }

    #[test]
    fn bindings_added_to_a_shared_frame_are_visible() {
        let outer = Environment::new();
        let inner = Environment::enclosed(Rc::clone(&outer));
        outer.set("late", Object::Integer(42));
        assert_eq!(inner.get("late"), Some(Object::Integer(42)));
    }
}
