use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A scope frame, shared by every closure that captured it.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Default, Debug)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    /// Root frame for one evaluation session. Sessions never share frames.
    pub fn new_global() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// Child frame wrapping the lexically enclosing environment.
    pub fn extend(outer: &Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds in this frame only. Used by `let`, so an inner binding shadows
    /// without perturbing an outer one of the same name.
    pub fn set_local(&mut self, name: &str, value: Object) {
        self.store.insert(name.to_string(), value);
    }

    /// Assignment semantics: rebind the frame that owns the name. A name not
    /// bound anywhere in the chain is created in the root frame.
    pub fn set(&mut self, name: &str, value: Object) {
        if self.store.contains_key(name) {
            self.store.insert(name.to_string(), value);
            return;
        }

        match &self.outer {
            Some(outer) => outer.borrow_mut().set(name, value),
            None => {
                self.store.insert(name.to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Environment;
    use crate::object::Object;

    #[test]
    fn get_walks_the_chain() {
        let global = Environment::new_global();
        global.borrow_mut().set_local("a", Object::Integer(1));

        let inner = Environment::extend(&global);
        assert_eq!(Some(Object::Integer(1)), inner.borrow().get("a"));
        assert_eq!(None, inner.borrow().get("b"));
    }

    #[test]
    fn set_local_shadows_without_leaking() {
        let global = Environment::new_global();
        global.borrow_mut().set_local("a", Object::Integer(1));

        let inner = Environment::extend(&global);
        inner.borrow_mut().set_local("a", Object::Integer(2));

        assert_eq!(Some(Object::Integer(2)), inner.borrow().get("a"));
        assert_eq!(Some(Object::Integer(1)), global.borrow().get("a"));
    }

    #[test]
    fn set_rebinds_the_owning_frame() {
        let global = Environment::new_global();
        global.borrow_mut().set_local("a", Object::Integer(1));

        let inner = Environment::extend(&global);
        inner.borrow_mut().set("a", Object::Integer(2));

        assert_eq!(Some(Object::Integer(2)), global.borrow().get("a"));
    }

    #[test]
    fn set_of_unbound_name_lands_in_the_root_frame() {
        let global = Environment::new_global();
        let inner = Environment::extend(&global);
        inner.borrow_mut().set("a", Object::Integer(1));

        assert_eq!(Some(Object::Integer(1)), global.borrow().get("a"));
    }
}
