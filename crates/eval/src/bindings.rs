//! Named `$variable` bindings supplied by the caller for one evaluation.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::{Map, Value};

pub trait VariableBindings {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

/// Bindings for paths that reference no named variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBindings;

impl VariableBindings for NoBindings {
    fn lookup(&self, _name: &str) -> Option<&Value> {
        None
    }
}

impl<S: BuildHasher> VariableBindings for HashMap<String, Value, S> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl VariableBindings for BTreeMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl VariableBindings for Map<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<T: VariableBindings + ?Sized> VariableBindings for &T {
    fn lookup(&self, name: &str) -> Option<&Value> {
        (**self).lookup(name)
    }
}
