use std::collections::HashMap;

use super::Handle;
use crate::error::SceneError;

/// Append-only store of named assets. Names are unique; re-inserting a
/// name replaces the previous asset but keeps its handle stable.
pub struct AssetCache<T> {
    kind: &'static str,
    items: Vec<T>,
    names: HashMap<String, Handle<T>>,
}

impl<T> AssetCache<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: Vec::new(),
            names: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, item: T) -> Handle<T> {
        let name = name.into();
        if let Some(&handle) = self.names.get(&name) {
            log::warn!("Replacing {} resource \"{}\"", self.kind, name);
            self.items[handle.index()] = item;
            return handle;
        }

        let handle = Handle::new(self.items.len());
        self.items.push(item);
        self.names.insert(name, handle);
        handle
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.index())
    }

    /// Looks a resource up by name, failing with the missing name.
    pub fn lookup(&self, name: &str) -> Result<Handle<T>, SceneError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::MissingResource {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
