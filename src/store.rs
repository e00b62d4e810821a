//! In-Memory Resource Store
//!
//! Process-local storage for SCIM resources. Each resource kind lives in its
//! own [`Collection`], which preserves insertion order so list responses page
//! through resources in the order they were created. All state is lost on
//! restart, which is the point for a mock used in integration tests.

use parking_lot::RwLock;
use uuid::Uuid;

use crate::scim::{ScimGroup, ScimUser};

/// An ordered collection of resources keyed by id.
///
/// Reads clone out of the collection so callers never hold the lock across
/// serialization. Mutations take the write lock for the whole operation, so
/// an update is atomic with respect to concurrent requests.
pub struct Collection<T> {
    entries: RwLock<Vec<(String, T)>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resource by id
    pub fn get(&self, id: &str) -> Option<T> {
        self.entries
            .read()
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, resource)| resource.clone())
    }

    /// Snapshot of all resources in insertion order
    pub fn list(&self) -> Vec<T> {
        self.entries
            .read()
            .iter()
            .map(|(_, resource)| resource.clone())
            .collect()
    }

    /// Insert a resource under the given id, replacing any existing entry
    /// without disturbing its position
    pub fn insert(&self, id: impl Into<String>, resource: T) {
        let id = id.into();
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|(key, _)| key == &id) {
            Some(entry) => entry.1 = resource,
            None => entries.push((id, resource)),
        }
    }

    /// Apply a transformation to the resource under one write lock.
    ///
    /// Returns the updated resource, or None if no resource has this id.
    pub fn update(&self, id: &str, f: impl FnOnce(&T) -> T) -> Option<T> {
        let mut entries = self.entries.write();
        let entry = entries.iter_mut().find(|(key, _)| key == id)?;
        let updated = f(&entry.1);
        entry.1 = updated.clone();
        Some(updated)
    }

    /// Remove a resource by id. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(key, _)| key != id);
        entries.len() != before
    }

    /// Generate an id not currently present in the collection.
    ///
    /// UUID v4 collisions are improbable, but the loop keeps the guarantee
    /// unconditional.
    pub fn fresh_id(&self) -> String {
        let entries = self.entries.read();
        loop {
            let candidate = Uuid::new_v4().to_string();
            if !entries.iter().any(|(key, _)| key == &candidate) {
                return candidate;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Top-level store holding every resource kind the server provisions
#[derive(Default)]
pub struct ResourceStore {
    pub users: Collection<ScimUser>,
    pub groups: Collection<ScimGroup>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}
