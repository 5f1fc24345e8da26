// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The canonical, sorted object registry.

use crate::object::{Object, ObjectKey};
use tracing::error;

/// An ordered, duplicate-detecting collection of [`Object`] records.
///
/// One registry exists for the whole tree (the flat listing in a layout) and
/// one per container (the nested listing).  After every call the list is
/// sorted by `(type, id)` and holds no duplicate keys.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ObjectRegistry {
    entries: Vec<Object>,
}

impl ObjectRegistry {
    #[must_use]
    pub fn new() -> ObjectRegistry {
        ObjectRegistry {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.entries.iter().any(|entry| entry.key() == key)
    }

    /// Iterate the entries front-to-back in non-decreasing `(type, id)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter()
    }

    /// Insert an [`Object`], keeping the list sorted.
    ///
    /// The conflict scan precedes the insert: discovering the same
    /// `(type, id)` twice is a modeling conflict, never a silent merge.
    ///
    /// # Errors
    ///
    /// Returns a [`DuplicateObject`] error when the key is already present.
    pub fn insert(&mut self, object: Object) -> Result<(), DuplicateObject> {
        if self.contains(object.key()) {
            error!("refusing to register {}: already present", object.key());
            return Err(DuplicateObject(object));
        }
        let at = self
            .entries
            .partition_point(|entry| entry.key() < object.key());
        self.entries.insert(at, object);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ObjectRegistry {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Two discovered objects share the same `(type, id)` key.
///
/// Carries the rejected record so callers can report which object collided.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("object {key} is already registered", key = .0.key())]
pub struct DuplicateObject(pub Object);
