// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The capability interface between the discovery engine and the live
//! partition tree.
//!
//! Everything the walker learns about the fabric flows through one
//! collaborator, the [`AttributeProvider`].  The production implementation
//! sits on the firmware transport; the [`static_tree`] module provides a
//! file-backed implementation for offline generation and tests.
//!
//! Provider failures are fatal to the enclosing walk.  Retries, timeouts,
//! and polling all belong to the transport below this trait; they surface
//! here only as opaque errors.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[cfg(any(test, feature = "static-tree"))]
pub mod static_tree;

use model::{Endpoint, ObjectKey, ObjectLabel, ObjectType};
use std::collections::BTreeMap;
use tracing::error;

/// An opaque handle to an open container.
///
/// Handles are a scarce external resource.  They are obtained from
/// [`AttributeProvider::open_container`] and must be returned through
/// [`AttributeProvider::close_container`]; use [`OpenContainer`] to make the
/// release structural.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ContainerRef(u64);

impl ContainerRef {
    #[must_use]
    pub fn new(raw: u64) -> ContainerRef {
        ContainerRef(raw)
    }

    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Attributes of one container node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContainerAttributes {
    /// The container id, unique in the tree.
    pub id: u32,
    /// The raw capability-options bitmask as reported by the firmware.
    pub options: u64,
}

/// One child of a container, as reported by index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChildDescriptor {
    pub object_type: ObjectType,
    pub id: u32,
    pub label: Option<ObjectLabel>,
    /// True when the child is itself a container to recurse into.
    pub is_container: bool,
}

/// The query interface onto the live partition tree.
///
/// All calls are synchronous and block until the underlying round trip
/// completes.  Implementations decide nothing about the model; they only
/// report what the tree looks like.
pub trait AttributeProvider {
    /// Obtain a transient handle onto the container with the given id.
    fn open_container(&self, id: u32) -> Result<ContainerRef, ProviderError>;

    /// Release a handle obtained from [`AttributeProvider::open_container`].
    fn close_container(&self, cref: ContainerRef) -> Result<(), ProviderError>;

    fn container_attributes(
        &self,
        cref: &ContainerRef,
    ) -> Result<ContainerAttributes, ProviderError>;

    fn child_count(&self, cref: &ContainerRef) -> Result<usize, ProviderError>;

    fn child(&self, cref: &ContainerRef, index: usize) -> Result<ChildDescriptor, ProviderError>;

    /// The firmware-reported port count of a multi-port object.
    fn port_count(&self, object: &ObjectKey) -> Result<u16, ProviderError>;

    /// The peer of the given port, if the port is connected.
    ///
    /// `port` is `None` for single-port object types.
    fn port_peer(
        &self,
        object: &ObjectKey,
        port: Option<u16>,
    ) -> Result<Option<Endpoint>, ProviderError>;

    /// Object-specific key/value fields used to decorate the flat object
    /// listing.  Decoration only; never consulted for structure.
    fn enrichment(&self, object: &ObjectKey) -> Result<BTreeMap<String, String>, ProviderError>;
}

/// Errors reported by an [`AttributeProvider`].
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("no container with id {0}")]
    NoSuchContainer(u32),
    #[error("no object {0}")]
    NoSuchObject(ObjectKey),
    #[error("stale or foreign container handle {0:#x}")]
    InvalidHandle(u64),
    #[error("child index {index} out of range for container {container} ({count} children)")]
    ChildIndexOutOfRange {
        container: u32,
        index: usize,
        count: usize,
    },
    #[error("failed to decode tree description: {0}")]
    Decode(String),
}

/// A scoped container handle: opens on construction, closes on drop.
///
/// The walk unwinds through this guard on every exit path, so a handle can
/// never leak past the recursion frame that opened it.  A close failure
/// during drop is logged rather than propagated.
pub struct OpenContainer<'p, P: AttributeProvider + ?Sized> {
    provider: &'p P,
    cref: ContainerRef,
    id: u32,
}

impl<'p, P: AttributeProvider + ?Sized> OpenContainer<'p, P> {
    pub fn open(provider: &'p P, id: u32) -> Result<OpenContainer<'p, P>, ProviderError> {
        let cref = provider.open_container(id)?;
        Ok(OpenContainer { provider, cref, id })
    }

    #[must_use]
    pub fn cref(&self) -> &ContainerRef {
        &self.cref
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl<P: AttributeProvider + ?Sized> Drop for OpenContainer<'_, P> {
    fn drop(&mut self) {
        if let Err(e) = self.provider.close_container(self.cref) {
            error!("failed to close handle to container {}: {e}", self.id);
        }
    }
}
