// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Data model for a hardware resource-partitioning tree.
//!
//! A *fabric* is a tree of [`Container`]s, each owning hardware-backed
//! [`Object`]s identified by a `(type, id)` pair, with undirected
//! [`PortLink`]s between object endpoints.  This crate holds the canonical
//! in-memory representation and the two collections with non-trivial
//! invariants:
//!
//! - [`ObjectRegistry`]: sorted, duplicate-rejecting object list;
//! - [`LinkRegistry`]: unordered, symmetric-deduplicating link list.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod container;
mod link;
mod object;
pub mod policy;
mod registry;

// re-exports
pub use container::{Container, ContainerOptions};
pub use link::{Endpoint, InvalidEndpoint, LinkConflict, LinkRegistry, PortLink};
pub use object::{
    InvalidObjectKey, InvalidObjectLabel, InvalidObjectType, Object, ObjectKey, ObjectLabel,
    ObjectType,
};
pub use registry::{DuplicateObject, ObjectRegistry};
