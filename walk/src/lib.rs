// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Topology discovery for the fabric partition tree.
//!
//! [`discover`] walks the live tree through an [`AttributeProvider`] and
//! produces a [`FabricModel`]: the container arena in pre-order plus the two
//! global registries.  The walk is synchronous, single-threaded, and
//! all-or-nothing — any conflict or query failure unwinds the whole thing
//! and nothing of the partial model survives.
//!
//! [`AttributeProvider`]: provider::AttributeProvider

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod errors;
mod fabric;
mod walker;

// re-exports
pub use errors::WalkError;
pub use fabric::FabricModel;
pub use walker::{MAX_NESTING_DEPTH, discover};
