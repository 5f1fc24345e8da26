// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Named discovery policies.
//!
//! These are policies of the fabric itself, not of any one walker, so they
//! live here where they are visible and testable.

use crate::object::{ObjectKey, ObjectType};

/// The type tag of container nodes.
pub const CONTAINER_TYPE: &str = "dprc";

/// The type tag of the housekeeping object.
pub const HOUSEKEEPING_TYPE: &str = "dpmcp";

/// The id the firmware reserves for its own command portal.
pub const HOUSEKEEPING_ID: u32 = 0;

/// True for the single well-known housekeeping object.
///
/// Every container exposes the firmware's own command portal
/// (`dpmcp@0`) among its children.  It is implicit bookkeeping, not a
/// user-visible resource: it is excluded from every registry and from all
/// rendered output.
#[must_use]
pub fn is_housekeeping(key: &ObjectKey) -> bool {
    key.object_type().as_str() == HOUSEKEEPING_TYPE && key.id() == HOUSEKEEPING_ID
}

/// How an object type exposes connectable ports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PortExposure {
    /// No ports; the object never appears in a link.
    None,
    /// Exactly one implicit port, addressed without a port index.
    Single,
    /// A firmware-reported number of indexed ports.
    Multi,
}

/// The port-exposure policy for an object type.
///
/// Switches and demuxes carry an indexed port per interface; containers
/// carry none; everything else has a single implicit endpoint.
#[must_use]
pub fn port_exposure(object_type: &ObjectType) -> PortExposure {
    match object_type.as_str() {
        CONTAINER_TYPE => PortExposure::None,
        "dpsw" | "dpdmux" => PortExposure::Multi,
        _ => PortExposure::Single,
    }
}
