// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The in-memory model of one discovered fabric.

use model::{Container, LinkRegistry, ObjectRegistry};

/// Everything one generation run discovered.
///
/// Containers live in an arena in pre-order discovery order, linked by
/// parent id; there is no pointer threading to maintain.  The whole model is
/// scoped to a single generation call and is dropped on every exit path.
#[derive(Clone, Debug, Default)]
pub struct FabricModel {
    pub(crate) containers: Vec<Container>,
    pub(crate) objects: ObjectRegistry,
    pub(crate) links: LinkRegistry,
}

impl FabricModel {
    #[must_use]
    pub(crate) fn new() -> FabricModel {
        FabricModel::default()
    }

    /// The containers in pre-order: every parent precedes its children.
    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// The flat, tree-wide object registry.
    #[must_use]
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    /// The deduplicated port-link graph, in discovery order.
    #[must_use]
    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }
}
