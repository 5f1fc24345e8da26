// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Partition-tree containers and their capability options.

use crate::registry::ObjectRegistry;

bitflags::bitflags! {
    /// Capability options carried by a container.
    ///
    /// The bit values are part of the firmware ABI.  Bits outside the known
    /// set are retained verbatim so the layout can surface them instead of
    /// silently dropping them.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct ContainerOptions: u64 {
        /// The container may spawn child containers.
        const SPAWN_ALLOWED = 0x0001;
        /// The container may allocate resources from its parent.
        const ALLOC_ALLOWED = 0x0002;
        /// The container may create new objects.
        const OBJ_CREATE_ALLOWED = 0x0004;
        /// The container may change the partition topology.
        const TOPOLOGY_CHANGES_ALLOWED = 0x0008;
        /// The container hosts an AIOP.
        const AIOP = 0x0020;
        /// The container may reconfigure interrupts.
        const IRQ_CFG_ALLOWED = 0x0040;

        const _ = !0;
    }
}

impl ContainerOptions {
    /// The bits set in this value that correspond to no known flag.
    #[must_use]
    pub fn unrecognized_bits(&self) -> u64 {
        let known = ContainerOptions::SPAWN_ALLOWED
            | ContainerOptions::ALLOC_ALLOWED
            | ContainerOptions::OBJ_CREATE_ALLOWED
            | ContainerOptions::TOPOLOGY_CHANGES_ALLOWED
            | ContainerOptions::AIOP
            | ContainerOptions::IRQ_CFG_ALLOWED;
        self.bits() & !known.bits()
    }
}

/// One node of the partition tree.
///
/// A container owns its local [`ObjectRegistry`] copy of the objects
/// discovered inside it, independent from the global registry.  Child
/// containers are linked by parent id only; they never appear in object
/// registries.
#[derive(Clone, Debug)]
pub struct Container {
    id: u32,
    parent: Option<u32>,
    options: ContainerOptions,
    objects: ObjectRegistry,
}

impl Container {
    #[must_use]
    pub fn new(id: u32, parent: Option<u32>, options: ContainerOptions) -> Container {
        Container {
            id,
            parent,
            options,
            objects: ObjectRegistry::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The parent container id; `None` for the root of the tree.
    #[must_use]
    pub fn parent(&self) -> Option<u32> {
        self.parent
    }

    #[must_use]
    pub fn options(&self) -> ContainerOptions {
        self.options
    }

    /// The objects local to this container, in `(type, id)` order.
    #[must_use]
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    #[must_use]
    pub fn objects_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.objects
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test {
    use super::*;

    #[test]
    fn unknown_option_bits_are_retained() {
        let options = ContainerOptions::from_bits_retain(0x8001);
        assert!(options.contains(ContainerOptions::SPAWN_ALLOWED));
        assert_eq!(options.unrecognized_bits(), 0x8000);
    }

    #[test]
    fn known_bits_are_not_unrecognized() {
        let options = ContainerOptions::SPAWN_ALLOWED | ContainerOptions::IRQ_CFG_ALLOWED;
        assert_eq!(options.unrecognized_bits(), 0);
    }

    #[test]
    fn known_bits_cover_the_firmware_abi_values() {
        assert_eq!(ContainerOptions::SPAWN_ALLOWED.bits(), 0x0001);
        assert_eq!(ContainerOptions::ALLOC_ALLOWED.bits(), 0x0002);
        assert_eq!(ContainerOptions::OBJ_CREATE_ALLOWED.bits(), 0x0004);
        assert_eq!(ContainerOptions::TOPOLOGY_CHANGES_ALLOWED.bits(), 0x0008);
        assert_eq!(ContainerOptions::AIOP.bits(), 0x0020);
        assert_eq!(ContainerOptions::IRQ_CFG_ALLOWED.bits(), 0x0040);
    }
}
