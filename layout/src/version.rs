// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Target format versions of the layout document.

/// The layout format version, which selects how a container's local object
/// listing is rendered.
///
/// Version 9 is the legacy format: one node per object instance.  Version 10
/// compacts runs of the same type into `set@<type>` blocks with an id range.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display, strum::EnumString)]
pub enum LayoutVersion {
    /// Legacy listing: one sub-block per object.
    #[strum(serialize = "9")]
    V9,
    /// Compacting listing: one sub-block per run of equal type tags.
    #[default]
    #[strum(serialize = "10")]
    V10,
}

impl LayoutVersion {
    /// The numeric version written into the document header.
    #[must_use]
    pub fn number(self) -> u32 {
        match self {
            LayoutVersion::V9 => 9,
            LayoutVersion::V10 => 10,
        }
    }
}
