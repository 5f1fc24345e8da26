// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Layout snapshot serialization.
//!
//! [`generate_layout`] is the one operation this subsystem exposes: walk the
//! live partition tree and render it as a canonical, re-creatable textual
//! layout.  The document has three top-level sections in fixed order —
//! containers, objects, connections — and is byte-identical across repeated
//! invocations against an unchanged tree.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod builder;
mod render;
mod version;

// re-exports
pub use builder::LayoutBuilder;
pub use version::LayoutVersion;

use model::ObjectKey;
use provider::{AttributeProvider, ProviderError};
use render::render_fabric;
use walk::{FabricModel, WalkError, discover};

/// Errors that can abort a layout generation.
///
/// There is no partial-output mode: on error the caller gets this and
/// nothing else.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Discovery failed; nothing was rendered.
    #[error(transparent)]
    Walk(#[from] WalkError),
    /// An enrichment query failed while rendering the object section.
    #[error("failed to fetch attributes of {object}: {source}")]
    Enrichment {
        object: ObjectKey,
        #[source]
        source: ProviderError,
    },
}

/// Walk the tree rooted at `root_id` and render its layout snapshot.
///
/// # Errors
///
/// Returns a [`LayoutError`] if discovery hits a conflict, the nesting
/// limit, or a provider failure, or if an enrichment query fails during
/// rendering.
pub fn generate_layout<P: AttributeProvider + ?Sized>(
    provider: &P,
    root_id: u32,
    version: LayoutVersion,
) -> Result<String, LayoutError> {
    let fabric = discover(provider, root_id)?;
    render_layout(provider, &fabric, version)
}

/// Render an already-discovered model.
///
/// Split out from [`generate_layout`] so a model can be rendered at more
/// than one version without re-walking the tree.
pub fn render_layout<P: AttributeProvider + ?Sized>(
    provider: &P,
    fabric: &FabricModel,
    version: LayoutVersion,
) -> Result<String, LayoutError> {
    render_fabric(provider, fabric, version)
}
