// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Fatal conditions encountered during discovery.

use crate::walker::MAX_NESTING_DEPTH;
use model::{DuplicateObject, LinkConflict};
use provider::ProviderError;

/// Why a walk was abandoned.
///
/// Every variant is fatal: the enclosing generation aborts, no partial
/// output is produced, and no retry happens at this layer.  Each variant
/// carries enough context to point at the container, object, or link that
/// failed.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum WalkError {
    /// An attribute-provider round trip failed.
    #[error("query '{what}' failed in container {container}: {source}")]
    Query {
        what: &'static str,
        container: u32,
        #[source]
        source: ProviderError,
    },
    /// Two discovered objects share a `(type, id)` key.
    #[error("while walking container {container}: {source}")]
    DuplicateObject {
        container: u32,
        #[source]
        source: DuplicateObject,
    },
    /// Two discoveries of the same endpoint pair disagree.
    #[error(transparent)]
    AmbiguousLink(#[from] LinkConflict),
    /// The tree nests deeper than the supported limit.
    #[error(
        "container {container} sits at nesting depth {depth}, beyond the supported maximum of {max}",
        max = MAX_NESTING_DEPTH
    )]
    NestingTooDeep { container: u32, depth: usize },
}

impl WalkError {
    pub(crate) fn query(what: &'static str, container: u32, source: ProviderError) -> WalkError {
        WalkError::Query {
            what,
            container,
            source,
        }
    }
}
