// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Undirected port-links between object endpoints.

use crate::object::ObjectKey;
use std::fmt::{Display, Formatter};
use tracing::error;

/// One side of a [`PortLink`]: an object plus an optional port index.
///
/// Single-port object types carry no port index and render as `type@id`;
/// multi-port types render as `type@id/if@port`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    key: ObjectKey,
    port: Option<u16>,
}

impl Endpoint {
    #[must_use]
    pub fn new(key: ObjectKey, port: Option<u16>) -> Endpoint {
        Endpoint { key, port }
    }

    #[must_use]
    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}/if@{port}", self.key),
            None => write!(f, "{}", self.key),
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = InvalidEndpoint;

    /// Parse the `type@id` / `type@id/if@port` rendering back into an
    /// endpoint.
    fn from_str(input: &str) -> Result<Endpoint, Self::Err> {
        match input.split_once("/if@") {
            Some((key, port)) => {
                let key = key.parse::<ObjectKey>()?;
                let port = port
                    .parse::<u16>()
                    .map_err(|_| InvalidEndpoint::BadPort(input.to_string()))?;
                Ok(Endpoint::new(key, Some(port)))
            }
            None => Ok(Endpoint::new(input.parse::<ObjectKey>()?, None)),
        }
    }
}

/// Errors that can occur when parsing an endpoint string.
#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum InvalidEndpoint {
    #[error(transparent)]
    BadKey(#[from] crate::object::InvalidObjectKey),
    #[error("'{0}' does not carry a numeric port index")]
    BadPort(String),
}

/// An undirected connection between two object endpoints.
///
/// `(A, B)` and `(B, A)` denote the same link; the identity of a link is the
/// unordered pair of [`ObjectKey`]s, the port indices are its data.  The
/// original discovery orientation is preserved for rendering.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortLink {
    a: Endpoint,
    b: Endpoint,
}

impl PortLink {
    #[must_use]
    pub fn new(a: Endpoint, b: Endpoint) -> PortLink {
        PortLink { a, b }
    }

    #[must_use]
    pub fn endpoint_a(&self) -> &Endpoint {
        &self.a
    }

    #[must_use]
    pub fn endpoint_b(&self) -> &Endpoint {
        &self.b
    }

    /// True when both links denote the same unordered pair of object keys.
    #[must_use]
    fn same_pair(&self, other: &PortLink) -> bool {
        (self.a.key() == other.a.key() && self.b.key() == other.b.key())
            || (self.a.key() == other.b.key() && self.b.key() == other.a.key())
    }

    /// True when both links carry identical endpoint data, in either
    /// orientation.
    #[must_use]
    fn same_data(&self, other: &PortLink) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

/// An unordered, symmetric-deduplicating collection of [`PortLink`] records.
///
/// Links are found once from each side of the connection, so idempotent
/// rediscovery is the normal case, not an error.  Insertion order is
/// preserved; the registry is never sorted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LinkRegistry {
    entries: Vec<PortLink>,
}

impl LinkRegistry {
    #[must_use]
    pub fn new() -> LinkRegistry {
        LinkRegistry {
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

    /// Iterate the links in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &PortLink> {
        self.entries.iter()
    }

    /// Record a link between two endpoints.
    ///
    /// A symmetric match with identical endpoint data is a no-op success; a
    /// symmetric match with differing port data is fatal.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkConflict`] carrying both records when the same
    /// unordered key pair was already recorded with different data.
    pub fn insert(&mut self, link: PortLink) -> Result<(), LinkConflict> {
        for existing in &self.entries {
            if existing.same_pair(&link) {
                if existing.same_data(&link) {
                    return Ok(());
                }
                error!(
                    "conflicting peer data for link {} <-> {}: already recorded as {} <-> {}",
                    link.a, link.b, existing.a, existing.b
                );
                return Err(LinkConflict {
                    recorded: existing.clone(),
                    rejected: link,
                });
            }
        }
        self.entries.push(link);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LinkRegistry {
    type Item = &'a PortLink;
    type IntoIter = std::slice::Iter<'a, PortLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Two discoveries of the same unordered endpoint pair disagree on the data.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error(
    "link {} <-> {} conflicts with recorded link {} <-> {}",
    .rejected.endpoint_a(), .rejected.endpoint_b(),
    .recorded.endpoint_a(), .recorded.endpoint_b()
)]
pub struct LinkConflict {
    /// The record already held by the registry.
    pub recorded: PortLink,
    /// The insertion that disagreed with it.
    pub rejected: PortLink,
}
