// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A file-backed [`AttributeProvider`] over a YAML tree description.
//!
//! Used by `fabricctl` for offline layout generation and by the walker and
//! serializer test suites as the test double.  The provider keeps a ledger
//! of currently-open handles so tests can prove that discovery releases
//! every handle on both success and error paths.

use crate::{
    AttributeProvider, ChildDescriptor, ContainerAttributes, ContainerRef, ProviderError,
};
use model::{Endpoint, ObjectKey, ObjectLabel, ObjectType, policy};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// One container in the tree description.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerSpec {
    pub id: u32,
    #[serde(default)]
    pub options: u64,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub children: Vec<ContainerSpec>,
}

/// One object in the tree description.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectSpec {
    #[serde(rename = "type")]
    pub object_type: String,
    pub id: u32,
    #[serde(default)]
    pub label: Option<String>,
    /// Reported port count; only meaningful for multi-port types.
    #[serde(default)]
    pub ports: Option<u16>,
    #[serde(default)]
    pub peers: Vec<PeerSpec>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// A connected peer of one port of an object.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerSpec {
    /// Local port index; absent for single-port types.
    #[serde(default)]
    pub port: Option<u16>,
    /// The remote endpoint, rendered as `type@id` or `type@id/if@port`.
    pub peer: String,
}

#[derive(Clone, Debug)]
struct ContainerNode {
    options: u64,
    children: Vec<ChildDescriptor>,
}

#[derive(Clone, Debug, Default)]
struct ObjectNode {
    ports: u16,
    peers: HashMap<Option<u16>, Endpoint>,
    fields: BTreeMap<String, String>,
}

/// An immutable in-memory partition tree implementing [`AttributeProvider`].
#[derive(Debug)]
pub struct StaticTree {
    root: u32,
    containers: HashMap<u32, ContainerNode>,
    objects: HashMap<ObjectKey, ObjectNode>,
    open: RefCell<HashMap<u64, u32>>,
    next_handle: Cell<u64>,
}

impl StaticTree {
    /// Build a provider from a YAML tree description.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Decode`] when the document does not parse,
    /// contains malformed type tags, labels, or endpoints, or declares the
    /// same container id twice.
    pub fn from_yaml(text: &str) -> Result<StaticTree, ProviderError> {
        let spec: ContainerSpec =
            serde_yaml_ng::from_str(text).map_err(|e| ProviderError::Decode(e.to_string()))?;
        StaticTree::from_spec(&spec)
    }

    /// Build a provider from a tree description file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<StaticTree, ProviderError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        StaticTree::from_yaml(&text)
    }

    /// Build a provider directly from a parsed [`ContainerSpec`].
    pub fn from_spec(spec: &ContainerSpec) -> Result<StaticTree, ProviderError> {
        let mut tree = StaticTree {
            root: spec.id,
            containers: HashMap::new(),
            objects: HashMap::new(),
            open: RefCell::new(HashMap::new()),
            next_handle: Cell::new(1),
        };
        tree.flatten(spec)?;
        Ok(tree)
    }

    /// The id of the root container of the description.
    #[must_use]
    pub fn root_id(&self) -> u32 {
        self.root
    }

    /// The number of handles currently open.  Zero whenever no walk is in
    /// flight, regardless of how the last walk ended.
    #[must_use]
    pub fn open_handles(&self) -> usize {
        self.open.borrow().len()
    }

    fn flatten(&mut self, spec: &ContainerSpec) -> Result<(), ProviderError> {
        if self.containers.contains_key(&spec.id) {
            return Err(ProviderError::Decode(format!(
                "container id {} declared twice",
                spec.id
            )));
        }
        let container_type = ObjectType::new(policy::CONTAINER_TYPE)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let mut children = Vec::with_capacity(spec.objects.len() + spec.children.len());
        for object in &spec.objects {
            let object_type = ObjectType::new(&object.object_type)
                .map_err(|e| ProviderError::Decode(e.to_string()))?;
            let label = object
                .label
                .as_deref()
                .map(ObjectLabel::new)
                .transpose()
                .map_err(|e| ProviderError::Decode(e.to_string()))?;
            children.push(ChildDescriptor {
                object_type: object_type.clone(),
                id: object.id,
                label,
                is_container: false,
            });
            let key = ObjectKey::new(object_type, object.id);
            let mut peers = HashMap::new();
            for peer in &object.peers {
                let endpoint = peer
                    .peer
                    .parse::<Endpoint>()
                    .map_err(|e| ProviderError::Decode(e.to_string()))?;
                peers.insert(peer.port, endpoint);
            }
            // duplicate (type, id) declarations keep the first node; the
            // descriptors above still surface both, which is exactly what a
            // conflicted live tree looks like to the walker
            self.objects.entry(key).or_insert(ObjectNode {
                ports: object.ports.unwrap_or(0),
                peers,
                fields: object.fields.clone(),
            });
        }
        for child in &spec.children {
            children.push(ChildDescriptor {
                object_type: container_type.clone(),
                id: child.id,
                label: None,
                is_container: true,
            });
        }
        self.containers.insert(
            spec.id,
            ContainerNode {
                options: spec.options,
                children,
            },
        );
        for child in &spec.children {
            self.flatten(child)?;
        }
        Ok(())
    }

    fn resolve(&self, cref: &ContainerRef) -> Result<u32, ProviderError> {
        self.open
            .borrow()
            .get(&cref.raw())
            .copied()
            .ok_or(ProviderError::InvalidHandle(cref.raw()))
    }

    fn node(&self, id: u32) -> Result<&ContainerNode, ProviderError> {
        self.containers
            .get(&id)
            .ok_or(ProviderError::NoSuchContainer(id))
    }

    fn object(&self, key: &ObjectKey) -> Result<&ObjectNode, ProviderError> {
        self.objects
            .get(key)
            .ok_or_else(|| ProviderError::NoSuchObject(key.clone()))
    }
}

impl AttributeProvider for StaticTree {
    fn open_container(&self, id: u32) -> Result<ContainerRef, ProviderError> {
        if !self.containers.contains_key(&id) {
            return Err(ProviderError::NoSuchContainer(id));
        }
        let raw = self.next_handle.get();
        self.next_handle.set(raw + 1);
        self.open.borrow_mut().insert(raw, id);
        debug!("opened handle {raw:#x} to container {id}");
        Ok(ContainerRef::new(raw))
    }

    fn close_container(&self, cref: ContainerRef) -> Result<(), ProviderError> {
        match self.open.borrow_mut().remove(&cref.raw()) {
            Some(id) => {
                debug!("closed handle {:#x} to container {id}", cref.raw());
                Ok(())
            }
            None => Err(ProviderError::InvalidHandle(cref.raw())),
        }
    }

    fn container_attributes(
        &self,
        cref: &ContainerRef,
    ) -> Result<ContainerAttributes, ProviderError> {
        let id = self.resolve(cref)?;
        let node = self.node(id)?;
        Ok(ContainerAttributes {
            id,
            options: node.options,
        })
    }

    fn child_count(&self, cref: &ContainerRef) -> Result<usize, ProviderError> {
        let id = self.resolve(cref)?;
        Ok(self.node(id)?.children.len())
    }

    fn child(&self, cref: &ContainerRef, index: usize) -> Result<ChildDescriptor, ProviderError> {
        let id = self.resolve(cref)?;
        let node = self.node(id)?;
        node.children
            .get(index)
            .cloned()
            .ok_or(ProviderError::ChildIndexOutOfRange {
                container: id,
                index,
                count: node.children.len(),
            })
    }

    fn port_count(&self, object: &ObjectKey) -> Result<u16, ProviderError> {
        Ok(self.object(object)?.ports)
    }

    fn port_peer(
        &self,
        object: &ObjectKey,
        port: Option<u16>,
    ) -> Result<Option<Endpoint>, ProviderError> {
        Ok(self.object(object)?.peers.get(&port).cloned())
    }

    fn enrichment(&self, object: &ObjectKey) -> Result<BTreeMap<String, String>, ProviderError> {
        Ok(self.object(object)?.fields.clone())
    }
}
