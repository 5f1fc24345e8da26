// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The recursive discovery walk.

use crate::errors::WalkError;
use crate::fabric::FabricModel;
use model::policy::{self, PortExposure};
use model::{Container, ContainerOptions, Endpoint, Object, ObjectKey, PortLink};
use provider::{AttributeProvider, OpenContainer};
use tracing::debug;

/// The maximum number of container levels a fabric may nest.
///
/// The root sits at depth 0.  A tree deeper than this is an invariant
/// violation of the fabric itself and aborts discovery; it is never silently
/// truncated.
pub const MAX_NESTING_DEPTH: usize = 16;

/// Walk the partition tree rooted at `root_id` and build its model.
///
/// Discovery is depth-first: each container's local objects and links are
/// recorded before its child containers are visited, so the container arena
/// comes out in pre-order.  The transient handle onto each visited container
/// is released before its children are entered, on success and failure
/// alike.
///
/// # Errors
///
/// Returns a [`WalkError`] on the first conflict, nesting violation, or
/// provider failure; the partial model is discarded.
pub fn discover<P: AttributeProvider + ?Sized>(
    provider: &P,
    root_id: u32,
) -> Result<FabricModel, WalkError> {
    let mut fabric = FabricModel::new();
    walk_container(provider, &mut fabric, root_id, None, 0)?;
    debug!(
        "discovered {} containers, {} objects, {} links",
        fabric.containers.len(),
        fabric.objects.len(),
        fabric.links.len()
    );
    Ok(fabric)
}

fn walk_container<P: AttributeProvider + ?Sized>(
    provider: &P,
    fabric: &mut FabricModel,
    id: u32,
    parent: Option<u32>,
    depth: usize,
) -> Result<(), WalkError> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(WalkError::NestingTooDeep {
            container: id,
            depth,
        });
    }

    let mut nested = Vec::new();
    let mut container;
    {
        let handle = OpenContainer::open(provider, id)
            .map_err(|e| WalkError::query("open_container", id, e))?;
        let attrs = provider
            .container_attributes(handle.cref())
            .map_err(|e| WalkError::query("container_attributes", id, e))?;
        container = Container::new(
            attrs.id,
            parent,
            ContainerOptions::from_bits_retain(attrs.options),
        );

        let count = provider
            .child_count(handle.cref())
            .map_err(|e| WalkError::query("child_count", id, e))?;
        for index in 0..count {
            let child = provider
                .child(handle.cref(), index)
                .map_err(|e| WalkError::query("child", id, e))?;
            if child.is_container {
                nested.push(child.id);
                continue;
            }
            let key = ObjectKey::new(child.object_type, child.id);
            if policy::is_housekeeping(&key) {
                debug!("container {id}: leaving housekeeping object {key} out of the model");
                continue;
            }
            let object = Object::new(key.clone(), child.label);
            // both registries record the event independently; either
            // conflict kills the walk
            container
                .objects_mut()
                .insert(object.clone())
                .map_err(|e| WalkError::DuplicateObject {
                    container: id,
                    source: e,
                })?;
            fabric
                .objects
                .insert(object)
                .map_err(|e| WalkError::DuplicateObject {
                    container: id,
                    source: e,
                })?;
            discover_links(provider, fabric, &key, id)?;
        }
        // handle drops (and closes) here, before any child is entered
    }

    fabric.containers.push(container);
    for child_id in nested {
        walk_container(provider, fabric, child_id, Some(id), depth + 1)?;
    }
    Ok(())
}

fn discover_links<P: AttributeProvider + ?Sized>(
    provider: &P,
    fabric: &mut FabricModel,
    key: &ObjectKey,
    container: u32,
) -> Result<(), WalkError> {
    match policy::port_exposure(key.object_type()) {
        PortExposure::None => Ok(()),
        PortExposure::Single => probe_port(provider, fabric, key, None, container),
        PortExposure::Multi => {
            let count = provider
                .port_count(key)
                .map_err(|e| WalkError::query("port_count", container, e))?;
            for port in 0..count {
                probe_port(provider, fabric, key, Some(port), container)?;
            }
            Ok(())
        }
    }
}

fn probe_port<P: AttributeProvider + ?Sized>(
    provider: &P,
    fabric: &mut FabricModel,
    key: &ObjectKey,
    port: Option<u16>,
    container: u32,
) -> Result<(), WalkError> {
    let peer = provider
        .port_peer(key, port)
        .map_err(|e| WalkError::query("port_peer", container, e))?;
    if let Some(peer) = peer {
        if policy::is_housekeeping(peer.key()) {
            debug!("container {container}: leaving link {key} <-> {peer} out of the model");
            return Ok(());
        }
        let link = PortLink::new(Endpoint::new(key.clone(), port), peer);
        fabric.links.insert(link)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test {
    use super::*;
    use model::{DuplicateObject, ObjectLabel, ObjectType};
    use pretty_assertions::assert_eq;
    use provider::ProviderError;
    use provider::static_tree::StaticTree;

    // the scenario from the layout contract: root dprc@1 holds dprc@2,
    // which owns dpio.0, dpni.5 and dpni.6, with dpni.5 <-> dpio.0
    const SCENARIO: &str = r"
id: 1
children:
  - id: 2
    objects:
      - { type: dpni, id: 6 }
      - { type: dpni, id: 5, peers: [{ peer: dpio@0 }] }
      - { type: dpio, id: 0, peers: [{ peer: dpni@5 }] }
";

    fn key(tag: &str, id: u32) -> ObjectKey {
        ObjectKey::new(ObjectType::new(tag).unwrap(), id)
    }

    #[test]
    fn scenario_model() {
        let tree = StaticTree::from_yaml(SCENARIO).unwrap();
        let fabric = discover(&tree, tree.root_id()).unwrap();

        let ids: Vec<(u32, Option<u32>)> = fabric
            .containers()
            .iter()
            .map(|c| (c.id(), c.parent()))
            .collect();
        assert_eq!(ids, vec![(1, None), (2, Some(1))]);

        let global: Vec<String> = fabric
            .objects()
            .iter()
            .map(|o| o.key().to_string())
            .collect();
        assert_eq!(global, vec!["dpio@0", "dpni@5", "dpni@6"]);

        // the link is recorded once even though both sides declare it
        assert_eq!(fabric.links().len(), 1);
        let link = fabric.links().iter().next().unwrap();
        assert_eq!(link.endpoint_a().to_string(), "dpni@5");
        assert_eq!(link.endpoint_b().to_string(), "dpio@0");

        assert_eq!(tree.open_handles(), 0);
    }

    #[test]
    fn local_and_global_registries_are_independent_copies() {
        let tree = StaticTree::from_yaml(SCENARIO).unwrap();
        let fabric = discover(&tree, tree.root_id()).unwrap();
        assert!(fabric.containers()[0].objects().is_empty());
        assert_eq!(fabric.containers()[1].objects().len(), 3);
        assert_eq!(fabric.objects().len(), 3);
    }

    #[test]
    fn housekeeping_portal_is_excluded() {
        let tree = StaticTree::from_yaml(
            r"
id: 1
objects:
  - { type: dpmcp, id: 0 }
  - { type: dpmcp, id: 1 }
",
        )
        .unwrap();
        let fabric = discover(&tree, 1).unwrap();
        let global: Vec<String> = fabric
            .objects()
            .iter()
            .map(|o| o.key().to_string())
            .collect();
        // dpmcp@0 is the firmware's own portal; dpmcp@1 is a real resource
        assert_eq!(global, vec!["dpmcp@1"]);
    }

    #[test]
    fn links_to_the_housekeeping_portal_are_excluded() {
        let tree = StaticTree::from_yaml(
            r"
id: 1
objects:
  - { type: dpmcp, id: 0 }
  - { type: dpni, id: 5, peers: [{ peer: dpmcp@0 }] }
",
        )
        .unwrap();
        let fabric = discover(&tree, 1).unwrap();
        // the portal is bookkeeping on both ends of a connection
        assert!(fabric.links().is_empty());
        assert_eq!(fabric.objects().len(), 1);
    }

    #[test]
    fn duplicate_object_across_containers_aborts() {
        let tree = StaticTree::from_yaml(
            r"
id: 1
objects:
  - { type: dpni, id: 5, label: first }
children:
  - id: 2
    objects:
      - { type: dpni, id: 5, label: second }
",
        )
        .unwrap();
        let err = discover(&tree, 1).unwrap_err();
        let expected = Object::new(key("dpni", 5), Some(ObjectLabel::new("second").unwrap()));
        assert_eq!(
            err,
            WalkError::DuplicateObject {
                container: 2,
                source: DuplicateObject(expected),
            }
        );
        // the aborted walk released every handle it opened
        assert_eq!(tree.open_handles(), 0);
    }

    #[test]
    fn conflicting_peer_data_aborts() {
        let tree = StaticTree::from_yaml(
            r"
id: 1
objects:
  - { type: dpni, id: 5, peers: [{ peer: dpsw@0/if@3 }] }
  - { type: dpsw, id: 0, ports: 1, peers: [{ port: 0, peer: dpni@5 }] }
",
        )
        .unwrap();
        // dpni@5 claims the switch port 3; the switch reports the link on
        // port 0
        let err = discover(&tree, 1).unwrap_err();
        assert!(matches!(err, WalkError::AmbiguousLink(_)));
        assert_eq!(tree.open_handles(), 0);
    }

    #[test]
    fn multi_port_objects_probe_each_reported_port() {
        let tree = StaticTree::from_yaml(
            r"
id: 1
objects:
  - type: dpsw
    id: 0
    ports: 3
    peers:
      - { port: 0, peer: dpni@5 }
      - { port: 2, peer: dpni@6 }
  - { type: dpni, id: 5, peers: [{ peer: dpsw@0/if@0 }] }
  - { type: dpni, id: 6, peers: [{ peer: dpsw@0/if@2 }] }
",
        )
        .unwrap();
        let fabric = discover(&tree, 1).unwrap();
        let links: Vec<String> = fabric
            .links()
            .iter()
            .map(|l| format!("{} {}", l.endpoint_a(), l.endpoint_b()))
            .collect();
        assert_eq!(links, vec!["dpsw@0/if@0 dpni@5", "dpsw@0/if@2 dpni@6"]);
    }

    #[test]
    fn nesting_limit_is_fatal_not_truncating() {
        // a chain of MAX_NESTING_DEPTH + 1 containers: ids 1..=17
        let mut doc = String::from("id: 1\nchildren:\n");
        for level in 1..=MAX_NESTING_DEPTH {
            let pad = "  ".repeat(level);
            doc.push_str(&format!("{pad}- id: {}\n", level + 1));
            if level < MAX_NESTING_DEPTH {
                doc.push_str(&format!("{pad}  children:\n"));
            }
        }
        let tree = StaticTree::from_yaml(&doc).unwrap();
        let err = discover(&tree, 1).unwrap_err();
        assert_eq!(
            err,
            WalkError::NestingTooDeep {
                container: u32::try_from(MAX_NESTING_DEPTH).unwrap() + 1,
                depth: MAX_NESTING_DEPTH,
            }
        );
        assert_eq!(tree.open_handles(), 0);
    }

    #[test]
    fn provider_failure_propagates_with_container_context() {
        let tree = StaticTree::from_yaml(SCENARIO).unwrap();
        let err = discover(&tree, 7).unwrap_err();
        assert_eq!(
            err,
            WalkError::Query {
                what: "open_container",
                container: 7,
                source: ProviderError::NoSuchContainer(7),
            }
        );
    }

    #[test]
    fn discovery_is_repeatable() {
        let tree = StaticTree::from_yaml(SCENARIO).unwrap();
        let first = discover(&tree, 1).unwrap();
        let second = discover(&tree, 1).unwrap();
        assert_eq!(first.objects(), second.objects());
        assert_eq!(first.links(), second.links());
    }
}
