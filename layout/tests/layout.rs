// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! End-to-end layout generation against a static tree description.

use fabric_layout::{LayoutError, LayoutVersion, generate_layout, render_layout};
use pretty_assertions::assert_eq;
use provider::static_tree::StaticTree;
use walk::{WalkError, discover};

// root dprc@1 holds one nested container dprc@2 owning dpio.0, dpni.5 and
// dpni.6, with dpni.5 linked to dpio.0 (no ports on either side)
const SCENARIO: &str = r"
id: 1
children:
  - id: 2
    objects:
      - { type: dpio, id: 0, peers: [{ peer: dpni@5 }] }
      - { type: dpni, id: 5, peers: [{ peer: dpio@0 }] }
      - { type: dpni, id: 6 }
";

#[test]
fn scenario_compacting_layout() {
    let tree = StaticTree::from_yaml(SCENARIO).unwrap();
    let text = generate_layout(&tree, 1, LayoutVersion::V10).unwrap();
    let expected = "\
layout {
    version = 10
    containers {
        dprc@1 {
            parent = none
            options = <none>
            objects {
            }
        }
        dprc@2 {
            parent = dprc@1
            options = <none>
            objects {
                set@dpio {
                    type = dpio
                    ids = [0]
                }
                set@dpni {
                    type = dpni
                    ids = [5..6]
                }
            }
        }
    }
    objects {
        dpio@0 {
        }
        dpni@5 {
        }
        dpni@6 {
        }
    }
    connections {
        link@0 {
            endpoint1 = dpio@0
            endpoint2 = dpni@5
        }
    }
}
";
    assert_eq!(text, expected);
}

#[test]
fn scenario_legacy_layout() {
    let tree = StaticTree::from_yaml(SCENARIO).unwrap();
    let text = generate_layout(&tree, 1, LayoutVersion::V9).unwrap();
    let expected = "\
layout {
    version = 9
    containers {
        dprc@1 {
            parent = none
            options = <none>
            objects {
            }
        }
        dprc@2 {
            parent = dprc@1
            options = <none>
            objects {
                obj@0 {
                    type = dpio
                    id = 0
                }
                obj@100 {
                    type = dpni
                    id = 5
                }
                obj@101 {
                    type = dpni
                    id = 6
                }
            }
        }
    }
    objects {
        dpio@0 {
        }
        dpni@5 {
        }
        dpni@6 {
        }
    }
    connections {
        link@0 {
            endpoint1 = dpio@0
            endpoint2 = dpni@5
        }
    }
}
";
    assert_eq!(text, expected);
}

#[test]
fn one_discovered_model_renders_at_both_versions() {
    let tree = StaticTree::from_yaml(SCENARIO).unwrap();
    let fabric = discover(&tree, 1).unwrap();
    let compact = render_layout(&tree, &fabric, LayoutVersion::V10).unwrap();
    let legacy = render_layout(&tree, &fabric, LayoutVersion::V9).unwrap();
    // rendering the retained model matches a fresh walk at each version
    assert_eq!(
        compact,
        generate_layout(&tree, 1, LayoutVersion::V10).unwrap()
    );
    assert_eq!(legacy, generate_layout(&tree, 1, LayoutVersion::V9).unwrap());
}

#[test]
fn generation_is_idempotent() {
    let tree = StaticTree::from_yaml(SCENARIO).unwrap();
    let first = generate_layout(&tree, 1, LayoutVersion::V10).unwrap();
    let second = generate_layout(&tree, 1, LayoutVersion::V10).unwrap();
    assert_eq!(first, second);
    assert_eq!(tree.open_handles(), 0);
}

#[test]
fn labels_and_enrichment_decorate_the_flat_section() {
    let tree = StaticTree::from_yaml(
        r"
id: 1
objects:
  - type: dpni
    id: 5
    label: boot-nic
    fields: { mac_addr: '00:11:22:33:44:55', max_queues: '8' }
",
    )
    .unwrap();
    let text = generate_layout(&tree, 1, LayoutVersion::V10).unwrap();
    let expected_block = "\
    objects {
        dpni@5 {
            label = \"boot-nic\"
            mac_addr = \"00:11:22:33:44:55\"
            max_queues = \"8\"
        }
    }
";
    assert!(text.contains(expected_block), "got:\n{text}");
}

#[test]
fn housekeeping_never_appears_in_any_section() {
    let tree = StaticTree::from_yaml(
        r"
id: 1
objects:
  - { type: dpmcp, id: 0 }
  - { type: dpmcp, id: 3 }
  - { type: dpni, id: 5, peers: [{ peer: dpmcp@0 }] }
",
    )
    .unwrap();
    let text = generate_layout(&tree, 1, LayoutVersion::V10).unwrap();
    assert!(!text.contains("dpmcp@0"), "got:\n{text}");
    assert!(text.contains("dpmcp@3"));
    // the portal's link is bookkeeping too; the connections section is empty
    assert!(text.contains("    connections {\n    }\n"), "got:\n{text}");
}

#[test]
fn unrecognized_option_bits_are_surfaced() {
    let tree = StaticTree::from_yaml(
        r"
id: 1
options: 32769
",
    )
    .unwrap();
    // 32769 == 0x8001: SPAWN_ALLOWED plus one bit outside the known set
    let text = generate_layout(&tree, 1, LayoutVersion::V10).unwrap();
    assert!(
        text.contains("options = <SPAWN_ALLOWED | UNRECOGNIZED(0x8000)>"),
        "got:\n{text}"
    );
}

#[test]
fn conflicts_abort_before_any_output() {
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
    let err = generate_layout(&tree, 1, LayoutVersion::V10).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::Walk(WalkError::DuplicateObject { container: 2, .. })
    ));
    assert_eq!(tree.open_handles(), 0);
}

#[test]
fn multi_port_links_render_port_indices() {
    let tree = StaticTree::from_yaml(
        r"
id: 1
objects:
  - { type: dpsw, id: 0, ports: 2, peers: [{ port: 1, peer: dpni@5 }] }
  - { type: dpni, id: 5, peers: [{ peer: dpsw@0/if@1 }] }
",
    )
    .unwrap();
    let text = generate_layout(&tree, 1, LayoutVersion::V10).unwrap();
    let expected_block = "\
    connections {
        link@0 {
            endpoint1 = dpsw@0/if@1
            endpoint2 = dpni@5
        }
    }
";
    assert!(text.contains(expected_block), "got:\n{text}");
}
