// Netloom: Declarative Network Topology Orchestration
// Copyright (C) 2026  The Netloom Developers
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Test the topology graph model: identity, create-or-get semantics and
//! consistency checking.

use crate::attributes::AttributeValue;
use crate::attrs;
use crate::graph::{GraphError, Link, Node, Port, TopologyGraph};

/// # Test graph
///
/// ```text
/// sw1 ---- hs1
///   `----- hs1  (second link, parallel)
/// ```
fn get_test_graph() -> TopologyGraph {
    let mut graph = TopologyGraph::new();

    graph.create_node("sw1", attrs! {"name" => "My Switch 1"});
    graph.create_node("hs1", attrs! {"name" => "My Host 1", "type" => "host"});

    graph.create_port("p1", "sw1", attrs! {}).unwrap();
    graph.create_port("p2", "sw1", attrs! {}).unwrap();
    graph.create_port("p1", "hs1", attrs! {}).unwrap();
    graph.create_port("p2", "hs1", attrs! {}).unwrap();

    graph.create_link("sw1", "p1", "hs1", "p1", attrs! {}).unwrap();
    graph.create_link("sw1", "p2", "hs1", "p2", attrs! {}).unwrap();

    graph
}

#[test]
fn test_empty_graph() {
    let graph = TopologyGraph::new();
    assert_eq!(graph.nodes().count(), 0);
    assert_eq!(graph.ports().count(), 0);
    assert_eq!(graph.links().count(), 0);
    assert!(graph.environment().is_empty());
    graph.check_consistency().unwrap();
}

#[test]
fn test_port_calc_id() {
    assert_eq!(Port::calc_id("sw1", "eth0"), "sw1:eth0");
}

#[test]
fn test_link_calc_id_is_order_independent() {
    assert_eq!(
        Link::calc_id("sw1", "p1", "hs1", "p1"),
        Link::calc_id("hs1", "p1", "sw1", "p1"),
    );
    assert_eq!(Link::calc_id("hs1", "p1", "sw1", "p1"), "hs1:p1 -- sw1:p1");
}

#[test]
fn test_create_node_is_create_or_get() {
    let mut graph = TopologyGraph::new();
    graph.create_node("sw1", attrs! {"name" => "My Switch 1"});
    // second creation returns the original, new metadata is discarded
    let node = graph.create_node("sw1", attrs! {"name" => "Renamed"});
    assert_eq!(node.metadata().get("name"), Some(&AttributeValue::from("My Switch 1")));
    assert_eq!(graph.nodes().count(), 1);
}

#[test]
fn test_create_port_is_create_or_get() {
    let mut graph = TopologyGraph::new();
    graph.create_node("sw1", attrs! {});
    graph.create_port("p1", "sw1", attrs! {"speed" => 1000i64}).unwrap();
    let port = graph.create_port("p1", "sw1", attrs! {"speed" => 10i64}).unwrap();
    assert_eq!(port.metadata().get("speed"), Some(&AttributeValue::Int(1000)));
    assert_eq!(graph.ports().count(), 1);
}

#[test]
fn test_create_port_injects_label_metadata() {
    let mut graph = TopologyGraph::new();
    graph.create_node("sw1", attrs! {});
    let port = graph.create_port("eth0", "sw1", attrs! {}).unwrap();
    assert_eq!(port.metadata().get("label"), Some(&AttributeValue::from("eth0")));
    assert_eq!(port.identifier(), "sw1:eth0");
}

#[test]
fn test_create_link_is_create_or_get() {
    let mut graph = get_test_graph();
    let existing = graph
        .create_link("hs1", "p1", "sw1", "p1", attrs! {"attr1" => 1i64})
        .unwrap();
    // reversed endpoint order resolves to the same link, metadata discarded
    assert!(existing.metadata().get("attr1").is_none());
    assert_eq!(graph.links().count(), 2);
}

#[test]
fn test_create_port_for_missing_node_fails() {
    let mut graph = TopologyGraph::new();
    let result = graph.create_port("p1", "ghost", attrs! {});
    assert!(matches!(result, Err(GraphError::NotFound(_))));
}

#[test]
fn test_create_link_for_missing_port_fails() {
    let mut graph = TopologyGraph::new();
    graph.create_node("sw1", attrs! {});
    graph.create_node("hs1", attrs! {});
    graph.create_port("p1", "sw1", attrs! {}).unwrap();
    let result = graph.create_link("sw1", "p1", "hs1", "p1", attrs! {});
    assert!(matches!(result, Err(GraphError::NotFound(_))));
}

#[test]
fn test_create_link_with_identical_endpoints_fails() {
    let mut graph = TopologyGraph::new();
    graph.create_node("sw1", attrs! {});
    graph.create_port("p1", "sw1", attrs! {}).unwrap();
    let result = graph.create_link("sw1", "p1", "sw1", "p1", attrs! {});
    assert!(matches!(result, Err(GraphError::Inconsistent(_))));
}

#[test]
fn test_add_node_fails_on_collision() {
    let mut graph = TopologyGraph::new();
    graph.add_node(Node::new("sw1", attrs! {})).unwrap();
    let result = graph.add_node(Node::new("sw1", attrs! {}));
    assert!(matches!(result, Err(GraphError::AlreadyExists(_))));
}

#[test]
fn test_add_port_fails_on_ownership_mismatch() {
    let mut graph = TopologyGraph::new();
    graph.create_node("sw1", attrs! {});
    graph.create_node("hs1", attrs! {});
    // port claims hs1 but is attached to sw1
    let port = Port::new("p1", "hs1", attrs! {});
    let result = graph.add_port("sw1", port);
    assert!(matches!(result, Err(GraphError::Inconsistent(_))));
}

#[test]
fn test_add_port_fails_on_label_collision() {
    let mut graph = TopologyGraph::new();
    graph.create_node("sw1", attrs! {});
    graph.create_port("p1", "sw1", attrs! {}).unwrap();
    let result = graph.add_port("sw1", Port::new("p1", "sw1", attrs! {}));
    assert!(matches!(result, Err(GraphError::AlreadyExists(_))));
}

#[test]
fn test_lookups() {
    let graph = get_test_graph();

    assert!(graph.has_node("sw1"));
    assert!(!graph.has_node("ghost"));
    assert!(graph.has_port_id("sw1:p1"));
    assert!(!graph.has_port_id("sw1:p9"));
    assert!(graph.has_link("sw1", "p1", "hs1", "p1"));
    assert!(graph.has_link("hs1", "p1", "sw1", "p1"));
    assert!(!graph.has_link("sw1", "p2", "hs1", "p1"));
    assert!(graph.has_link_id("hs1:p1 -- sw1:p1"));

    assert_eq!(graph.get_node("sw1").unwrap().identifier(), "sw1");
    assert_eq!(graph.get_port_by_id("sw1:p1").unwrap().label(), "p1");
    assert_eq!(graph.get_port_by_label("sw1", "p1").unwrap().node_id(), "sw1");
    assert_eq!(
        graph.get_link("sw1", "p1", "hs1", "p1").unwrap().identifier(),
        graph.get_link("hs1", "p1", "sw1", "p1").unwrap().identifier(),
    );

    assert!(matches!(graph.get_node("ghost"), Err(GraphError::NotFound(_))));
    assert!(matches!(graph.get_port_by_id("sw1:p9"), Err(GraphError::NotFound(_))));
    assert!(matches!(graph.get_link_by_id("nope"), Err(GraphError::NotFound(_))));
}

#[test]
fn test_port_label_lookup_distinguishes_missing_node() {
    let graph = get_test_graph();
    // port missing on an existing node
    assert_eq!(graph.has_port_label("sw1", "p9"), Ok(false));
    assert!(matches!(graph.get_port_by_label("sw1", "p9"), Err(GraphError::NotFound(_))));
    // the node itself is missing
    assert!(matches!(graph.has_port_label("ghost", "p1"), Err(GraphError::NotFound(_))));
    assert!(matches!(graph.get_port_by_label("ghost", "p1"), Err(GraphError::NotFound(_))));
}

#[test]
fn test_nodes_iterate_in_insertion_order() {
    let mut graph = TopologyGraph::new();
    for name in &["b", "a", "d", "c"] {
        graph.create_node(name, attrs! {});
    }
    let order: Vec<&str> = graph.nodes().map(Node::identifier).collect();
    assert_eq!(order, vec!["b", "a", "d", "c"]);
}

#[test]
fn test_iteration_is_restartable() {
    let graph = get_test_graph();
    let first: Vec<String> = graph.ports().map(Port::identifier).collect();
    let second: Vec<String> = graph.ports().map(Port::identifier).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_neighbors_deduplicates_parallel_links() {
    let graph = get_test_graph();
    // sw1 and hs1 are connected by two parallel links
    let neighbors = graph.neighbors("sw1").unwrap();
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].identifier(), "hs1");
    assert!(matches!(graph.neighbors("ghost"), Err(GraphError::NotFound(_))));
}

#[test]
fn test_check_consistency() {
    let graph = get_test_graph();
    graph.check_consistency().unwrap();
}

#[test]
fn test_check_consistency_detects_missing_subnode() {
    let mut graph = get_test_graph();
    graph.get_node_mut("sw1").unwrap().add_subnode("ghost");
    assert!(matches!(graph.check_consistency(), Err(GraphError::NotFound(_))));
}

#[test]
fn test_set_parent_wires_both_sides() {
    let mut graph = TopologyGraph::new();
    graph.create_node("chassis", attrs! {});
    graph.create_node("card1", attrs! {});
    graph.set_parent("card1", "chassis").unwrap();

    assert_eq!(graph.get_node("card1").unwrap().parent(), Some("chassis"));
    let subnodes: Vec<&str> = graph.get_node("chassis").unwrap().subnodes().collect();
    assert_eq!(subnodes, vec!["card1"]);
    graph.check_consistency().unwrap();

    assert!(matches!(graph.set_parent("card1", "ghost"), Err(GraphError::NotFound(_))));
}

#[test]
fn test_as_dict() {
    let mut graph = get_test_graph();
    graph.environment_mut().insert("virtual".to_string(), AttributeValue::Bool(true));

    let dict = graph.as_dict();
    assert_eq!(dict["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(dict["ports"].as_array().unwrap().len(), 4);
    assert_eq!(dict["links"].as_array().unwrap().len(), 2);
    assert_eq!(dict["environment"]["virtual"], serde_json::Value::Bool(true));
    assert_eq!(dict["nodes"][0]["identifier"], "sw1");
    assert_eq!(dict["nodes"][0]["metadata"]["name"], "My Switch 1");
}

#[test]
#[allow(deprecated)]
fn test_deprecated_biports_match_ports() {
    let graph = get_test_graph();
    let biports = graph.biports();
    assert_eq!(biports.len(), graph.ports().count());
    for (node, port) in biports {
        assert_eq!(node.identifier(), port.node_id());
    }
}

#[test]
#[allow(deprecated)]
fn test_deprecated_bilinks_match_links() {
    let graph = get_test_graph();
    let bilinks = graph.bilinks();
    assert_eq!(bilinks.len(), graph.links().count());
    for ((node1, port1), (node2, port2), link) in bilinks {
        assert_eq!(
            Link::calc_id(node1.identifier(), port1.label(), node2.identifier(), port2.label()),
            link.identifier(),
        );
    }
}
