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

//! Test the autoport allocation algorithm.

use crate::autoport::PortAllocator;
use crate::graph::GraphError;
use crate::manager::TopologyManager;
use std::collections::HashSet;

#[test]
fn test_symbolic_labels_get_next_free_number() {
    let mut allocator = PortAllocator::new();
    assert_eq!(allocator.allocate("hs1", "a", None).unwrap(), 1);
    assert_eq!(allocator.allocate("hs1", "2", None).unwrap(), 2);
    assert_eq!(allocator.allocate("hs1", "4", None).unwrap(), 4);
    // the counter skips numbers already consumed by explicit labels
    assert_eq!(allocator.allocate("hs1", "b", None).unwrap(), 3);
    assert_eq!(allocator.allocate("hs1", "c", None).unwrap(), 5);
}

#[test]
fn test_counters_are_independent_per_node() {
    let mut allocator = PortAllocator::new();
    assert_eq!(allocator.allocate("hs1", "a", None).unwrap(), 1);
    assert_eq!(allocator.allocate("hs2", "x", None).unwrap(), 1);
    assert_eq!(allocator.allocate("hs1", "b", None).unwrap(), 2);
    assert_eq!(allocator.allocate("hs2", "y", None).unwrap(), 2);
}

#[test]
fn test_explicit_number_wins_over_symbolic_label() {
    let mut allocator = PortAllocator::new();
    assert_eq!(allocator.allocate("hs1", "oobm", Some(5)).unwrap(), 5);
    // the next symbolic label starts from 1, not 6
    assert_eq!(allocator.allocate("hs1", "a", None).unwrap(), 1);
}

#[test]
fn test_duplicate_explicit_number_fails() {
    let mut allocator = PortAllocator::new();
    allocator.allocate("hs1", "oobm", Some(5)).unwrap();
    let result = allocator.allocate("hs1", "5", None);
    assert!(matches!(result, Err(GraphError::AlreadyExists(_))));
}

/// Port labels stay symbolic while physical numbers are assigned
/// underneath, matching the declared labels exactly.
#[test]
fn test_autoport_through_manager() {
    let topodesc = r#"
        [port_number=5] hs1:oobm
        hs1:a -- hs2:x
        hs1:2 -- hs2:2
        hs1:4 -- hs2:4
        hs1:b -- hs2:y
    "#;

    let mut topology = TopologyManager::new("debug").unwrap();
    topology.parse(topodesc, None, true).unwrap();
    topology.build().unwrap();

    assert!(topology.get("hs1").is_some());
    assert!(topology.get("hs2").is_some());

    let hs1_labels: HashSet<&str> =
        topology.ports()["hs1"].keys().map(|k| k.as_str()).collect();
    let hs2_labels: HashSet<&str> =
        topology.ports()["hs2"].keys().map(|k| k.as_str()).collect();
    assert_eq!(hs1_labels, ["oobm", "a", "2", "4", "b"].iter().copied().collect());
    assert_eq!(hs2_labels, ["x", "2", "4", "y"].iter().copied().collect());

    // the debug engine names engine ports after the logical label
    for (label, engine_port) in topology.ports()["hs1"].iter() {
        assert_eq!(label, engine_port);
    }

    // physical numbers: explicit ones preserved, symbolic ones filled in
    let graph = &topology.graph;
    assert_eq!(graph.get_port_by_label("hs1", "oobm").unwrap().port_number(), Some(5));
    assert_eq!(graph.get_port_by_label("hs1", "a").unwrap().port_number(), Some(1));
    assert_eq!(graph.get_port_by_label("hs1", "2").unwrap().port_number(), Some(2));
    assert_eq!(graph.get_port_by_label("hs1", "4").unwrap().port_number(), Some(4));
    assert_eq!(graph.get_port_by_label("hs1", "b").unwrap().port_number(), Some(3));
    assert_eq!(graph.get_port_by_label("hs2", "x").unwrap().port_number(), Some(1));
    assert_eq!(graph.get_port_by_label("hs2", "y").unwrap().port_number(), Some(3));

    topology.unbuild().unwrap();
}
