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

//! # Topology graph model
//!
//! This module contains the in-memory representation of a topology: nodes,
//! ports, links and the free-form environment. The [`TopologyGraph`] owns
//! every entity and indexes ports and links by their derived identifiers.
//! Beside the identity maps, it maintains an undirected adjacency index
//! used for neighbor queries and for cross-checking the link table during
//! [`TopologyGraph::check_consistency`].
//!
//! Creation follows a create-or-get convention: `create_node`,
//! `create_port` and `create_link` return the existing entity unchanged
//! when the identifier is already present, discarding the metadata of the
//! second call. The lower-level `add_node`, `add_port` and `add_link`
//! mutators insert a pre-built entity and fail on identifier collisions
//! instead.

mod link;
mod node;
mod port;

pub use link::{Link, LINK_ID_SEPARATOR};
pub use node::Node;
pub use port::{Port, LABEL_KEY, PORT_NUMBER_KEY};

use crate::attributes::Attributes;
use itertools::Itertools;
use log::*;
use petgraph::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

/// Graph errors
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// A referenced node, port or link does not exist
    #[error("Not found: {0}")]
    NotFound(String),
    /// A directly inserted entity collides with an existing identifier
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// An entity contradicts its own stated ownership or structure
    #[error("Inconsistent: {0}")]
    Inconsistent(String),
}

type AdjacencyIndex = Graph<String, String, Undirected, u32>;

/// The container of all nodes, ports, links and environment data of one
/// topology.
///
/// Nodes iterate in insertion order; ports and links iterate in a stable,
/// implementation-defined order (also insertion order here). A graph is
/// populated incrementally or in bulk from a parsed description, optionally
/// validated with [`TopologyGraph::check_consistency`], and discarded
/// wholesale when the owning manager is torn down or replaced.
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    nodes: HashMap<String, Node>,
    node_order: Vec<String>,
    ports: HashMap<String, Port>,
    port_order: Vec<String>,
    links: HashMap<String, Link>,
    link_order: Vec<String>,
    environment: Attributes,
    adjacency: AdjacencyIndex,
    adjacency_lookup: HashMap<String, NodeIndex<u32>>,
}

impl Default for TopologyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyGraph {
    /// Generate an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            node_order: Vec::new(),
            ports: HashMap::new(),
            port_order: Vec::new(),
            links: HashMap::new(),
            link_order: Vec::new(),
            environment: Attributes::new(),
            adjacency: AdjacencyIndex::new_undirected(),
            adjacency_lookup: HashMap::new(),
        }
    }

    /// Create a node, or return the existing one with the same identifier.
    ///
    /// When the identifier is already present, the existing node is
    /// returned unchanged and the new metadata is discarded.
    pub fn create_node(&mut self, identifier: &str, metadata: Attributes) -> &Node {
        self.insert_or_fetch_node(identifier, metadata).0
    }

    fn insert_or_fetch_node(&mut self, identifier: &str, metadata: Attributes) -> (&Node, bool) {
        let created = !self.nodes.contains_key(identifier);
        if created {
            let idx = self.adjacency.add_node(identifier.to_string());
            self.adjacency_lookup.insert(identifier.to_string(), idx);
            self.node_order.push(identifier.to_string());
        }
        let node = self
            .nodes
            .entry(identifier.to_string())
            .or_insert_with(|| Node::new(identifier, metadata));
        (node, created)
    }

    /// Create a port on an existing node, or return the existing port with
    /// the same derived identifier (discarding the new metadata).
    ///
    /// Fails with [`GraphError::NotFound`] if `node_id` does not name an
    /// existing node.
    pub fn create_port(
        &mut self,
        label: &str,
        node_id: &str,
        metadata: Attributes,
    ) -> Result<&Port, GraphError> {
        if !self.nodes.contains_key(node_id) {
            return Err(GraphError::NotFound(format!("node '{}'", node_id)));
        }
        Ok(self.insert_or_fetch_port(label, node_id, metadata).0)
    }

    fn insert_or_fetch_port(
        &mut self,
        label: &str,
        node_id: &str,
        metadata: Attributes,
    ) -> (&Port, bool) {
        let identifier = Port::calc_id(node_id, label);
        let created = !self.ports.contains_key(&identifier);
        if created {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.register_port_label(label);
            }
            self.port_order.push(identifier.clone());
        }
        let port = self
            .ports
            .entry(identifier)
            .or_insert_with(|| Port::new(label, node_id, metadata));
        (port, created)
    }

    /// Create a link between two existing (node, port) pairs, or return the
    /// existing link with the same canonical identifier (discarding the new
    /// metadata).
    ///
    /// Fails with [`GraphError::NotFound`] if either node or port does not
    /// exist, and with [`GraphError::Inconsistent`] if both endpoints name
    /// the same (node, port) pair.
    pub fn create_link(
        &mut self,
        node1: &str,
        port1: &str,
        node2: &str,
        port2: &str,
        metadata: Attributes,
    ) -> Result<&Link, GraphError> {
        for (node_id, label) in &[(node1, port1), (node2, port2)] {
            if !self.nodes.contains_key(*node_id) {
                return Err(GraphError::NotFound(format!("node '{}'", node_id)));
            }
            let port_id = Port::calc_id(node_id, label);
            if !self.ports.contains_key(&port_id) {
                return Err(GraphError::NotFound(format!("port '{}'", port_id)));
            }
        }
        if node1 == node2 && port1 == port2 {
            return Err(GraphError::Inconsistent(format!(
                "link endpoints must be distinct: '{}:{}' on both sides",
                node1, port1
            )));
        }
        Ok(self.insert_or_fetch_link(node1, port1, node2, port2, metadata).0)
    }

    fn insert_or_fetch_link(
        &mut self,
        node1: &str,
        port1: &str,
        node2: &str,
        port2: &str,
        metadata: Attributes,
    ) -> (&Link, bool) {
        let identifier = Link::calc_id(node1, port1, node2, port2);
        let created = !self.links.contains_key(&identifier);
        if created {
            self.link_order.push(identifier.clone());
            if let (Some(a), Some(b)) =
                (self.adjacency_lookup.get(node1), self.adjacency_lookup.get(node2))
            {
                self.adjacency.add_edge(*a, *b, identifier.clone());
            }
        }
        let link = self
            .links
            .entry(identifier)
            .or_insert_with(|| Link::new(node1, port1, node2, port2, metadata));
        (link, created)
    }

    /// Insert a pre-built node. Unlike [`TopologyGraph::create_node`], this
    /// fails with [`GraphError::AlreadyExists`] on identifier collision.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        let identifier = node.identifier().to_string();
        if self.nodes.contains_key(&identifier) {
            return Err(GraphError::AlreadyExists(format!("node '{}'", identifier)));
        }
        let idx = self.adjacency.add_node(identifier.clone());
        self.adjacency_lookup.insert(identifier.clone(), idx);
        self.node_order.push(identifier.clone());
        self.nodes.insert(identifier, node);
        Ok(())
    }

    /// Attach a pre-built port to the node named by `node_id`.
    ///
    /// Fails with [`GraphError::Inconsistent`] if the port claims a
    /// different owning node, [`GraphError::NotFound`] if the node does not
    /// exist, and [`GraphError::AlreadyExists`] on label collision.
    pub fn add_port(&mut self, node_id: &str, port: Port) -> Result<(), GraphError> {
        if port.node_id() != node_id {
            return Err(GraphError::Inconsistent(format!(
                "port '{}' claims node '{}' but is attached to node '{}'",
                port.label(),
                port.node_id(),
                node_id
            )));
        }
        let identifier = port.identifier();
        if self.ports.contains_key(&identifier) {
            return Err(GraphError::AlreadyExists(format!("port '{}'", identifier)));
        }
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NotFound(format!("node '{}'", node_id)))?;
        node.register_port_label(port.label());
        self.port_order.push(identifier.clone());
        self.ports.insert(identifier, port);
        Ok(())
    }

    /// Insert a pre-built link. Fails with [`GraphError::NotFound`] if
    /// either endpoint port is missing and [`GraphError::AlreadyExists`] if
    /// the canonical identifier is already present.
    pub fn add_link(&mut self, link: Link) -> Result<(), GraphError> {
        let ((node1, port1), (node2, port2)) = link.endpoints();
        for (node_id, label) in &[(node1, port1), (node2, port2)] {
            let port_id = Port::calc_id(node_id, label);
            if !self.ports.contains_key(&port_id) {
                return Err(GraphError::NotFound(format!("port '{}'", port_id)));
            }
        }
        let identifier = link.identifier();
        if self.links.contains_key(&identifier) {
            return Err(GraphError::AlreadyExists(format!("link '{}'", identifier)));
        }
        if let (Some(a), Some(b)) =
            (self.adjacency_lookup.get(node1), self.adjacency_lookup.get(node2))
        {
            self.adjacency.add_edge(*a, *b, identifier.clone());
        }
        self.link_order.push(identifier.clone());
        self.links.insert(identifier, link);
        Ok(())
    }

    /// Register `child_id` as a subnode of `parent_id`, wiring both the
    /// child's parent reference and the parent's subnode set.
    pub fn set_parent(&mut self, child_id: &str, parent_id: &str) -> Result<(), GraphError> {
        if !self.nodes.contains_key(parent_id) {
            return Err(GraphError::NotFound(format!("node '{}'", parent_id)));
        }
        let child = self
            .nodes
            .get_mut(child_id)
            .ok_or_else(|| GraphError::NotFound(format!("node '{}'", child_id)))?;
        child.set_parent(parent_id);
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.add_subnode(child_id);
        }
        Ok(())
    }

    /// Get a node by identifier.
    pub fn get_node(&self, identifier: &str) -> Result<&Node, GraphError> {
        self.nodes
            .get(identifier)
            .ok_or_else(|| GraphError::NotFound(format!("node '{}'", identifier)))
    }

    /// Get mutable access to a node by identifier, e.g. for metadata
    /// updates.
    pub fn get_node_mut(&mut self, identifier: &str) -> Result<&mut Node, GraphError> {
        self.nodes
            .get_mut(identifier)
            .ok_or_else(|| GraphError::NotFound(format!("node '{}'", identifier)))
    }

    /// Returns true if a node with the given identifier exists.
    pub fn has_node(&self, identifier: &str) -> bool {
        self.nodes.contains_key(identifier)
    }

    /// Get a port by derived identifier (`"node:label"`).
    pub fn get_port_by_id(&self, identifier: &str) -> Result<&Port, GraphError> {
        self.ports
            .get(identifier)
            .ok_or_else(|| GraphError::NotFound(format!("port '{}'", identifier)))
    }

    /// Returns true if a port with the given derived identifier exists.
    pub fn has_port_id(&self, identifier: &str) -> bool {
        self.ports.contains_key(identifier)
    }

    /// Get a port by owning node and label.
    ///
    /// Fails with [`GraphError::NotFound`] both when the node itself is
    /// missing and when the node exists but owns no such port; the error
    /// message distinguishes the two situations.
    pub fn get_port_by_label(&self, node_id: &str, label: &str) -> Result<&Port, GraphError> {
        if !self.nodes.contains_key(node_id) {
            return Err(GraphError::NotFound(format!("node '{}'", node_id)));
        }
        self.get_port_by_id(&Port::calc_id(node_id, label))
    }

    /// Returns true if the node exists and owns a port with the given
    /// label. Unlike the other `has_*` lookups this one fails with
    /// [`GraphError::NotFound`] when the node itself is missing.
    pub fn has_port_label(&self, node_id: &str, label: &str) -> Result<bool, GraphError> {
        if !self.nodes.contains_key(node_id) {
            return Err(GraphError::NotFound(format!("node '{}'", node_id)));
        }
        Ok(self.ports.contains_key(&Port::calc_id(node_id, label)))
    }

    /// Get a link by its two endpoints, in either order.
    pub fn get_link(
        &self,
        node1: &str,
        port1: &str,
        node2: &str,
        port2: &str,
    ) -> Result<&Link, GraphError> {
        self.get_link_by_id(&Link::calc_id(node1, port1, node2, port2))
    }

    /// Get a link by canonical identifier.
    pub fn get_link_by_id(&self, identifier: &str) -> Result<&Link, GraphError> {
        self.links
            .get(identifier)
            .ok_or_else(|| GraphError::NotFound(format!("link '{}'", identifier)))
    }

    /// Returns true if a link with the given endpoints exists, in either
    /// order.
    pub fn has_link(&self, node1: &str, port1: &str, node2: &str, port2: &str) -> bool {
        self.links.contains_key(&Link::calc_id(node1, port1, node2, port2))
    }

    /// Returns true if a link with the given canonical identifier exists.
    pub fn has_link_id(&self, identifier: &str) -> bool {
        self.links.contains_key(identifier)
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(move |id| self.nodes.get(id))
    }

    /// Iterate over all ports in a stable order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.port_order.iter().filter_map(move |id| self.ports.get(id))
    }

    /// Iterate over all links in a stable order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.link_order.iter().filter_map(move |id| self.links.get(id))
    }

    /// The free-form environment data of this topology.
    pub fn environment(&self) -> &Attributes {
        &self.environment
    }

    /// Mutable access to the environment data.
    pub fn environment_mut(&mut self) -> &mut Attributes {
        &mut self.environment
    }

    /// All nodes directly connected to `node_id` by at least one link.
    /// Parallel links do not produce duplicates.
    pub fn neighbors(&self, node_id: &str) -> Result<Vec<&Node>, GraphError> {
        let idx = self
            .adjacency_lookup
            .get(node_id)
            .ok_or_else(|| GraphError::NotFound(format!("node '{}'", node_id)))?;
        Ok(self
            .adjacency
            .neighbors(*idx)
            .map(|n| &self.adjacency[n])
            .unique()
            .filter_map(|id| self.nodes.get(id))
            .collect())
    }

    /// Validate the invariants of the graph. Fails at the first violation
    /// found; never repairs.
    ///
    /// Checked: every port belongs to an existing node which owns its
    /// label, port metadata carries the `label` entry, every link
    /// references two existing ports, index keys agree with derived
    /// identifiers, every declared subnode identifier exists as a
    /// top-level node, and the adjacency index agrees with the link table.
    pub fn check_consistency(&self) -> Result<(), GraphError> {
        for (identifier, port) in self.ports.iter() {
            if *identifier != port.identifier() {
                return Err(GraphError::Inconsistent(format!(
                    "port indexed as '{}' identifies as '{}'",
                    identifier,
                    port.identifier()
                )));
            }
            let node = self
                .nodes
                .get(port.node_id())
                .ok_or_else(|| GraphError::NotFound(format!("node '{}'", port.node_id())))?;
            if !node.owns_port_label(port.label()) {
                return Err(GraphError::Inconsistent(format!(
                    "node '{}' does not own port label '{}'",
                    node.identifier(),
                    port.label()
                )));
            }
            match port.metadata().get(LABEL_KEY).and_then(|v| v.as_str()) {
                Some(label) if label == port.label() => {}
                _ => {
                    return Err(GraphError::Inconsistent(format!(
                        "port '{}' metadata is missing its label entry",
                        identifier
                    )))
                }
            }
        }
        for (identifier, link) in self.links.iter() {
            if *identifier != link.identifier() {
                return Err(GraphError::Inconsistent(format!(
                    "link indexed as '{}' identifies as '{}'",
                    identifier,
                    link.identifier()
                )));
            }
            let ((node1, port1), (node2, port2)) = link.endpoints();
            for (node_id, label) in &[(node1, port1), (node2, port2)] {
                let port_id = Port::calc_id(node_id, label);
                if !self.ports.contains_key(&port_id) {
                    return Err(GraphError::NotFound(format!("port '{}'", port_id)));
                }
            }
        }
        // subnode closure is checked on identifiers, not object references
        for node in self.nodes.values() {
            for subnode in node.subnodes() {
                if !self.nodes.contains_key(subnode) {
                    return Err(GraphError::NotFound(format!(
                        "subnode '{}' of node '{}'",
                        subnode,
                        node.identifier()
                    )));
                }
            }
        }
        if self.adjacency.edge_count() != self.links.len() {
            return Err(GraphError::Inconsistent(format!(
                "adjacency index has {} edges for {} links",
                self.adjacency.edge_count(),
                self.links.len()
            )));
        }
        Ok(())
    }

    /// Serialize the graph into a nested json value with top-level keys
    /// `nodes`, `ports`, `links` and `environment`. Pure projection, no
    /// side effects.
    pub fn as_dict(&self) -> serde_json::Value {
        json!({
            "nodes": self.nodes().map(Node::as_dict).collect::<Vec<_>>(),
            "ports": self.ports().map(Port::as_dict).collect::<Vec<_>>(),
            "links": self.links().map(Link::as_dict).collect::<Vec<_>>(),
            "environment": self.environment,
        })
    }

    /// Iterate over all (node, port) pairs.
    #[deprecated(since = "0.1.0", note = "use ports() instead")]
    pub fn biports(&self) -> Vec<(&Node, &Port)> {
        warn!("biports() is deprecated, use ports() instead");
        self.ports()
            .filter_map(|port| self.nodes.get(port.node_id()).map(|node| (node, port)))
            .collect()
    }

    /// Iterate over all links as endpoint pairs plus the link itself.
    #[deprecated(since = "0.1.0", note = "use links() instead")]
    pub fn bilinks(&self) -> Vec<((&Node, &Port), (&Node, &Port), &Link)> {
        warn!("bilinks() is deprecated, use links() instead");
        self.links()
            .filter_map(|link| {
                let ((node1, port1), (node2, port2)) = link.endpoints();
                let first = self
                    .nodes
                    .get(node1)
                    .and_then(|n| self.ports.get(&Port::calc_id(node1, port1)).map(|p| (n, p)));
                let second = self
                    .nodes
                    .get(node2)
                    .and_then(|n| self.ports.get(&Port::calc_id(node2, port2)).map(|p| (n, p)));
                match (first, second) {
                    (Some(a), Some(b)) => Some((a, b, link)),
                    _ => None,
                }
            })
            .collect()
    }
}
