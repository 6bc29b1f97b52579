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

//! Topology device entity.

use crate::attributes::Attributes;
use serde_json::json;
use std::collections::HashSet;

/// A topology device (switch, host, ...).
///
/// A node is identified by a string unique within its
/// [`TopologyGraph`](super::TopologyGraph) and carries free-form metadata
/// (`type`, `name`, ...). Parent/subnode relations are stored as
/// identifiers, not object references; the graph resolves them on demand,
/// and [`check_consistency`](super::TopologyGraph::check_consistency)
/// validates that every declared subnode identifier exists as a top-level
/// node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    identifier: String,
    metadata: Attributes,
    parent: Option<String>,
    subnodes: HashSet<String>,
    port_labels: Vec<String>,
}

impl Node {
    /// Create a new node with the given identifier and metadata.
    pub fn new(identifier: impl Into<String>, metadata: Attributes) -> Self {
        Self {
            identifier: identifier.into(),
            metadata,
            parent: None,
            subnodes: HashSet::new(),
            port_labels: Vec::new(),
        }
    }

    /// The identifier of this node, unique within its graph.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Free-form metadata of this node.
    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    /// Mutable access to the metadata of this node.
    pub fn metadata_mut(&mut self) -> &mut Attributes {
        &mut self.metadata
    }

    /// Identifier of the enclosing node, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Set the identifier of the enclosing node.
    pub fn set_parent(&mut self, parent: impl Into<String>) {
        self.parent = Some(parent.into());
    }

    /// Iterate over the identifiers of all declared subnodes.
    pub fn subnodes(&self) -> impl Iterator<Item = &str> {
        self.subnodes.iter().map(|s| s.as_str())
    }

    /// Declare a subnode by identifier. The identifier must exist as a
    /// top-level node in the owning graph; this is checked by the graph's
    /// consistency pass, not here.
    pub fn add_subnode(&mut self, identifier: impl Into<String>) {
        self.subnodes.insert(identifier.into());
    }

    /// Iterate over the labels of all ports owned by this node, in the
    /// order in which the ports were created.
    pub fn port_labels(&self) -> impl Iterator<Item = &str> {
        self.port_labels.iter().map(|s| s.as_str())
    }

    /// Returns true if this node owns a port with the given label.
    pub fn owns_port_label(&self, label: &str) -> bool {
        self.port_labels.iter().any(|l| l == label)
    }

    pub(super) fn register_port_label(&mut self, label: &str) {
        self.port_labels.push(label.to_string());
    }

    /// Serialize this node into a nested json value.
    pub fn as_dict(&self) -> serde_json::Value {
        json!({
            "identifier": self.identifier,
            "metadata": self.metadata,
            "parent": self.parent,
            "subnodes": self.subnodes,
            "ports": self.port_labels,
        })
    }
}
