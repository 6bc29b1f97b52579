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

//! Undirected connection entity.

use super::port::Port;
use crate::attributes::Attributes;
use serde_json::json;

/// Separator joining the two endpoint identifiers in a canonical link id.
pub const LINK_ID_SEPARATOR: &str = " -- ";

/// An undirected connection between two distinct (node, port) pairs.
///
/// Endpoints are stored as identifiers; the graph owns the referenced
/// entities and resolves them on demand. The identifier of a link is
/// order-independent: `calc_id(a, pa, b, pb) == calc_id(b, pb, a, pa)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    node1: String,
    port1: String,
    node2: String,
    port2: String,
    metadata: Attributes,
}

impl Link {
    /// Create a new link between two (node, port label) endpoint pairs.
    pub fn new(
        node1: impl Into<String>,
        port1: impl Into<String>,
        node2: impl Into<String>,
        port2: impl Into<String>,
        metadata: Attributes,
    ) -> Self {
        Self {
            node1: node1.into(),
            port1: port1.into(),
            node2: node2.into(),
            port2: port2.into(),
            metadata,
        }
    }

    /// Compute the canonical identifier of a link.
    ///
    /// The two composite endpoint identifiers (`"<node>:<port>"`) are sorted
    /// lexicographically and joined with [`LINK_ID_SEPARATOR`], so the
    /// result does not depend on endpoint order.
    pub fn calc_id(node1: &str, port1: &str, node2: &str, port2: &str) -> String {
        let a = Port::calc_id(node1, port1);
        let b = Port::calc_id(node2, port2);
        if a <= b {
            format!("{}{}{}", a, LINK_ID_SEPARATOR, b)
        } else {
            format!("{}{}{}", b, LINK_ID_SEPARATOR, a)
        }
    }

    /// The canonical identifier of this link.
    pub fn identifier(&self) -> String {
        Self::calc_id(&self.node1, &self.port1, &self.node2, &self.port2)
    }

    /// Identifier of the first endpoint node, in declaration order.
    pub fn node1(&self) -> &str {
        &self.node1
    }

    /// Label of the first endpoint port.
    pub fn port1(&self) -> &str {
        &self.port1
    }

    /// Identifier of the second endpoint node, in declaration order.
    pub fn node2(&self) -> &str {
        &self.node2
    }

    /// Label of the second endpoint port.
    pub fn port2(&self) -> &str {
        &self.port2
    }

    /// Both endpoints as (node id, port label) pairs, in declaration order.
    pub fn endpoints(&self) -> ((&str, &str), (&str, &str)) {
        ((&self.node1, &self.port1), (&self.node2, &self.port2))
    }

    /// Free-form metadata of this link.
    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    /// Mutable access to the metadata of this link.
    pub fn metadata_mut(&mut self) -> &mut Attributes {
        &mut self.metadata
    }

    /// Serialize this link into a nested json value.
    pub fn as_dict(&self) -> serde_json::Value {
        json!({
            "identifier": self.identifier(),
            "endpoints": [[self.node1, self.port1], [self.node2, self.port2]],
            "metadata": self.metadata,
        })
    }
}
