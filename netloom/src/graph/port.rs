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

//! Connection point entity.

use crate::attributes::{AttributeValue, Attributes};
use serde_json::json;

/// Metadata key under which a port stores its own label.
pub const LABEL_KEY: &str = "label";

/// Metadata key under which a port stores its physical port number.
pub const PORT_NUMBER_KEY: &str = "port_number";

/// A named connection point on exactly one [`Node`](super::Node).
///
/// The identifier of a port is derived from its owning node and its label
/// (see [`Port::calc_id`]); it is never stored separately. A port is
/// immutable once created, apart from metadata updates. The metadata always
/// contains a `label` entry equal to the port's label.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    label: String,
    node_id: String,
    metadata: Attributes,
}

impl Port {
    /// Create a new port on the given node. A `label` entry is injected
    /// into the metadata.
    pub fn new(
        label: impl Into<String>,
        node_id: impl Into<String>,
        mut metadata: Attributes,
    ) -> Self {
        let label = label.into();
        metadata.insert(LABEL_KEY.to_string(), AttributeValue::from(label.as_str()));
        Self { label, node_id: node_id.into(), metadata }
    }

    /// Compute the derived identifier of a port: `"<node_id>:<label>"`.
    pub fn calc_id(node_id: &str, label: &str) -> String {
        format!("{}:{}", node_id, label)
    }

    /// The derived identifier of this port.
    pub fn identifier(&self) -> String {
        Self::calc_id(&self.node_id, &self.label)
    }

    /// The label of this port, unique per node.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The identifier of the owning node.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Free-form metadata of this port.
    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    /// Mutable access to the metadata of this port.
    pub fn metadata_mut(&mut self) -> &mut Attributes {
        &mut self.metadata
    }

    /// The physical port number assigned to this port, if any.
    pub fn port_number(&self) -> Option<u64> {
        match self.metadata.get(PORT_NUMBER_KEY) {
            Some(AttributeValue::Int(i)) if *i >= 0 => Some(*i as u64),
            _ => None,
        }
    }

    /// Record the physical port number in the metadata.
    pub fn set_port_number(&mut self, number: u64) {
        self.metadata.insert(PORT_NUMBER_KEY.to_string(), AttributeValue::from(number));
    }

    /// Serialize this port into a nested json value.
    pub fn as_dict(&self) -> serde_json::Value {
        json!({
            "identifier": self.identifier(),
            "label": self.label,
            "node_id": self.node_id,
            "metadata": self.metadata,
        })
    }
}
