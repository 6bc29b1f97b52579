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

//! Automatic assignment of physical port numbers to symbolic port labels.
//!
//! A description may reference ports by symbolic labels (`hs1:oobm`)
//! without explicit numbering. Each node maintains an independent counter
//! seeded at 1; the first time a symbolic label is seen for a node it is
//! assigned the next free numeric position as its physical identity, while
//! the label itself remains the externally visible key. Explicit numeric
//! labels and explicit `port_number` attributes are consumed as-is and
//! never reassigned; the counter always advances past consumed numbers.
//! Allocation is single-pass, in declaration order.

use crate::graph::GraphError;
use std::collections::{HashMap, HashSet};

/// Per-node physical port number allocator.
///
/// The allocator is consumed by the manager while loading a parsed
/// description; it holds no reference to the graph itself.
#[derive(Debug, Default)]
pub struct PortAllocator {
    counters: HashMap<String, u64>,
    consumed: HashMap<String, HashSet<u64>>,
}

impl PortAllocator {
    /// Create a fresh allocator with all counters seeded at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the physical port number for a (node, label) pair.
    ///
    /// `explicit` is an explicitly requested number (a `port_number`
    /// attribute); when absent, a numeric label is its own number.
    /// Symbolic labels receive the next free number for the node. Fails
    /// with [`GraphError::AlreadyExists`] when an explicitly requested
    /// number was already consumed on the same node.
    pub fn allocate(
        &mut self,
        node_id: &str,
        label: &str,
        explicit: Option<u64>,
    ) -> Result<u64, GraphError> {
        let consumed = self.consumed.entry(node_id.to_string()).or_default();
        if let Some(number) = explicit.or_else(|| label.parse().ok()) {
            if !consumed.insert(number) {
                return Err(GraphError::AlreadyExists(format!(
                    "port number {} on node '{}'",
                    number, node_id
                )));
            }
            return Ok(number);
        }
        let counter = self.counters.entry(node_id.to_string()).or_insert(1);
        while consumed.contains(counter) {
            *counter += 1;
        }
        let number = *counter;
        consumed.insert(number);
        *counter += 1;
        Ok(number)
    }
}
