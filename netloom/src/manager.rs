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

//! # Topology manager
//!
//! The [`TopologyManager`] owns exactly one [`TopologyGraph`] and drives
//! it through a deterministic lifecycle against a resolved platform
//! engine: unresolved, resolved (engine instantiated), built (engine has
//! materialized all nodes, ports and links), and back after `unbuild`.
//! A manager supports a single build/unbuild cycle.
//!
//! Building walks the graph through five strictly ordered engine stages,
//! each completed before the next begins: `pre_build`, `add_node` (once
//! per node, in graph iteration order), `add_biport` (once per port),
//! `add_bilink` (once per link) and `post_build`. Hook failures propagate
//! unmodified; retry policy, if any, belongs to the harness layer above.
//!
//! When `verbose` is enabled, every phase transition and per-entity
//! operation emits an informational log line with a stable `[VERBOSE]`
//! prefix. This is an observability feature only and never alters control
//! flow.

use crate::attributes::{AttributeValue, Attributes};
use crate::autoport::PortAllocator;
use crate::error::Error;
use crate::graph::{TopologyGraph, PORT_NUMBER_KEY};
use crate::parser::{self, AttributeInjection, DictMeta};
use crate::platforms::{registry, EngineNode, Platform, PlatformContext};
use log::*;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

macro_rules! vlog {
    ($self:expr, $($arg:tt)*) => {
        if $self.verbose {
            info!("[VERBOSE] {}", format_args!($($arg)*));
        }
    };
}

/// Mapping from graph node identifiers to engine-side node handles.
pub type NodeMirror = HashMap<String, Box<dyn EngineNode>>;

/// Mapping from node identifier to (port label, engine port name) pairs.
pub type PortMirror = HashMap<String, HashMap<String, String>>;

/// Owns one topology graph and applies it to a platform engine.
#[derive(Debug)]
pub struct TopologyManager {
    engine: String,
    /// The owned topology graph. Replaceable by direct assignment before
    /// building.
    pub graph: TopologyGraph,
    platform: Option<Box<dyn Platform>>,
    nodes: NodeMirror,
    ports: PortMirror,
    options: Attributes,
    verbose: bool,
    built: bool,
}

impl TopologyManager {
    /// Create a manager for the given engine with default options and
    /// verbose logging disabled.
    ///
    /// The engine name is validated eagerly: an unregistered name fails
    /// here with [`Error::UnknownEngine`], never later in the lifecycle.
    pub fn new(engine: &str) -> Result<Self, Error> {
        Self::with_options(engine, Attributes::new(), false)
    }

    /// Create a manager with explicit engine options and verbosity.
    pub fn with_options(engine: &str, options: Attributes, verbose: bool) -> Result<Self, Error> {
        if !registry::is_registered(engine) {
            return Err(Error::UnknownEngine(engine.to_string()));
        }
        Ok(Self {
            engine: engine.to_string(),
            graph: TopologyGraph::new(),
            platform: None,
            nodes: NodeMirror::new(),
            ports: PortMirror::new(),
            options,
            verbose,
            built: false,
        })
    }

    /// Name of the selected platform engine.
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Free-form options passed through to the engine.
    pub fn options(&self) -> &Attributes {
        &self.options
    }

    /// Whether verbose lifecycle logging is enabled.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// The live engine instance, non-`None` only between `resolve()` and
    /// `unbuild()`.
    pub fn platform(&self) -> Option<&dyn Platform> {
        self.platform.as_deref()
    }

    /// Engine-side node handles, populated only while built.
    pub fn nodes(&self) -> &NodeMirror {
        &self.nodes
    }

    /// Engine-side port names per node, populated only while built.
    pub fn ports(&self) -> &PortMirror {
        &self.ports
    }

    /// Returns true if the topology is currently built. Pure query,
    /// available in every state.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Soft lookup of an engine-side node handle. Returns `None` when the
    /// identifier is absent (or the topology is not built); never fails.
    pub fn get(&self, node_id: &str) -> Option<&dyn EngineNode> {
        self.nodes.get(node_id).map(|n| n.as_ref())
    }

    /// Parse a textual topology description.
    ///
    /// The optional `inject` overlay merges per-identifier attributes over
    /// the parsed ones. When `load` is true the result immediately
    /// replaces the content of the owned graph. The dictmeta is returned
    /// either way, and the lifecycle state never changes.
    pub fn parse(
        &mut self,
        description: &str,
        inject: Option<&AttributeInjection>,
        load: bool,
    ) -> Result<DictMeta, Error> {
        let mut dictmeta = parser::parse(description)?;
        if let Some(inject) = inject {
            parser::apply_injection(&mut dictmeta, inject);
        }
        if load {
            self.load(&dictmeta)?;
        }
        Ok(dictmeta)
    }

    /// Replace the owned graph with the content of a parsed description.
    ///
    /// Nodes referenced only by port or link declarations are created
    /// implicitly. Physical port numbers are assigned in declaration
    /// order by the autoport allocator. An empty dictmeta yields an empty
    /// graph.
    pub fn load(&mut self, dictmeta: &DictMeta) -> Result<(), Error> {
        let mut graph = TopologyGraph::new();
        let mut allocator = PortAllocator::new();
        graph.environment_mut().extend(dictmeta.environment.clone());
        for group in &dictmeta.nodes {
            if let Some(parent) = &group.parent {
                graph.create_node(parent, Attributes::new());
            }
            for node_id in &group.nodes {
                graph.create_node(node_id, group.attributes.clone());
                if let Some(parent) = &group.parent {
                    graph.set_parent(node_id, parent)?;
                }
            }
        }
        for group in &dictmeta.ports {
            for (node_id, label) in &group.ports {
                graph.create_node(node_id, Attributes::new());
                if !graph.has_port_label(node_id, label)? {
                    create_numbered_port(
                        &mut graph,
                        &mut allocator,
                        node_id,
                        label,
                        group.attributes.clone(),
                    )?;
                }
            }
        }
        for link in &dictmeta.links {
            let ((node1, port1), (node2, port2)) = &link.endpoints;
            for (node_id, label) in &[(node1, port1), (node2, port2)] {
                graph.create_node(node_id, Attributes::new());
                if !graph.has_port_label(node_id, label)? {
                    create_numbered_port(
                        &mut graph,
                        &mut allocator,
                        node_id,
                        label,
                        Attributes::new(),
                    )?;
                }
            }
            graph.create_link(node1, port1, node2, port2, link.attributes.clone())?;
        }
        self.graph = graph;
        Ok(())
    }

    /// Instantiate the platform engine. Fails with [`Error::AlreadyBuilt`]
    /// once the topology is built.
    pub fn resolve(&mut self) -> Result<(), Error> {
        if self.built {
            return Err(Error::AlreadyBuilt);
        }
        vlog!(self, "Starting topology resolution phase");
        vlog!(self, "Loading platform engine: {}", self.engine);
        let timestamp = creation_timestamp();
        vlog!(self, "Creating platform instance with timestamp: {}", timestamp);
        let context = PlatformContext { options: self.options.clone(), timestamp };
        let platform = registry::instantiate(&self.engine, &context)
            .ok_or_else(|| Error::UnknownEngine(self.engine.clone()))?;
        self.platform = Some(platform);
        Ok(())
    }

    /// Apply the graph to the platform engine through the five ordered
    /// build stages. Resolves implicitly if needed. Fails with
    /// [`Error::AlreadyBuilt`] on a second build; hook failures abort the
    /// attempt and propagate unmodified.
    pub fn build(&mut self) -> Result<(), Error> {
        if self.built {
            return Err(Error::AlreadyBuilt);
        }
        if self.platform.is_none() {
            self.resolve()?;
        }
        vlog!(self, "Starting topology build phase");
        let platform = match self.platform.as_mut() {
            Some(platform) => platform,
            None => return Err(Error::UnknownEngine(self.engine.clone())),
        };

        vlog!(self, "Build stage: pre_build");
        platform.pre_build()?;

        vlog!(self, "Build stage: add_node");
        for node in self.graph.nodes() {
            vlog!(self, "Adding node: {}", node.identifier());
            let handle = platform.add_node(node)?;
            self.nodes.insert(node.identifier().to_string(), handle);
        }

        vlog!(self, "Build stage: add_biport");
        for node in self.graph.nodes() {
            for label in node.port_labels() {
                let port = self.graph.get_port_by_label(node.identifier(), label)?;
                vlog!(self, "Adding port {} to node {}", label, node.identifier());
                let engine_port = platform.add_biport(node, port)?;
                self.ports
                    .entry(node.identifier().to_string())
                    .or_default()
                    .insert(label.to_string(), engine_port);
            }
        }

        vlog!(self, "Build stage: add_bilink");
        for link in self.graph.links() {
            vlog!(
                self,
                "Adding link: {}:{} <-> {}:{}",
                link.node1(),
                link.port1(),
                link.node2(),
                link.port2()
            );
            platform.add_bilink(link)?;
        }

        vlog!(self, "Build stage: post_build");
        platform.post_build()?;

        self.built = true;
        vlog!(self, "Topology build phase completed successfully");
        Ok(())
    }

    /// Tear the built topology down, reversing registration order: drop
    /// the engine mirrors, call the engine destroy hook, discard the
    /// platform instance. Fails with [`Error::NeverBuilt`] when the
    /// topology is not built, including on a second call after one cycle.
    pub fn unbuild(&mut self) -> Result<(), Error> {
        if !self.built {
            return Err(Error::NeverBuilt);
        }
        vlog!(self, "Starting topology unbuild phase");
        vlog!(self, "Removing references to engine nodes");
        self.nodes.clear();
        self.ports.clear();
        vlog!(self, "Calling platform destroy hook");
        if let Some(platform) = self.platform.as_mut() {
            platform.destroy()?;
        }
        vlog!(self, "Deleting platform instance");
        self.platform = None;
        self.built = false;
        vlog!(self, "Topology unbuild phase completed");
        Ok(())
    }

    /// Re-establish a link on the engine, keyed by canonical link id.
    #[deprecated(since = "0.1.0", note = "link state belongs to the engine node API")]
    pub fn set_link(&mut self, link_id: &str) -> Result<(), Error> {
        warn!("set_link() is deprecated");
        if !self.built {
            return Err(Error::NeverBuilt);
        }
        match self.platform.as_mut() {
            Some(platform) => Ok(platform.relink(link_id)?),
            None => Err(Error::NeverBuilt),
        }
    }

    /// Disconnect a link on the engine, keyed by canonical link id.
    #[deprecated(since = "0.1.0", note = "link state belongs to the engine node API")]
    pub fn unset_link(&mut self, link_id: &str) -> Result<(), Error> {
        warn!("unset_link() is deprecated");
        if !self.built {
            return Err(Error::NeverBuilt);
        }
        match self.platform.as_mut() {
            Some(platform) => Ok(platform.unlink(link_id)?),
            None => Err(Error::NeverBuilt),
        }
    }

    /// Alias for the owned graph.
    #[deprecated(since = "0.1.0", note = "access the graph field directly")]
    pub fn nml(&self) -> &TopologyGraph {
        warn!("nml() is deprecated, access the graph directly");
        &self.graph
    }
}

fn create_numbered_port(
    graph: &mut TopologyGraph,
    allocator: &mut PortAllocator,
    node_id: &str,
    label: &str,
    mut metadata: Attributes,
) -> Result<(), Error> {
    let explicit = metadata
        .get(PORT_NUMBER_KEY)
        .and_then(AttributeValue::as_int)
        .and_then(|i| if i >= 0 { Some(i as u64) } else { None });
    let number = allocator.allocate(node_id, label, explicit)?;
    metadata.insert(PORT_NUMBER_KEY.to_string(), AttributeValue::from(number));
    graph.create_port(label, node_id, metadata)?;
    Ok(())
}

fn creation_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| String::from("0"))
}
