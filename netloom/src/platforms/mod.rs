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

//! # Platform engines
//!
//! A platform engine materializes a topology graph into real or emulated
//! network resources. Engines implement the [`Platform`] trait and are
//! selected by name through the [`registry`]. The built-in
//! [`DebugPlatform`] is a no-op stub that accepts any graph, fabricates
//! placeholder handles and records every hook invocation; it is the
//! reference implementation for exercising the manager lifecycle in
//! isolation.

pub mod debug;
pub mod registry;

pub use debug::{DebugNode, DebugPlatform, DEBUG_PLATFORM};

use crate::attributes::Attributes;
use crate::graph::{Link, Node, Port};
use std::fmt;
use thiserror::Error;

/// Errors raised by platform engine hooks. The manager never catches and
/// reinterprets these; they propagate to the caller verbatim.
#[derive(Debug, Error, PartialEq)]
pub enum PlatformError {
    /// A lifecycle hook failed fatally
    #[error("Platform hook '{hook}' failed: {message}")]
    HookFailed {
        /// Name of the failing hook
        hook: &'static str,
        /// Engine-provided failure message
        message: String,
    },
    /// A link id passed to `relink`/`unlink` is unknown to the engine
    #[error("Link is unknown to the platform: {0}")]
    UnknownLink(String),
}

/// Context handed to a platform factory when the manager resolves.
#[derive(Debug, Clone, Default)]
pub struct PlatformContext {
    /// Free-form engine options, passed through without interpretation
    pub options: Attributes,
    /// Creation timestamp of the platform instance
    pub timestamp: String,
}

/// Engine-side handle for a materialized node.
pub trait EngineNode: fmt::Debug {
    /// Identifier of the graph node this handle mirrors.
    fn identifier(&self) -> &str;

    /// Metadata the engine recorded for this node.
    fn metadata(&self) -> &Attributes;
}

/// The platform engine contract.
///
/// The manager drives a build through the staged hooks in fixed order:
/// `pre_build`, then `add_node` once per node, `add_biport` once per port,
/// `add_bilink` once per link, and finally `post_build`. Teardown invokes
/// `destroy`. The two link-mutation hooks `relink`/`unlink` operate on
/// canonical link identifiers of an already built topology.
pub trait Platform: fmt::Debug {
    /// Hook called before any graph data is applied.
    fn pre_build(&mut self) -> Result<(), PlatformError>;

    /// Materialize one node; the returned handle is recorded in the
    /// manager's node mirror.
    fn add_node(&mut self, node: &Node) -> Result<Box<dyn EngineNode>, PlatformError>;

    /// Materialize one port; the returned engine-side port name is
    /// recorded in the manager's port mirror.
    fn add_biport(&mut self, node: &Node, port: &Port) -> Result<String, PlatformError>;

    /// Materialize one link.
    fn add_bilink(&mut self, link: &Link) -> Result<(), PlatformError>;

    /// Hook called after all graph data has been applied.
    fn post_build(&mut self) -> Result<(), PlatformError>;

    /// Release every resource held by the platform instance.
    fn destroy(&mut self) -> Result<(), PlatformError>;

    /// Re-establish a previously disconnected link.
    fn relink(&mut self, link_id: &str) -> Result<(), PlatformError>;

    /// Disconnect a link without removing it from the topology.
    fn unlink(&mut self, link_id: &str) -> Result<(), PlatformError>;
}
