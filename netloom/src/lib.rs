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

#![deny(missing_docs)]

//! # Netloom: Declarative Network Topology Orchestration
//!
//! This is a library for describing virtual network topologies (switches,
//! hosts, ports, links) in a small declarative language, instantiating
//! them against a pluggable platform engine, and tearing them down again,
//! so that test suites can get a repeatable topology per test.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`graph`]**: The in-memory topology model. See the main structure
//!   [`TopologyGraph`](graph::TopologyGraph), which owns all
//!   [`Node`](graph::Node), [`Port`](graph::Port) and
//!   [`Link`](graph::Link) entities and enforces their identity and
//!   consistency rules.
//!
//! - **[`manager`]**: The [`TopologyManager`](manager::TopologyManager),
//!   which owns one graph and drives it through the
//!   parse → resolve → build → unbuild lifecycle against a platform
//!   engine.
//!
//! - **[`platforms`]**: The engine contract
//!   ([`Platform`](platforms::Platform)), the name-to-factory
//!   [`registry`](platforms::registry), and the built-in
//!   [`DebugPlatform`](platforms::DebugPlatform) stub.
//!
//! - **[`parser`]**: The topology description parser, producing the
//!   [`DictMeta`](parser::DictMeta) intermediate representation consumed
//!   by the manager.
//!
//! - **[`autoport`]**: Automatic assignment of physical port numbers to
//!   symbolic port labels.
//!
//! - **[`attributes`]**: Typed free-form metadata shared by all of the
//!   above.
//!
//! ## Usage
//!
//! Describe a topology, build it against the `debug` engine, and inspect
//! the engine-side handles:
//!
//! ```
//! use netloom::manager::TopologyManager;
//! use netloom::Error;
//!
//! fn main() -> Result<(), Error> {
//!     let mut topology = TopologyManager::new("debug")?;
//!     topology.parse(
//!         r#"
//!         [type=switch name="Switch 1"] sw1
//!         [type=host name="Host 1"] hs1
//!         sw1:1 -- hs1:1
//!         "#,
//!         None,
//!         true,
//!     )?;
//!     topology.build()?;
//!
//!     assert!(topology.get("sw1").is_some());
//!     assert!(topology.get("hs1").is_some());
//!     assert!(topology.get("nonexistent").is_none());
//!
//!     topology.unbuild()?;
//!     Ok(())
//! }
//! ```

// test modules
mod test;

pub mod attributes;
pub mod autoport;
mod error;
pub mod graph;
pub mod manager;
pub mod parser;
pub mod platforms;

pub use error::Error;
pub use graph::{Link, Node, Port, TopologyGraph};
pub use manager::TopologyManager;
