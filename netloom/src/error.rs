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

//! Module containing all error types

use crate::graph::GraphError;
use crate::parser::ParseError;
use crate::platforms::PlatformError;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error propagated from the topology graph
    #[error("Graph Error: {0}")]
    GraphError(#[from] GraphError),
    /// Error propagated from the description parser
    #[error("Parse Error: {0}")]
    ParseError(#[from] ParseError),
    /// Error propagated from a platform engine hook
    #[error("Platform Error: {0}")]
    PlatformError(#[from] PlatformError),
    /// The requested engine name is not present in the platform registry.
    /// Raised at manager construction time, never later.
    #[error("unknown platform engine: {0}")]
    UnknownEngine(String),
    /// A second build was requested on the same manager
    #[error("Cannot build a topology twice")]
    AlreadyBuilt,
    /// A lifecycle operation requiring a built topology was called on a
    /// manager that is not built
    #[error("Never built topology")]
    NeverBuilt,
}
