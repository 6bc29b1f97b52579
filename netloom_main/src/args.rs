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

//! Validation and coercion of command line arguments beyond what the
//! argument parser itself covers: engine option lists and the topology
//! file path.

use lazy_static::lazy_static;
use netloom::attributes::{AttributeValue, Attributes};
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A command line argument is invalid
#[derive(Debug, Error, PartialEq)]
pub enum InvalidArgument {
    /// An `--option` entry is not of the form `key=value`
    #[error("Invalid option '{0}': expected key=value")]
    MalformedOption(String),
    /// An `--option` key is not a valid identifier
    #[error("Invalid option key '{0}'")]
    InvalidKey(String),
    /// The topology file does not exist
    #[error("Topology file does not exist: {0}")]
    MissingFile(PathBuf),
}

lazy_static! {
    static ref OPTION_KEY_RE: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("hardcoded regex");
}

/// Parse repeated `key=value` engine options into an attribute map.
///
/// Keys must start with a letter or underscore; dashes are normalized to
/// underscores. Values are coerced like description attributes (booleans,
/// integers, floats, strings). A key given twice keeps the later value.
pub fn parse_options(raw_options: &[String]) -> Result<Attributes, InvalidArgument> {
    let mut options = Attributes::new();
    for raw in raw_options {
        let mut split = raw.splitn(2, '=');
        let (key, value) = match (split.next(), split.next()) {
            (Some(key), Some(value)) if !value.is_empty() => (key, value),
            _ => return Err(InvalidArgument::MalformedOption(raw.clone())),
        };
        if !OPTION_KEY_RE.is_match(key) {
            return Err(InvalidArgument::InvalidKey(key.to_string()));
        }
        options.insert(key.replace('-', "_"), AttributeValue::parse(value));
    }
    Ok(options)
}

/// Check that the topology description file exists.
pub fn validate_topology_file(path: &Path) -> Result<(), InvalidArgument> {
    if !path.is_file() {
        return Err(InvalidArgument::MissingFile(path.to_path_buf()));
    }
    Ok(())
}
