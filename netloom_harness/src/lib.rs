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

//! # Test-runner integration
//!
//! This crate wraps the topology lifecycle around individual tests: a
//! [`TopologySession`] hands every test a built
//! [`TopologyManager`](netloom::TopologyManager) and tears it down
//! afterwards. Consecutive tests sharing an identical description can
//! reuse the previously built topology (keyed by a content hash of the
//! description), and failed builds are retried up to a configurable
//! budget before the failure surfaces to the test.
//!
//! All session state is explicit: configuration enters through
//! [`SessionConfig`], and the session object owns the one built topology.
//! The reuse optimization assumes strictly sequential test execution.


use log::*;
use netloom::attributes::{AttributeValue, Attributes};
use netloom::manager::TopologyManager;
use netloom::parser::AttributeInjection;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Harness error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error propagated from the topology core
    #[error("Topology Error: {0}")]
    TopologyError(#[from] netloom::Error),
    /// IO Error while reading description or injection files
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// Cannot deserialize an injection file
    #[error("Cannot parse JSON injection file: {0}")]
    JsonError(#[from] serde_json::Error),
    /// An injection file entry is not a mapping of scalar attributes
    #[error("Invalid injection entry for '{0}'")]
    InvalidInjection(String),
    /// No description file with the requested name exists in the
    /// configured source directories
    #[error("No description named '{0}' found in the configured directories")]
    DescriptionNotFound(String),
}

/// Session-wide configuration for the topology harness.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the platform engine to build against
    pub platform: String,
    /// Per-identifier attribute overlay applied to every parsed
    /// description
    pub injected_attr: Option<AttributeInjection>,
    /// Directory the engine should write its logs to, passed through as
    /// the `log_dir` option
    pub log_dir: Option<PathBuf>,
    /// Directories searched for `.szn` description files
    pub szn_dir: Vec<PathBuf>,
    /// Free-form engine options
    pub platform_options: Attributes,
    /// Number of whole-build retries on build failure
    pub build_retries: usize,
    /// Reuse the built topology across consecutive tests with an
    /// identical description
    pub group_by_topology: bool,
    /// Enable verbose lifecycle logging on every manager
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            platform: String::from("debug"),
            injected_attr: None,
            log_dir: None,
            szn_dir: Vec::new(),
            platform_options: Attributes::new(),
            build_retries: 0,
            group_by_topology: false,
            verbose: false,
        }
    }
}

#[derive(Debug)]
struct BuiltTopology {
    hash: u64,
    manager: TopologyManager,
}

/// Per-session owner of the one built topology.
///
/// Call [`TopologySession::setup`] before each test body and
/// [`TopologySession::teardown`] after it; call
/// [`TopologySession::finish`] once after the last test.
#[derive(Debug)]
pub struct TopologySession {
    config: SessionConfig,
    active: Option<BuiltTopology>,
}

impl TopologySession {
    /// Create a session from its configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self { config, active: None }
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The currently built topology, if any.
    pub fn current(&mut self) -> Option<&mut TopologyManager> {
        self.active.as_mut().map(|active| &mut active.manager)
    }

    /// Provide a built topology for the given description.
    ///
    /// When grouping is enabled and the description hash matches the
    /// currently built topology, that topology is reused without a
    /// rebuild. Otherwise any previous topology is destroyed and a fresh
    /// manager is parsed and built, retrying whole build attempts up to
    /// the configured budget.
    pub fn setup(&mut self, description: &str) -> Result<&mut TopologyManager, Error> {
        let hash = description_hash(description);
        let reusable = self.config.group_by_topology
            && self
                .active
                .as_ref()
                .map(|active| active.hash == hash && active.manager.is_built())
                .unwrap_or(false);
        if reusable {
            debug!("reusing built topology for identical description");
        } else {
            self.finish()?;
            let manager = self.build_with_retries(description)?;
            self.active = Some(BuiltTopology { hash, manager });
        }
        match self.active.as_mut() {
            Some(active) => Ok(&mut active.manager),
            None => Err(Error::TopologyError(netloom::Error::NeverBuilt)),
        }
    }

    /// Resolve a description by name from the configured source
    /// directories and provide a built topology for it.
    pub fn setup_from_file(&mut self, name: &str) -> Result<&mut TopologyManager, Error> {
        let description = self.description_from_file(name)?;
        self.setup(&description)
    }

    /// Hook to run after each test. Destroys the topology unless grouping
    /// keeps it alive for a potential identical successor.
    pub fn teardown(&mut self) -> Result<(), Error> {
        if self.config.group_by_topology {
            return Ok(());
        }
        self.finish()
    }

    /// Destroy the held topology, if any. Safe to call repeatedly; run
    /// once after the last test of the session.
    pub fn finish(&mut self) -> Result<(), Error> {
        if let Some(mut active) = self.active.take() {
            if active.manager.is_built() {
                active.manager.unbuild()?;
            }
        }
        Ok(())
    }

    /// Find `<name>.szn` in the configured source directories and return
    /// its content.
    pub fn description_from_file(&self, name: &str) -> Result<String, Error> {
        for dir in &self.config.szn_dir {
            let path = dir.join(format!("{}.szn", name));
            if path.is_file() {
                return Ok(fs::read_to_string(path)?);
            }
        }
        Err(Error::DescriptionNotFound(name.to_string()))
    }

    fn build_with_retries(&self, description: &str) -> Result<TopologyManager, Error> {
        let mut attempt = 0;
        loop {
            let mut manager = TopologyManager::with_options(
                &self.config.platform,
                self.manager_options(),
                self.config.verbose,
            )?;
            manager.parse(description, self.config.injected_attr.as_ref(), true)?;
            match manager.build() {
                Ok(()) => return Ok(manager),
                Err(e) if attempt < self.config.build_retries => {
                    attempt += 1;
                    warn!("topology build attempt {} failed, retrying: {}", attempt, e);
                }
                Err(e) => return Err(Error::TopologyError(e)),
            }
        }
    }

    fn manager_options(&self) -> Attributes {
        let mut options = self.config.platform_options.clone();
        if let Some(log_dir) = &self.config.log_dir {
            options.insert(
                String::from("log_dir"),
                AttributeValue::from(log_dir.display().to_string()),
            );
        }
        options
    }
}

/// Load a per-identifier attribute overlay from a JSON file of the form
/// `{"hs1": {"image": "custom"}, "hs1:1": {"speed": 1000}}`.
pub fn load_injection(path: &Path) -> Result<AttributeInjection, Error> {
    let raw = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let entries = value
        .as_object()
        .ok_or_else(|| Error::InvalidInjection(path.display().to_string()))?;
    let mut injection = AttributeInjection::new();
    for (identifier, attributes) in entries {
        let map = attributes
            .as_object()
            .ok_or_else(|| Error::InvalidInjection(identifier.clone()))?;
        let mut converted: Attributes = HashMap::new();
        for (key, json_value) in map {
            let attribute = AttributeValue::from_json(json_value)
                .ok_or_else(|| Error::InvalidInjection(identifier.clone()))?;
            converted.insert(key.clone(), attribute);
        }
        injection.insert(identifier.clone(), converted);
    }
    Ok(injection)
}

fn description_hash(description: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    description.hash(&mut hasher);
    hasher.finish()
}
