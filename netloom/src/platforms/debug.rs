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

//! Built-in no-op engine used to exercise the manager lifecycle.

use super::{EngineNode, Platform, PlatformContext, PlatformError};
use crate::attributes::{AttributeValue, Attributes};
use crate::graph::{Link, Node, Port};
use log::*;

/// Name under which the debug engine is registered.
pub const DEBUG_PLATFORM: &str = "debug";

/// Option key selecting a hook that the debug engine will fail on, for
/// exercising error propagation.
pub const FAIL_STAGE_OPTION: &str = "fail_stage";

/// Engine-side handle fabricated by the debug engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugNode {
    identifier: String,
    metadata: Attributes,
}

impl EngineNode for DebugNode {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn metadata(&self) -> &Attributes {
        &self.metadata
    }
}

/// A trivial platform that accepts any graph, fabricates placeholder
/// handles and records every hook invocation without side effects.
#[derive(Debug)]
pub struct DebugPlatform {
    /// Marker value identifying a live debug platform instance.
    pub debug_value: &'static str,
    timestamp: String,
    options: Attributes,
    calls: Vec<String>,
    fail_stage: Option<String>,
}

impl DebugPlatform {
    /// Create a new debug platform from the resolution context.
    pub fn new(context: &PlatformContext) -> Self {
        let fail_stage = context
            .options
            .get(FAIL_STAGE_OPTION)
            .and_then(AttributeValue::as_str)
            .map(|s| s.to_string());
        Self {
            debug_value: "fordebug",
            timestamp: context.timestamp.clone(),
            options: context.options.clone(),
            calls: Vec::new(),
            fail_stage,
        }
    }

    /// Timestamp recorded at instantiation.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Options the platform was instantiated with.
    pub fn options(&self) -> &Attributes {
        &self.options
    }

    /// Record of all hook invocations, in call order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    fn hook(&mut self, name: &'static str, detail: &str) -> Result<(), PlatformError> {
        if detail.is_empty() {
            self.calls.push(name.to_string());
        } else {
            self.calls.push(format!("{} {}", name, detail));
        }
        debug!("debug platform: {} {}", name, detail);
        if self.fail_stage.as_deref() == Some(name) {
            return Err(PlatformError::HookFailed {
                hook: name,
                message: format!("failing on request ({}={})", FAIL_STAGE_OPTION, name),
            });
        }
        Ok(())
    }
}

impl Platform for DebugPlatform {
    fn pre_build(&mut self) -> Result<(), PlatformError> {
        self.hook("pre_build", "")
    }

    fn add_node(&mut self, node: &Node) -> Result<Box<dyn EngineNode>, PlatformError> {
        self.hook("add_node", node.identifier())?;
        Ok(Box::new(DebugNode {
            identifier: node.identifier().to_string(),
            metadata: node.metadata().clone(),
        }))
    }

    fn add_biport(&mut self, node: &Node, port: &Port) -> Result<String, PlatformError> {
        self.hook("add_biport", &Port::calc_id(node.identifier(), port.label()))?;
        // the debug engine names ports after their logical label
        Ok(port.label().to_string())
    }

    fn add_bilink(&mut self, link: &Link) -> Result<(), PlatformError> {
        self.hook("add_bilink", &link.identifier())
    }

    fn post_build(&mut self) -> Result<(), PlatformError> {
        self.hook("post_build", "")
    }

    fn destroy(&mut self) -> Result<(), PlatformError> {
        self.hook("destroy", "")
    }

    fn relink(&mut self, link_id: &str) -> Result<(), PlatformError> {
        self.hook("relink", link_id)
    }

    fn unlink(&mut self, link_id: &str) -> Result<(), PlatformError> {
        self.hook("unlink", link_id)
    }
}
