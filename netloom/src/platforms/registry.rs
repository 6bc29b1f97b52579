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

//! Explicit name-to-factory registry for platform engines.
//!
//! Engine names are validated against this registry eagerly, at manager
//! construction time; an unrecognized name is rejected before any
//! lifecycle operation runs. The registry is pre-seeded with the built-in
//! `debug` engine, and integration layers may register additional engines
//! with [`register`].

use super::debug::DebugPlatform;
use super::{Platform, PlatformContext, DEBUG_PLATFORM};
use itertools::Itertools;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type PlatformFactory = Arc<dyn Fn(&PlatformContext) -> Box<dyn Platform> + Send + Sync>;

lazy_static! {
    static ref REGISTRY: RwLock<HashMap<String, PlatformFactory>> = {
        let mut registry: HashMap<String, PlatformFactory> = HashMap::new();
        registry.insert(
            DEBUG_PLATFORM.to_string(),
            Arc::new(|context: &PlatformContext| -> Box<dyn Platform> {
                Box::new(DebugPlatform::new(context))
            }),
        );
        RwLock::new(registry)
    };
}

/// Register a platform engine factory under the given name. A later
/// registration with the same name replaces the earlier one.
pub fn register<F>(name: &str, factory: F)
where
    F: Fn(&PlatformContext) -> Box<dyn Platform> + Send + Sync + 'static,
{
    REGISTRY.write().unwrap().insert(name.to_string(), Arc::new(factory));
}

/// Returns true if an engine with the given name is registered.
pub fn is_registered(name: &str) -> bool {
    REGISTRY.read().unwrap().contains_key(name)
}

/// Instantiate the engine registered under `name`, or `None` if the name
/// is unknown.
pub fn instantiate(name: &str, context: &PlatformContext) -> Option<Box<dyn Platform>> {
    let factory = REGISTRY.read().unwrap().get(name).cloned();
    factory.map(|f| f(context))
}

/// The names of all registered engines, sorted.
pub fn registered_platforms() -> Vec<String> {
    REGISTRY.read().unwrap().keys().cloned().sorted().collect()
}
