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

//! Free-form attribute metadata attached to nodes, ports, links and the
//! topology environment.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Mapping of attribute keys to typed values.
pub type Attributes = HashMap<String, AttributeValue>;

/// A single scalar attribute value.
///
/// Topology descriptions carry untyped text; values are coerced with
/// [`AttributeValue::parse`] using the same rules the command line option
/// parser applies: booleans (`true`/`false`/`yes`/`no`, case-insensitive),
/// then integers, then floats, and everything else remains a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean value
    Bool(bool),
    /// Signed integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
}

impl AttributeValue {
    /// Coerce a raw textual value into a typed attribute value.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" => return Self::Bool(true),
            "false" | "no" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Str(raw.to_string())
    }

    /// Returns the string content, if the value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the integer content, if the value is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean content, if the value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a json scalar into an attribute value. Arrays, objects and
    /// `null` are not representable and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => {
                n.as_i64().map(Self::Int).or_else(|| n.as_f64().map(Self::Float))
            }
            serde_json::Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u64> for AttributeValue {
    fn from(i: u64) -> Self {
        Self::Int(i as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Build an [`Attributes`] map from `key => value` pairs.
///
/// Values are converted with [`AttributeValue::from`], so string, integer,
/// float and boolean literals can be mixed freely:
///
/// ```
/// use netloom::attrs;
///
/// let meta = attrs! {"type" => "host", "name" => "Host 1", "port_number" => 5i64};
/// assert_eq!(meta.len(), 3);
/// ```
#[macro_export]
macro_rules! attrs {
    () => { $crate::attributes::Attributes::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::attributes::Attributes::new();
        $(
            map.insert(
                String::from($key),
                $crate::attributes::AttributeValue::from($value),
            );
        )+
        map
    }};
}
