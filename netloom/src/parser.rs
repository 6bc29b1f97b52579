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

//! # Topology description parser
//!
//! Parses the line-oriented declarative topology syntax into the
//! intermediate [`DictMeta`] representation consumed by
//! [`TopologyManager::load`](crate::manager::TopologyManager::load).
//!
//! ```text
//! # Nodes
//! [type=switch name="Switch 1"] sw1
//! [type=host name="Host 1"] hs1
//!
//! # Ports
//! [port_number=5] hs1:oobm
//!
//! # Links
//! sw1:1 -- hs1:1
//! ```
//!
//! A line is either a comment, an environment entry (an attribute block on
//! its own), a node declaration list, a port declaration, or a link. Values
//! in attribute blocks are coerced with
//! [`AttributeValue::parse`](crate::attributes::AttributeValue::parse);
//! quoted strings are taken verbatim.

use crate::attributes::{AttributeValue, Attributes};
use crate::graph::{Link, Port};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// Per-identifier attribute overlay, merged over parsed attributes before
/// loading. Keys are node identifiers, derived port identifiers
/// (`"node:label"`) or canonical link identifiers.
pub type AttributeInjection = HashMap<String, Attributes>;

/// Parse errors
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// A line does not match any known construct
    #[error("Unexpected token on line {line}: {content}")]
    UnexpectedToken {
        /// Line number, starting at 1
        line: usize,
        /// Offending content
        content: String,
    },
    /// An attribute block is missing its closing bracket
    #[error("Unterminated attribute block on line {line}")]
    UnterminatedAttributes {
        /// Line number, starting at 1
        line: usize,
    },
    /// An attribute block contains an invalid entry
    #[error("Invalid attribute on line {line}: {content}")]
    InvalidAttribute {
        /// Line number, starting at 1
        line: usize,
        /// Offending content
        content: String,
    },
    /// A link or port reference is not of the form `node:port`
    #[error("Invalid endpoint on line {line}: {content}")]
    InvalidEndpoint {
        /// Line number, starting at 1
        line: usize,
        /// Offending content
        content: String,
    },
}

/// A group of node declarations sharing one attribute block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodesGroup {
    /// Identifiers of the declared nodes
    pub nodes: Vec<String>,
    /// Attributes shared by the group
    pub attributes: Attributes,
    /// Identifier of the enclosing node, if any
    pub parent: Option<String>,
}

/// A group of port declarations sharing one attribute block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortsGroup {
    /// (node identifier, port label) pairs
    pub ports: Vec<(String, String)>,
    /// Attributes shared by the group
    pub attributes: Attributes,
}

/// A single link declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkGroup {
    /// The two (node identifier, port label) endpoints, in declaration
    /// order
    pub endpoints: ((String, String), (String, String)),
    /// Attributes of the link
    pub attributes: Attributes,
}

/// The intermediate representation of a parsed topology description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictMeta {
    /// Node declaration groups, in declaration order
    pub nodes: Vec<NodesGroup>,
    /// Port declaration groups, in declaration order
    pub ports: Vec<PortsGroup>,
    /// Link declarations, in declaration order
    pub links: Vec<LinkGroup>,
    /// Free-form environment data
    pub environment: Attributes,
}

lazy_static! {
    static ref ATTRIBUTE_RE: Regex =
        Regex::new(r#"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*("[^"]*"|[^\s"\]]+)\s*"#)
            .expect("hardcoded regex");
    static ref IDENTIFIER_RE: Regex =
        Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*$").expect("hardcoded regex");
}

/// Parse a topology description into its intermediate representation.
/// Empty input yields an empty [`DictMeta`].
pub fn parse(description: &str) -> Result<DictMeta, ParseError> {
    let mut meta = DictMeta::default();
    for (i, raw_line) in description.lines().enumerate() {
        let line_no = i + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let (attributes, rest) = if line.starts_with('[') {
            let end = find_block_end(line)
                .ok_or(ParseError::UnterminatedAttributes { line: line_no })?;
            (parse_attributes(&line[1..end], line_no)?, line[end + 1..].trim())
        } else {
            (Attributes::new(), line)
        };
        if rest.is_empty() {
            // attribute block on its own is environment data
            meta.environment.extend(attributes);
            continue;
        }
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        if tokens.iter().any(|t| *t == "--") {
            if tokens.len() != 3 || tokens[1] != "--" {
                return Err(ParseError::UnexpectedToken {
                    line: line_no,
                    content: rest.to_string(),
                });
            }
            let endpoint1 = parse_endpoint(tokens[0], line_no)?;
            let endpoint2 = parse_endpoint(tokens[2], line_no)?;
            meta.links.push(LinkGroup { endpoints: (endpoint1, endpoint2), attributes });
        } else if tokens.iter().all(|t| t.contains(':')) {
            let mut ports = Vec::with_capacity(tokens.len());
            for token in &tokens {
                ports.push(parse_endpoint(token, line_no)?);
            }
            meta.ports.push(PortsGroup { ports, attributes });
        } else if tokens.iter().all(|t| IDENTIFIER_RE.is_match(t)) {
            meta.nodes.push(NodesGroup {
                nodes: tokens.iter().map(|t| t.to_string()).collect(),
                attributes,
                parent: None,
            });
        } else {
            return Err(ParseError::UnexpectedToken { line: line_no, content: rest.to_string() });
        }
    }
    Ok(meta)
}

/// Merge a per-identifier attribute overlay into a parsed description.
///
/// Node and port groups containing an injected identifier are split so the
/// overlay applies to that entity only; injected values win over parsed
/// ones.
pub fn apply_injection(meta: &mut DictMeta, inject: &AttributeInjection) {
    let mut nodes = Vec::with_capacity(meta.nodes.len());
    for group in meta.nodes.drain(..) {
        if !group.nodes.iter().any(|n| inject.contains_key(n)) {
            nodes.push(group);
            continue;
        }
        let NodesGroup { nodes: members, attributes: base, parent } = group;
        for node in members {
            let mut attributes = base.clone();
            if let Some(extra) = inject.get(&node) {
                attributes.extend(extra.clone());
            }
            nodes.push(NodesGroup { nodes: vec![node], attributes, parent: parent.clone() });
        }
    }
    meta.nodes = nodes;

    let mut ports = Vec::with_capacity(meta.ports.len());
    for group in meta.ports.drain(..) {
        let touched = group
            .ports
            .iter()
            .any(|(node, label)| inject.contains_key(&Port::calc_id(node, label)));
        if !touched {
            ports.push(group);
            continue;
        }
        let PortsGroup { ports: members, attributes: base } = group;
        for (node, label) in members {
            let mut attributes = base.clone();
            if let Some(extra) = inject.get(&Port::calc_id(&node, &label)) {
                attributes.extend(extra.clone());
            }
            ports.push(PortsGroup { ports: vec![(node, label)], attributes });
        }
    }
    meta.ports = ports;

    for link in meta.links.iter_mut() {
        let ((node1, port1), (node2, port2)) = &link.endpoints;
        let identifier = Link::calc_id(node1, port1, node2, port2);
        if let Some(extra) = inject.get(&identifier) {
            link.attributes.extend(extra.clone());
        }
    }
}

/// Cut the line at the first `#` that is not inside a quoted string.
fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    for (idx, c) in line.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '#' if !in_quote => return &line[..idx],
            _ => {}
        }
    }
    line
}

/// Byte index of the `]` closing the attribute block starting at byte 0.
fn find_block_end(line: &str) -> Option<usize> {
    let mut in_quote = false;
    for (idx, c) in line.char_indices().skip(1) {
        match c {
            '"' => in_quote = !in_quote,
            ']' if !in_quote => return Some(idx),
            _ => {}
        }
    }
    None
}

fn parse_attributes(inner: &str, line: usize) -> Result<Attributes, ParseError> {
    let mut attributes = Attributes::new();
    let mut rest = inner.trim_start();
    while !rest.is_empty() {
        let caps = ATTRIBUTE_RE.captures(rest).ok_or_else(|| ParseError::InvalidAttribute {
            line,
            content: rest.to_string(),
        })?;
        let key = caps[1].to_string();
        let raw = caps
            .get(2)
            .map(|m| m.as_str())
            .unwrap_or_default();
        let value = if raw.starts_with('"') {
            AttributeValue::from(&raw[1..raw.len() - 1])
        } else {
            AttributeValue::parse(raw)
        };
        attributes.insert(key, value);
        rest = &rest[caps.get(0).map(|m| m.end()).unwrap_or(rest.len())..];
    }
    Ok(attributes)
}

fn parse_endpoint(token: &str, line: usize) -> Result<(String, String), ParseError> {
    let mut split = token.splitn(2, ':');
    match (split.next(), split.next()) {
        (Some(node), Some(label))
            if IDENTIFIER_RE.is_match(node) && IDENTIFIER_RE.is_match(label) =>
        {
            Ok((node.to_string(), label.to_string()))
        }
        _ => Err(ParseError::InvalidEndpoint { line, content: token.to_string() }),
    }
}
