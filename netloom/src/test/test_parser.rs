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

//! Test the topology description parser.

use crate::attributes::AttributeValue;
use crate::attrs;
use crate::parser::{apply_injection, parse, AttributeInjection, ParseError};
use maplit::hashmap;

const TOPOLOGY: &str = r#"
# Nodes
[shell=vtysh name="Switch 1"] sw1
[shell=vtysh name="Switch 2"] sw2
[type=host name="Host 1"] hs1
[type=host name="Host 2"] hs2

# Links
hs1:1 -- sw1:1
hs2:1 -- sw2:1
[attr1=1] sw1:2 -- sw2:2
"#;

#[test]
fn test_parse_empty_description() {
    let meta = parse("").unwrap();
    assert!(meta.nodes.is_empty());
    assert!(meta.ports.is_empty());
    assert!(meta.links.is_empty());
    assert!(meta.environment.is_empty());
}

#[test]
fn test_parse_comments_and_blank_lines() {
    let meta = parse("\n# only a comment\n   \n").unwrap();
    assert!(meta.nodes.is_empty());
    assert!(meta.links.is_empty());
}

#[test]
fn test_parse_full_description() {
    let meta = parse(TOPOLOGY).unwrap();

    assert_eq!(meta.nodes.len(), 4);
    assert_eq!(meta.nodes[0].nodes, vec!["sw1"]);
    assert_eq!(
        meta.nodes[0].attributes,
        hashmap! {
            "shell".to_string() => AttributeValue::from("vtysh"),
            "name".to_string() => AttributeValue::from("Switch 1"),
        },
    );
    assert_eq!(meta.nodes[2].nodes, vec!["hs1"]);

    assert_eq!(meta.links.len(), 3);
    assert_eq!(
        meta.links[0].endpoints,
        (("hs1".to_string(), "1".to_string()), ("sw1".to_string(), "1".to_string())),
    );
    assert_eq!(meta.links[2].attributes, attrs! {"attr1" => 1i64});
}

#[test]
fn test_parse_node_group_on_one_line() {
    let meta = parse("[type=host] hs1 hs2 hs3").unwrap();
    assert_eq!(meta.nodes.len(), 1);
    assert_eq!(meta.nodes[0].nodes, vec!["hs1", "hs2", "hs3"]);
}

#[test]
fn test_parse_port_declaration() {
    let meta = parse("[port_number=5] hs1:oobm").unwrap();
    assert_eq!(meta.ports.len(), 1);
    assert_eq!(meta.ports[0].ports, vec![("hs1".to_string(), "oobm".to_string())]);
    assert_eq!(meta.ports[0].attributes, attrs! {"port_number" => 5i64});
}

#[test]
fn test_parse_environment_line() {
    let meta = parse("[virtual=yes retries=2 ratio=1.75 title=\"My Lab\"]").unwrap();
    assert_eq!(
        meta.environment,
        hashmap! {
            "virtual".to_string() => AttributeValue::Bool(true),
            "retries".to_string() => AttributeValue::Int(2),
            "ratio".to_string() => AttributeValue::Float(1.75),
            "title".to_string() => AttributeValue::from("My Lab"),
        },
    );
}

#[test]
fn test_parse_typed_attribute_values() {
    let meta = parse("[a=TRUE b=no c=-3 d=0.5 e=word] hs1").unwrap();
    let attributes = &meta.nodes[0].attributes;
    assert_eq!(attributes.get("a"), Some(&AttributeValue::Bool(true)));
    assert_eq!(attributes.get("b"), Some(&AttributeValue::Bool(false)));
    assert_eq!(attributes.get("c"), Some(&AttributeValue::Int(-3)));
    assert_eq!(attributes.get("d"), Some(&AttributeValue::Float(0.5)));
    assert_eq!(attributes.get("e"), Some(&AttributeValue::from("word")));
}

#[test]
fn test_parse_quoted_values_keep_spaces_and_hashes() {
    let meta = parse("[name=\"Host # 1\"] hs1").unwrap();
    assert_eq!(meta.nodes[0].attributes.get("name"), Some(&AttributeValue::from("Host # 1")));
}

#[test]
fn test_parse_invalid_link_shape_fails() {
    let result = parse("sw1:1 -- hs1:1 -- hs2:1");
    assert!(matches!(result, Err(ParseError::UnexpectedToken { line: 1, .. })));
}

#[test]
fn test_parse_invalid_endpoint_fails() {
    let result = parse("sw1: -- hs1:1");
    assert!(matches!(result, Err(ParseError::InvalidEndpoint { line: 1, .. })));
}

#[test]
fn test_parse_unterminated_attribute_block_fails() {
    let result = parse("[type=host hs1");
    assert!(matches!(result, Err(ParseError::UnterminatedAttributes { line: 1 })));
}

#[test]
fn test_parse_invalid_attribute_fails() {
    let result = parse("[1key=value] hs1");
    assert!(matches!(result, Err(ParseError::InvalidAttribute { line: 1, .. })));
}

#[test]
fn test_parse_reports_line_numbers() {
    let result = parse("hs1\nhs2\n[oops hs3");
    assert!(matches!(result, Err(ParseError::UnterminatedAttributes { line: 3 })));
}

#[test]
fn test_injection_overlays_node_attributes() {
    let mut meta = parse("[type=host] hs1 hs2").unwrap();
    let inject: AttributeInjection = hashmap! {
        "hs1".to_string() => attrs! {"image" => "custom"},
    };
    apply_injection(&mut meta, &inject);

    // the group is split so the overlay only applies to hs1
    assert_eq!(meta.nodes.len(), 2);
    let hs1 = meta.nodes.iter().find(|g| g.nodes == vec!["hs1"]).unwrap();
    let hs2 = meta.nodes.iter().find(|g| g.nodes == vec!["hs2"]).unwrap();
    assert_eq!(hs1.attributes.get("image"), Some(&AttributeValue::from("custom")));
    assert_eq!(hs1.attributes.get("type"), Some(&AttributeValue::from("host")));
    assert!(hs2.attributes.get("image").is_none());
}

#[test]
fn test_injection_overlays_port_and_link_attributes() {
    let mut meta = parse("[port_number=5] hs1:oobm\nsw1:1 -- hs1:1").unwrap();
    let inject: AttributeInjection = hashmap! {
        "hs1:oobm".to_string() => attrs! {"speed" => 1000i64},
        "hs1:1 -- sw1:1".to_string() => attrs! {"attr1" => 1i64},
    };
    apply_injection(&mut meta, &inject);

    assert_eq!(meta.ports[0].attributes.get("speed"), Some(&AttributeValue::Int(1000)));
    assert_eq!(meta.ports[0].attributes.get("port_number"), Some(&AttributeValue::Int(5)));
    assert_eq!(meta.links[0].attributes.get("attr1"), Some(&AttributeValue::Int(1)));
}

#[test]
fn test_injection_wins_over_parsed_values() {
    let mut meta = parse("[type=host] hs1").unwrap();
    let inject: AttributeInjection = hashmap! {
        "hs1".to_string() => attrs! {"type" => "switch"},
    };
    apply_injection(&mut meta, &inject);
    assert_eq!(meta.nodes[0].attributes.get("type"), Some(&AttributeValue::from("switch")));
}
