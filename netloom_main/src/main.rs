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

//! Build a topology description file against a platform engine from the
//! command line.

use netloom::manager::TopologyManager;
use netloom::parser::AttributeInjection;

use clap::Parser;
use log::*;
use std::error::Error;
use std::fs::read_to_string;
use std::io::stdin;
use std::path::PathBuf;

mod args;

#[derive(Parser, Debug)]
#[clap(name = "netloom", author = "The Netloom Developers", version)]
struct CommandLineArguments {
    /// Topology description file (.szn) to build
    #[clap(parse(from_os_str))]
    topology: PathBuf,

    /// Platform engine to build the topology with
    #[clap(long, default_value = "debug")]
    platform: String,

    /// Engine options as key=value pairs
    #[clap(long = "option", multiple_occurrences = true, multiple_values = true)]
    option: Vec<String>,

    /// JSON file with per-identifier attributes to inject into the parsed
    /// description
    #[clap(long, parse(from_os_str))]
    inject: Option<PathBuf>,

    /// Do not wait for a keypress before tearing the topology down
    #[clap(long)]
    non_interactive: bool,

    /// Increase logging verbosity (repeat for more detail)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    // run clap
    let args = CommandLineArguments::parse();

    // initialize the logger from the -v count
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder().filter_level(level).init();

    args::validate_topology_file(&args.topology)?;
    let options = args::parse_options(&args.option)?;
    let inject: Option<AttributeInjection> = match &args.inject {
        Some(path) => Some(netloom_harness::load_injection(path)?),
        None => None,
    };

    let description = read_to_string(&args.topology)?;

    info!("Building topology against the '{}' engine", args.platform);
    let mut topology =
        TopologyManager::with_options(&args.platform, options, args.verbose > 0)?;
    topology.parse(&description, inject.as_ref(), true)?;
    topology.graph.check_consistency()?;
    topology.build()?;

    let nodes = topology
        .graph
        .nodes()
        .map(|node| node.identifier())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Topology built with {} nodes: {}", topology.nodes().len(), nodes);

    if !args.non_interactive {
        println!("Press Enter to tear the topology down...");
        let mut line = String::new();
        stdin().read_line(&mut line)?;
    }

    topology.unbuild()?;
    info!("Topology teardown complete");

    Ok(())
}
