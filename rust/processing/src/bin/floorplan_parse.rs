// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Turn translated CAD payloads into a floor plan description (JSON)
//!
//! Reads the object tree and property collection saved from the translation
//! service and prints the parse result to stdout. Logs go to stderr.
//!
//! Usage:
//!   floorplan-parse <object-tree.json> <properties.json> [options]

use anyhow::{bail, Context, Result};
use floorplan_lite_core::Error;
use floorplan_lite_processing::{parse_floor_plan, ParserConfig, SourceInfo};
use serde_json::Value;
use std::env;
use std::fs;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let tree_path = &args[1];
    let properties_path = &args[2];

    let mut config = ParserConfig::from_env();
    let mut source = SourceInfo::default();
    let mut compact = false;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--file-name" => {
                source.file_name = Some(option_value(&args, &mut i)?);
            }
            "--urn" => {
                source.urn = Some(option_value(&args, &mut i)?);
            }
            "--property-type" => {
                source.property_type = Some(option_value(&args, &mut i)?);
            }
            "--parallel" => {
                config.parallel_walk = true;
            }
            "--no-raw" => {
                config.include_raw = false;
            }
            "--compact" => {
                compact = true;
            }
            other => {
                print_usage();
                bail!("Unknown option: {}", other);
            }
        }
        i += 1;
    }

    let object_tree = read_json(tree_path)?;
    let properties = read_json(properties_path)?;

    let result = parse_floor_plan(&object_tree, &properties, source, &config);

    let rendered = if compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered).context("Failed to write result")?;
    Ok(())
}

fn option_value(args: &[String], i: &mut usize) -> Result<String> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.clone()),
        None => bail!("Missing value for {}", args[*i - 1]),
    }
}

fn read_json(path: &str) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let value = serde_json::from_str(&text)
        .map_err(Error::from)
        .with_context(|| format!("Cannot parse '{}'", path))?;
    Ok(value)
}

fn print_usage() {
    eprintln!("Usage: floorplan-parse <object-tree.json> <properties.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --file-name <name>       Source file name to record in the result");
    eprintln!("  --urn <urn>              Translation URN to record in the result");
    eprintln!("  --property-type <type>   Property type to record in the result");
    eprintln!("  --parallel               Walk top-level roots in parallel");
    eprintln!("  --no-raw                 Omit the raw payload echoes");
    eprintln!("  --compact                Print single-line JSON");
    eprintln!();
    eprintln!("Environment: FLOORPLAN_UNITS, FLOORPLAN_SCALE_REFERENCE, FLOORPLAN_MAX_LAYERS,");
    eprintln!("  FLOORPLAN_MAX_BLOCK_NAMES, FLOORPLAN_PARALLEL_WALK, FLOORPLAN_INCLUDE_RAW,");
    eprintln!("  FLOORPLAN_LAYER_RULES (LAYER=kind,...), RUST_LOG");
}
