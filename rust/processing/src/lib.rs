// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan extraction from translated CAD drawings
//!
//! This crate turns the object tree and property collection produced by a
//! CAD translation service into a classified, deduplicated floor plan:
//! 1. Build the `objectId -> attributes` index in one pass
//! 2. Walk the object tree, classifying each node by layer and name
//! 3. Summarize the buckets into counts, rooms and a prose sentence
//! 4. Deduplicate block instances into a reusable template set
//!
//! # Usage
//!
//! ```rust,ignore
//! use floorplan_lite_processing::{parse_floor_plan, ParserConfig, SourceInfo};
//!
//! let result = parse_floor_plan(&object_tree, &properties, SourceInfo::default(), &ParserConfig::default());
//! println!("{}", result.semantic_description.summary);
//! ```
//!
//! The pipeline performs no I/O and holds no global state; identical inputs
//! give identical results.

pub mod classify;
pub mod config;
pub mod dedup;
pub mod result;
pub mod summary;
pub mod walker;

pub use classify::{classify, Classifier, ElementKind, MatchTier};
pub use config::ParserConfig;
pub use dedup::{canonical_name, dedupe};
pub use result::{assemble, Metadata, ParseResult, RawPayloads, SourceInfo, TemplateElements, UniqueCounts};
pub use summary::{summarize, SemanticDescription, SummaryLimits};
pub use walker::{walk, walk_parallel, Buckets, ClassifiedElement, RoomRecord, WalkOutput};

use floorplan_lite_core::{roots_from_payload, AttributeIndex, Result};
use serde_json::Value;
use std::time::Instant;

/// Run the full pipeline over decoded payloads.
///
/// Never fails: a missing `data.objects` array is an empty plan and a
/// malformed properties payload is an empty attribute index.
pub fn parse_floor_plan(
    object_tree: &Value,
    properties: &Value,
    source: SourceInfo,
    config: &ParserConfig,
) -> ParseResult {
    let start = Instant::now();

    let roots = roots_from_payload(object_tree);
    let index = AttributeIndex::from_properties(properties);
    let classifier = config.classifier();

    tracing::info!(
        roots = roots.len(),
        attribute_bags = index.len(),
        parallel = config.parallel_walk,
        file_name = source.file_name.as_deref().unwrap_or(""),
        "Starting floor plan extraction"
    );

    let walked = if config.parallel_walk && roots.len() > 1 {
        walk_parallel(&roots, &index, &classifier)
    } else {
        walk(&roots, &index, &classifier)
    };

    let raw = config.include_raw.then(|| RawPayloads {
        object_tree: object_tree.clone(),
        properties: properties.clone(),
    });
    let result = assemble(walked, source, config, raw);

    tracing::info!(
        total_elements = result.metadata.total_elements,
        classified_elements = result.metadata.classified_elements,
        walls = result.walls.len(),
        doors = result.doors.len(),
        windows = result.windows.len(),
        rooms = result.rooms.len(),
        template_elements = result.template_elements.unique_counts.total,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Floor plan extraction complete"
    );

    result
}

/// Run the pipeline over JSON text. Fails only if either payload is not JSON.
pub fn parse_floor_plan_str(
    object_tree: &str,
    properties: &str,
    source: SourceInfo,
    config: &ParserConfig,
) -> Result<ParseResult> {
    let object_tree: Value = serde_json::from_str(object_tree)?;
    let properties: Value = serde_json::from_str(properties)?;
    Ok(parse_floor_plan(&object_tree, &properties, source, config))
}
