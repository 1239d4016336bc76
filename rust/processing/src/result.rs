// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Final parse result and its assembly from a completed walk.

use crate::config::ParserConfig;
use crate::dedup::dedupe;
use crate::summary::{summarize, SemanticDescription};
use crate::walker::{ClassifiedElement, RoomRecord, WalkOutput};
use floorplan_lite_core::BoundsBox;
use serde::Serialize;
use serde_json::Value;

/// Provenance strings carried through from the caller; never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub property_type: Option<String>,
    pub file_name: Option<String>,
    pub urn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub units: String,
    /// Sum of room areas
    pub total_area: f64,
    /// `scale_reference / max_x`, or 1 without positive bounds
    pub scale: f64,
    /// Every visited tree node
    pub total_elements: usize,
    /// Visited nodes with a kind other than `other`
    pub classified_elements: usize,
    /// `None` when no element was located
    pub bounds: Option<BoundsBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UniqueCounts {
    pub walls: usize,
    pub doors: usize,
    pub windows: usize,
    pub bathroom: usize,
    pub kitchen: usize,
    pub fixtures: usize,
    pub furniture: usize,
    pub total: usize,
}

/// One deduplicated bucket per kind, for reuse across units of a plan type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateElements {
    pub walls: Vec<ClassifiedElement>,
    pub doors: Vec<ClassifiedElement>,
    pub windows: Vec<ClassifiedElement>,
    pub bathroom: Vec<ClassifiedElement>,
    pub kitchen: Vec<ClassifiedElement>,
    pub fixtures: Vec<ClassifiedElement>,
    pub furniture: Vec<ClassifiedElement>,
    pub unique_counts: UniqueCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    #[serde(flatten)]
    pub source: SourceInfo,
    /// Walls and columns
    pub walls: Vec<ClassifiedElement>,
    pub doors: Vec<ClassifiedElement>,
    pub windows: Vec<ClassifiedElement>,
    pub columns: Vec<ClassifiedElement>,
    pub bathroom: Vec<ClassifiedElement>,
    pub kitchen: Vec<ClassifiedElement>,
    pub fixtures: Vec<ClassifiedElement>,
    pub furniture: Vec<ClassifiedElement>,
    pub room_elements: Vec<ClassifiedElement>,
    /// Located but unclassified elements
    pub others: Vec<ClassifiedElement>,
    pub rooms: Vec<RoomRecord>,
    pub metadata: Metadata,
    pub semantic_description: SemanticDescription,
    pub template_elements: TemplateElements,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_object_tree: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_properties: Option<Value>,
}

impl ParseResult {
    /// Largest `y + height` over walls, doors and windows; the drawing height
    /// used to flip CAD coordinates into image space. 0 for an empty plan.
    pub fn max_y(&self) -> f64 {
        self.walls
            .iter()
            .chain(&self.doors)
            .chain(&self.windows)
            .map(|element| element.rect.y + element.rect.height.unwrap_or(0.0))
            .fold(0.0, f64::max)
    }
}

/// Raw payload echoes, attached when the configuration asks for them.
pub struct RawPayloads {
    pub object_tree: Value,
    pub properties: Value,
}

/// Package a completed walk into the result document.
pub fn assemble(
    walked: WalkOutput,
    source: SourceInfo,
    config: &ParserConfig,
    raw: Option<RawPayloads>,
) -> ParseResult {
    let semantic_description = summarize(&walked.buckets, config.summary_limits());
    let template_elements = build_template(&walked);

    let metadata = Metadata {
        units: config.units.clone(),
        total_area: walked.rooms.iter().map(|room| room.area).sum(),
        scale: walked.bounds.scale(config.scale_reference),
        total_elements: walked.total_visited,
        classified_elements: walked.classified(),
        bounds: walked.bounds.extent(),
    };

    let (raw_object_tree, raw_properties) = match raw {
        Some(raw) => (Some(raw.object_tree), Some(raw.properties)),
        None => (None, None),
    };

    let buckets = walked.buckets;
    ParseResult {
        source,
        walls: buckets.walls,
        doors: buckets.doors,
        windows: buckets.windows,
        columns: buckets.columns,
        bathroom: buckets.bathroom,
        kitchen: buckets.kitchen,
        fixtures: buckets.fixtures,
        furniture: buckets.furniture,
        room_elements: buckets.rooms,
        others: buckets.others,
        rooms: walked.rooms,
        metadata,
        semantic_description,
        template_elements,
        raw_object_tree,
        raw_properties,
    }
}

fn build_template(walked: &WalkOutput) -> TemplateElements {
    let buckets = &walked.buckets;
    let walls = dedupe(&buckets.walls);
    let doors = dedupe(&buckets.doors);
    let windows = dedupe(&buckets.windows);
    let bathroom = dedupe(&buckets.bathroom);
    let kitchen = dedupe(&buckets.kitchen);
    let fixtures = dedupe(&buckets.fixtures);
    let furniture = dedupe(&buckets.furniture);

    let sizes = [
        walls.len(),
        doors.len(),
        windows.len(),
        bathroom.len(),
        kitchen.len(),
        fixtures.len(),
        furniture.len(),
    ];
    let unique_counts = UniqueCounts {
        walls: sizes[0],
        doors: sizes[1],
        windows: sizes[2],
        bathroom: sizes[3],
        kitchen: sizes[4],
        fixtures: sizes[5],
        furniture: sizes[6],
        total: sizes.iter().sum(),
    };

    tracing::debug!(unique = unique_counts.total, "Built template element set");

    TemplateElements {
        walls,
        doors,
        windows,
        bathroom,
        kitchen,
        fixtures,
        furniture,
        unique_counts,
    }
}
