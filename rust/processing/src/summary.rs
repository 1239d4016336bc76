// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Human-readable description of a classified plan.
//!
//! Consumed by the cost-estimation assistant, so labels are Korean.

use crate::walker::Buckets;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Names that mark a bathroom fixture as a toilet.
const TOILET_KEYWORDS: &[&str] = &["양변기", "변기", "toilet", "wc"];

/// Doors assumed to belong to the entrance and a bathroom.
const NON_BEDROOM_DOORS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticDescription {
    pub summary: String,
    pub element_counts: BTreeMap<String, usize>,
    pub layers: Vec<String>,
    pub block_names: Vec<String>,
    pub estimated_rooms: Vec<String>,
}

/// Caps for the listing fields.
#[derive(Debug, Clone, Copy)]
pub struct SummaryLimits {
    pub max_layers: usize,
    pub max_block_names: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            max_layers: 20,
            max_block_names: 30,
        }
    }
}

pub fn summarize(buckets: &Buckets, limits: SummaryLimits) -> SemanticDescription {
    let counts = [
        ("walls", buckets.walls.len()),
        ("doors", buckets.doors.len()),
        ("windows", buckets.windows.len()),
        ("bathroom", buckets.bathroom.len()),
        ("kitchen", buckets.kitchen.len()),
        ("fixtures", buckets.fixtures.len()),
        ("furniture", buckets.furniture.len()),
    ];
    let element_counts = counts
        .iter()
        .map(|(key, count)| (key.to_string(), *count))
        .collect();

    SemanticDescription {
        summary: summary_sentence(buckets),
        element_counts,
        layers: distinct_layers(buckets, limits.max_layers),
        block_names: distinct_block_names(buckets, limits.max_block_names),
        estimated_rooms: estimate_rooms(buckets),
    }
}

fn summary_sentence(buckets: &Buckets) -> String {
    let mut parts = vec![format!("총 {}개 요소 감지", buckets.kept_len())];
    let labelled = [
        ("벽", buckets.walls.len()),
        ("문", buckets.doors.len()),
        ("욕실 설비", buckets.bathroom.len()),
        ("주방 설비", buckets.kitchen.len()),
        ("가구", buckets.furniture.len()),
    ];
    parts.extend(
        labelled
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| format!("{label} {count}개")),
    );
    parts.join(", ")
}

fn distinct_layers(buckets: &Buckets, limit: usize) -> Vec<String> {
    let mut seen = FxHashSet::default();
    buckets
        .iter_kept()
        .map(|element| element.layer.as_str())
        .filter(|layer| !layer.is_empty() && seen.insert(*layer))
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn distinct_block_names(buckets: &Buckets, limit: usize) -> Vec<String> {
    let mut seen = FxHashSet::default();
    buckets
        .iter_kept()
        .map(|element| element.name.as_str())
        .filter(|name| !name.is_empty() && !name.contains('[') && seen.insert(*name))
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn estimate_rooms(buckets: &Buckets) -> Vec<String> {
    let mut rooms = Vec::new();

    let toilets = buckets
        .bathroom
        .iter()
        .filter(|element| {
            let lowered = element.name.to_lowercase();
            TOILET_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
        })
        .count();
    match toilets {
        0 => {}
        1 => rooms.push("욕실".to_string()),
        n => rooms.push(format!("욕실 {n}개")),
    }

    if !buckets.kitchen.is_empty() {
        rooms.push("주방".to_string());
    }

    let doors = buckets.doors.len();
    if doors > NON_BEDROOM_DOORS {
        let bedrooms = (doors - NON_BEDROOM_DOORS).max(1);
        rooms.push(format!("침실 약 {bedrooms}개"));
    }

    rooms
}
