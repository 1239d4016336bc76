// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Template deduplication: one representative per distinct placed item.
//!
//! Block instances are named `"<block> [<hex handle>]"`; stripping the handle
//! yields the canonical name. Raw geometry primitives and anonymous
//! auto-generated blocks never make it into a template.
//!
//! First-seen wins, so results depend on bucket order. Buckets are always
//! produced in pre-order of the tree walk (see [`crate::walker`]).

use crate::walker::ClassifiedElement;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

static HANDLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" \[[0-9A-Fa-f]+\]$").expect("valid handle pattern"));

static ANONYMOUS_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^A\$C[0-9A-Fa-f]+$").expect("valid block pattern"));

const GENERAL_CATEGORY: [&str; 2] = ["General", "General "];
const NAME_KEYS: [&str; 2] = ["Name ", "Name"];

/// Primitive entity labels, lower-cased with spaces removed.
const PRIMITIVES: &[&str] = &[
    "line",
    "xline",
    "ray",
    "circle",
    "arc",
    "polyline",
    "lwpolyline",
    "2dpolyline",
    "3dpolyline",
    "ellipse",
    "spline",
    "point",
    "hatch",
    "solid",
    "3dsolid",
    "region",
    "face",
    "3dface",
    "mesh",
    "polyfacemesh",
    "polygonmesh",
    "text",
    "mtext",
];

/// Strip a trailing ` [HEX]` handle suffix.
pub fn canonical_name(name: &str) -> &str {
    match HANDLE_SUFFIX.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

fn is_primitive_label(label: &str) -> bool {
    let normalized: String = label
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    !normalized.is_empty() && PRIMITIVES.contains(&normalized.as_str())
}

/// True if the element is constituent geometry rather than a placed item.
///
/// The bag's `General > Name` (entity type) decides when present; otherwise
/// the first word of the canonical name does.
pub fn is_primitive(element: &ClassifiedElement, canonical: &str) -> bool {
    let entity_type = element
        .attributes
        .category(&GENERAL_CATEGORY)
        .and_then(|general| general.get(&NAME_KEYS))
        .map(|value| value.as_text())
        .filter(|text| !text.trim().is_empty());

    match entity_type {
        Some(entity_type) if is_primitive_label(&entity_type) => true,
        _ => canonical
            .split_whitespace()
            .next()
            .is_some_and(is_primitive_label),
    }
}

/// Anonymous blocks like `A$C1F2E3D4` carry no meaning for a template.
pub fn is_anonymous_block(canonical: &str) -> bool {
    ANONYMOUS_BLOCK.is_match(canonical)
}

/// Keep the first element per canonical name, skipping primitives and
/// anonymous blocks. Never returns more elements than it was given.
pub fn dedupe(bucket: &[ClassifiedElement]) -> Vec<ClassifiedElement> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut kept = Vec::new();
    let mut primitives = 0usize;
    let mut anonymous = 0usize;

    for element in bucket {
        let canonical = canonical_name(&element.name);
        if is_primitive(element, canonical) {
            primitives += 1;
            continue;
        }
        if is_anonymous_block(canonical) {
            anonymous += 1;
            continue;
        }
        if seen.insert(canonical) {
            kept.push(element.clone());
        }
    }

    tracing::trace!(
        input = bucket.len(),
        kept = kept.len(),
        primitives,
        anonymous,
        "Deduplicated bucket"
    );
    kept
}
