// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object tree walk: join each node to its attribute bag, classify it and
//! route it into per-kind buckets.
//!
//! The walk is an explicit-stack pre-order traversal. Upstream trees are not
//! depth-limited, so the call stack is never used for descent.

use crate::classify::{Classifier, ElementKind};
use floorplan_lite_core::{
    extract, parse_number, resolve_rect, AttributeBag, AttributeIndex, PlanBounds, RawTreeNode,
    Rect,
};
use rayon::prelude::*;
use serde::Serialize;

const LAYER_KEYS: [&str; 2] = ["Layer", "Layer "];
const NAME_KEYS: [&str; 2] = ["Name ", "Name"];
const AREA_KEYS: [&str; 2] = ["Area", "Area "];

/// A drawing object that survived classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedElement {
    /// Upstream object id, as a string
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub name: String,
    pub layer: String,
    #[serde(rename = "coordinates")]
    pub rect: Rect,
    #[serde(rename = "properties")]
    pub attributes: AttributeBag,
}

/// Room entry with its reported area. Unknown extents are reported as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomRecord {
    pub name: String,
    pub area: f64,
    pub coordinates: Rect,
}

/// Classified elements grouped by kind, in traversal order.
///
/// Columns are stored in `columns` and also in `walls`, since downstream
/// consumers treat them as part of the structural wall set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub walls: Vec<ClassifiedElement>,
    pub doors: Vec<ClassifiedElement>,
    pub windows: Vec<ClassifiedElement>,
    pub columns: Vec<ClassifiedElement>,
    pub rooms: Vec<ClassifiedElement>,
    pub bathroom: Vec<ClassifiedElement>,
    pub kitchen: Vec<ClassifiedElement>,
    pub fixtures: Vec<ClassifiedElement>,
    pub furniture: Vec<ClassifiedElement>,
    pub others: Vec<ClassifiedElement>,
}

impl Buckets {
    /// Bucket for `kind`. The wall bucket includes columns.
    pub fn get(&self, kind: ElementKind) -> &[ClassifiedElement] {
        match kind {
            ElementKind::Wall => &self.walls,
            ElementKind::Door => &self.doors,
            ElementKind::Window => &self.windows,
            ElementKind::Column => &self.columns,
            ElementKind::Room => &self.rooms,
            ElementKind::Bathroom => &self.bathroom,
            ElementKind::Kitchen => &self.kitchen,
            ElementKind::Fixture => &self.fixtures,
            ElementKind::Furniture => &self.furniture,
            ElementKind::Other => &self.others,
        }
    }

    fn get_mut(&mut self, kind: ElementKind) -> &mut Vec<ClassifiedElement> {
        match kind {
            ElementKind::Wall => &mut self.walls,
            ElementKind::Door => &mut self.doors,
            ElementKind::Window => &mut self.windows,
            ElementKind::Column => &mut self.columns,
            ElementKind::Room => &mut self.rooms,
            ElementKind::Bathroom => &mut self.bathroom,
            ElementKind::Kitchen => &mut self.kitchen,
            ElementKind::Fixture => &mut self.fixtures,
            ElementKind::Furniture => &mut self.furniture,
            ElementKind::Other => &mut self.others,
        }
    }

    pub fn push(&mut self, element: ClassifiedElement) {
        if element.kind == ElementKind::Column {
            self.walls.push(element.clone());
        }
        self.get_mut(element.kind).push(element);
    }

    /// Number of distinct kept elements (columns counted once).
    pub fn kept_len(&self) -> usize {
        ElementKind::ALL
            .iter()
            .map(|kind| self.get(*kind).len())
            .sum::<usize>()
            - self.columns.len()
    }

    /// All kept elements, bucket by bucket, columns only via the wall bucket.
    pub fn iter_kept(&self) -> impl Iterator<Item = &ClassifiedElement> {
        ElementKind::ALL
            .into_iter()
            .filter(|kind| *kind != ElementKind::Column)
            .flat_map(move |kind| self.get(kind).iter())
    }

    fn append(&mut self, mut other: Buckets) {
        for kind in ElementKind::ALL {
            self.get_mut(kind).append(other.get_mut(kind));
        }
    }
}

/// Everything gathered by one walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkOutput {
    pub buckets: Buckets,
    pub rooms: Vec<RoomRecord>,
    pub bounds: PlanBounds,
    /// Every node visited, kept or dropped
    pub total_visited: usize,
    /// Visited nodes classified as [`ElementKind::Other`], kept or dropped
    pub unclassified: usize,
}

impl WalkOutput {
    /// Visited nodes that received a kind other than `Other`.
    pub fn classified(&self) -> usize {
        self.total_visited - self.unclassified
    }

    fn visit(&mut self, node: &RawTreeNode, index: &AttributeIndex, classifier: &Classifier) {
        self.total_visited += 1;

        let bag = index.get(node.object_id);
        let layer = extract(bag, &LAYER_KEYS);
        let rect = resolve_rect(bag);

        if rect.has_origin() {
            self.bounds.expand(rect.x, rect.y);
        }

        let kind = classifier.classify(&node.name, &layer);
        if kind == ElementKind::Other {
            self.unclassified += 1;
            // Unclassified objects are only worth keeping if they are located.
            if !rect.has_origin() {
                return;
            }
        }

        let name = display_name(node, bag);

        if kind == ElementKind::Room {
            let area = parse_number(&extract(bag, &AREA_KEYS)).unwrap_or(0.0);
            self.rooms.push(RoomRecord {
                name: name.clone(),
                area,
                coordinates: rect.with_zero_extent(),
            });
        }

        self.buckets.push(ClassifiedElement {
            id: node.object_id.to_string(),
            kind,
            name,
            layer,
            rect,
            attributes: bag.cloned().unwrap_or_default(),
        });
    }

    /// Merge a walk over later roots into this one.
    fn merge(&mut self, other: WalkOutput) {
        self.buckets.append(other.buckets);
        self.rooms.extend(other.rooms);
        self.bounds.merge(&other.bounds);
        self.total_visited += other.total_visited;
        self.unclassified += other.unclassified;
    }
}

/// The bag's `Name` field, falling back to the tree node's own name.
fn display_name(node: &RawTreeNode, bag: Option<&AttributeBag>) -> String {
    let name = extract(bag, &NAME_KEYS);
    if name.is_empty() {
        node.name.clone()
    } else {
        name
    }
}

/// Walk the given roots sequentially in pre-order.
pub fn walk(roots: &[RawTreeNode], index: &AttributeIndex, classifier: &Classifier) -> WalkOutput {
    let mut output = WalkOutput::default();
    let mut stack: Vec<&RawTreeNode> = roots.iter().rev().collect();

    while let Some(node) = stack.pop() {
        output.visit(node, index, classifier);
        stack.extend(node.children.iter().rev());
    }

    tracing::debug!(
        visited = output.total_visited,
        kept = output.buckets.kept_len(),
        rooms = output.rooms.len(),
        "Tree walk complete"
    );
    output
}

/// Walk each root on the rayon pool and merge the results in root order.
///
/// The merged output is identical to [`walk`] over the same roots: each
/// root's traversal is a deterministic pre-order and the merge preserves root
/// order, so first-seen ordering downstream is unaffected.
pub fn walk_parallel(
    roots: &[RawTreeNode],
    index: &AttributeIndex,
    classifier: &Classifier,
) -> WalkOutput {
    let partials: Vec<WalkOutput> = roots
        .par_iter()
        .map(|root| walk(std::slice::from_ref(root), index, classifier))
        .collect();

    let mut output = WalkOutput::default();
    for partial in partials {
        output.merge(partial);
    }
    output
}
