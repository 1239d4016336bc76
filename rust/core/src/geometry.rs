// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rectangle resolution from heterogeneous geometry attributes.
//!
//! Lines carry start/end points, block references carry an insertion
//! position plus scale, and some objects report explicit width/height. Each
//! source fills only what the previous ones left open.

use crate::attributes::AttributeBag;
use serde::{Deserialize, Serialize};

/// Accepted spellings of the geometry category.
pub const GEOMETRY_CATEGORY: [&str; 2] = ["Geometry", "Geometry "];

/// Axis-aligned rectangle in drawing units.
///
/// `width`/`height` of `None` means the extent is unknown, not zero. Unknown
/// extents are left out of the serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: Option<f64>, height: Option<f64>) -> Self {
        Self { x, y, width, height }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, None, None)
    }

    /// True when the origin is anywhere other than (0, 0).
    #[inline]
    pub fn has_origin(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }

    /// Same rectangle with unknown extents reported as zero.
    pub fn with_zero_extent(&self) -> Self {
        Self {
            width: Some(self.width.unwrap_or(0.0)),
            height: Some(self.height.unwrap_or(0.0)),
            ..*self
        }
    }

    /// Convert from CAD (Y up) to screen (Y down) coordinates for a drawing
    /// of the given total height.
    pub fn flip_y(&self, total_height: f64) -> Self {
        Self {
            y: total_height - self.y - self.height.unwrap_or(0.0),
            ..*self
        }
    }
}

/// Derive a rectangle from an object's attribute bag.
///
/// Origin comes from `Start Point X/Y`, falling back to `Position X/Y`.
/// Extent comes from `End Point X/Y`, overridden by explicit
/// `Width`/`Length`/`Height`, then multiplied by `|Scale X/Y|`. Objects
/// without a geometry category resolve to a zero-origin rectangle of unknown
/// extent.
pub fn resolve_rect(bag: Option<&AttributeBag>) -> Rect {
    let Some(geometry) = bag.and_then(|b| b.category(&GEOMETRY_CATEGORY)) else {
        return Rect::default();
    };

    let x = geometry
        .number(&["Start Point X", "Position X"])
        .unwrap_or(0.0);
    let y = geometry
        .number(&["Start Point Y", "Position Y"])
        .unwrap_or(0.0);

    let mut width = geometry.number(&["End Point X"]).map(|end| (end - x).abs());
    let mut height = geometry.number(&["End Point Y"]).map(|end| (end - y).abs());

    if let Some(explicit) = geometry.number(&["Width", "Length"]) {
        width = Some(explicit);
    }
    if let Some(explicit) = geometry.number(&["Height"]) {
        height = Some(explicit);
    }

    // Negative scale is a mirrored instance; only the magnitude sizes it.
    if let Some(scale) = geometry.number(&["Scale X"]) {
        width = width.map(|w| w * scale.abs());
    }
    if let Some(scale) = geometry.number(&["Scale Y"]) {
        height = height.map(|h| h * scale.abs());
    }

    Rect { x, y, width, height }
}
