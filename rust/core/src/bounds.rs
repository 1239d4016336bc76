// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Running bounding box over the origins of located plan elements.
//!
//! Threaded through the tree walk by value and discarded once the display
//! scale has been derived. An accumulator that never received a point keeps
//! its sentinel extrema and reports no extent.

use serde::{Deserialize, Serialize};

/// Plan bounds in drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    /// Number of points folded in
    pub sample_count: usize,
}

/// Serializable snapshot of valid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PlanBounds {
    /// Create new bounds initialized to the empty sentinel
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
            sample_count: 0,
        }
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    #[inline]
    pub fn expand(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.sample_count += 1;
    }

    /// Min/max reduction with bounds gathered elsewhere.
    pub fn merge(&mut self, other: &PlanBounds) {
        if !other.is_valid() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
        self.sample_count += other.sample_count;
    }

    pub fn extent(&self) -> Option<BoundsBox> {
        self.is_valid().then_some(BoundsBox {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        })
    }

    /// Display scale: `reference / max_x` for a positive `max_x`, else 1.
    pub fn scale(&self, reference: f64) -> f64 {
        if self.max_x > 0.0 {
            reference / self.max_x
        } else {
            1.0
        }
    }
}

impl Default for PlanBounds {
    fn default() -> Self {
        Self::new()
    }
}
