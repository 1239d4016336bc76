// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # floorplan-lite core
//!
//! Input-side primitives for turning a translated CAD drawing into a floor
//! plan description:
//!
//! - **Payloads**: the object tree (`data.objects`) and the flat property
//!   collection (`data.collection`) emitted by the translation service
//! - **Attribute bags**: tolerant, order-preserving per-object attribute
//!   lookup across inconsistently spelled categories
//! - **Geometry**: rectangle resolution from line endpoints, insertion
//!   points, explicit extents and instance scale
//! - **Bounds**: a running bounding box for display scale derivation
//!
//! ```rust,ignore
//! use floorplan_lite_core::{resolve_rect, roots_from_payload, AttributeIndex};
//!
//! let roots = roots_from_payload(&object_tree);
//! let index = AttributeIndex::from_properties(&properties);
//! let rect = resolve_rect(index.get(roots[0].object_id));
//! ```
//!
//! Nothing in this crate fails on missing or malformed attributes; gaps
//! resolve to empty strings, zero coordinates and unknown extents.

pub mod attributes;
pub mod bounds;
pub mod error;
pub mod geometry;
pub mod payload;

pub use attributes::{extract, parse_number, AttrValue, AttributeBag, AttributeCategory, AttributeIndex};
pub use bounds::{BoundsBox, PlanBounds};
pub use error::{Error, Result};
pub use geometry::{resolve_rect, Rect, GEOMETRY_CATEGORY};
pub use payload::{object_id_of, roots_from_payload, RawTreeNode};
