// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser configuration, optionally loaded from environment variables.

use crate::classify::{Classifier, ElementKind};
use crate::summary::SummaryLimits;
use std::str::FromStr;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Drawing units reported in the result metadata.
    pub units: String,
    /// Numerator of the display scale (`scale_reference / max_x`).
    pub scale_reference: f64,
    /// Maximum number of distinct layers listed in the summary.
    pub max_layers: usize,
    /// Maximum number of distinct block names listed in the summary.
    pub max_block_names: usize,
    /// Walk top-level roots on the rayon pool.
    pub parallel_walk: bool,
    /// Echo the input payloads in the result.
    pub include_raw: bool,
    /// Deployment-specific exact layer rules, consulted after the built-in table.
    pub extra_layer_rules: Vec<(String, ElementKind)>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            units: "mm".into(),
            scale_reference: 1000.0,
            max_layers: 20,
            max_block_names: 30,
            parallel_walk: false,
            include_raw: true,
            extra_layer_rules: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            units: lookup("FLOORPLAN_UNITS")
                .map(|units| units.trim().to_string())
                .filter(|units| !units.is_empty())
                .unwrap_or(defaults.units),
            scale_reference: parse_var::<f64>(&lookup, "FLOORPLAN_SCALE_REFERENCE")
                .filter(|reference| reference.is_finite() && *reference > 0.0)
                .unwrap_or(defaults.scale_reference),
            max_layers: parse_var(&lookup, "FLOORPLAN_MAX_LAYERS").unwrap_or(defaults.max_layers),
            max_block_names: parse_var(&lookup, "FLOORPLAN_MAX_BLOCK_NAMES")
                .unwrap_or(defaults.max_block_names),
            parallel_walk: lookup("FLOORPLAN_PARALLEL_WALK")
                .and_then(|value| parse_flag(&value))
                .unwrap_or(defaults.parallel_walk),
            include_raw: lookup("FLOORPLAN_INCLUDE_RAW")
                .and_then(|value| parse_flag(&value))
                .unwrap_or(defaults.include_raw),
            extra_layer_rules: lookup("FLOORPLAN_LAYER_RULES")
                .map(|rules| parse_layer_rules(&rules))
                .unwrap_or(defaults.extra_layer_rules),
        }
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new().with_layer_rules(
            self.extra_layer_rules
                .iter()
                .map(|(layer, kind)| (layer.as_str(), *kind)),
        )
    }

    pub fn summary_limits(&self) -> SummaryLimits {
        SummaryLimits {
            max_layers: self.max_layers,
            max_block_names: self.max_block_names,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse `LAYER=kind,LAYER=kind`. Malformed entries are skipped with a warning.
fn parse_layer_rules(rules: &str) -> Vec<(String, ElementKind)> {
    rules
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = entry.split_once('=').and_then(|(layer, kind)| {
                let layer = layer.trim();
                let kind = kind.parse::<ElementKind>().ok()?;
                (!layer.is_empty()).then(|| (layer.to_string(), kind))
            });
            if parsed.is_none() {
                tracing::warn!(entry, "Ignoring malformed layer rule");
            }
            parsed
        })
        .collect()
}
