// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element classification from layer names and display names.
//!
//! Three tiers, first match wins:
//! 1. exact layer match against a curated table (plus deployment rules)
//! 2. coarse layer tokens (`DOOR`, `WALL`, `TOI`, `BATH`, `WIN`), matched per
//!    token so that `WALLPAPER` is not a wall
//! 3. bilingual keywords in the display name
//!
//! Anything else is [`ElementKind::Other`].

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of plan element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Wall,
    Door,
    Window,
    Column,
    Room,
    Bathroom,
    Kitchen,
    Fixture,
    Furniture,
    Other,
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::Wall,
        ElementKind::Door,
        ElementKind::Window,
        ElementKind::Column,
        ElementKind::Room,
        ElementKind::Bathroom,
        ElementKind::Kitchen,
        ElementKind::Fixture,
        ElementKind::Furniture,
        ElementKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Wall => "wall",
            ElementKind::Door => "door",
            ElementKind::Window => "window",
            ElementKind::Column => "column",
            ElementKind::Room => "room",
            ElementKind::Bathroom => "bathroom",
            ElementKind::Kitchen => "kitchen",
            ElementKind::Fixture => "fixture",
            ElementKind::Furniture => "furniture",
            ElementKind::Other => "other",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown element kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Which tier produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    ExactLayer,
    PartialLayer,
    NameKeyword,
    Fallback,
}

/// Exact layer names seen in residential drawings (upper-cased).
const EXACT_LAYERS: &[(&str, ElementKind)] = &[
    ("DOOR", ElementKind::Door),
    ("DOORS", ElementKind::Door),
    ("I-DOOR", ElementKind::Door),
    ("A-DOOR", ElementKind::Door),
    ("A-DOOR-FRAM", ElementKind::Door),
    ("문", ElementKind::Door),
    ("WALL", ElementKind::Wall),
    ("A-WALL", ElementKind::Wall),
    ("I-WALL", ElementKind::Wall),
    ("A-WALL-PATT", ElementKind::Wall),
    ("2SEC", ElementKind::Wall),
    ("3SEC", ElementKind::Wall),
    ("벽체", ElementKind::Wall),
    ("COL", ElementKind::Column),
    ("COLUMN", ElementKind::Column),
    ("A-COLUMN", ElementKind::Column),
    ("A-COLS", ElementKind::Column),
    ("S-COLS", ElementKind::Column),
    ("기둥", ElementKind::Column),
    ("ROOM", ElementKind::Room),
    ("A-AREA", ElementKind::Room),
    ("A-AREA-IDEN", ElementKind::Room),
    ("실명", ElementKind::Room),
    ("TOI", ElementKind::Bathroom),
    ("TOILET", ElementKind::Bathroom),
    ("BATH", ElementKind::Bathroom),
    ("TILE", ElementKind::Bathroom),
    ("A-FLOR-TOIL", ElementKind::Bathroom),
    ("위생기구", ElementKind::Bathroom),
    ("가구", ElementKind::Kitchen),
    ("주방", ElementKind::Kitchen),
    ("KITCHEN", ElementKind::Kitchen),
    ("FURN", ElementKind::Furniture),
    ("FURNITURE", ElementKind::Furniture),
    ("A-FURN", ElementKind::Furniture),
    ("I-FURN", ElementKind::Furniture),
    ("LIGHT", ElementKind::Fixture),
    ("LIGHTING", ElementKind::Fixture),
    ("ELEC", ElementKind::Fixture),
    ("E-LITE", ElementKind::Fixture),
    ("E-POWR", ElementKind::Fixture),
    ("ELEC-LIGHT", ElementKind::Fixture),
    ("조명", ElementKind::Fixture),
    ("전기", ElementKind::Fixture),
    ("WIN", ElementKind::Window),
    ("WINDOW", ElementKind::Window),
    ("WINDOWS", ElementKind::Window),
    ("A-WIND", ElementKind::Window),
    ("A-GLAZ", ElementKind::Window),
    ("창호", ElementKind::Window),
];

static EXACT_TABLE: Lazy<FxHashMap<&'static str, ElementKind>> =
    Lazy::new(|| EXACT_LAYERS.iter().copied().collect());

/// Coarse layer tokens, checked in order. A token matches when, after
/// dropping trailing digits, it equals one of the accepted spellings.
const PARTIAL_LAYERS: &[(&[&str], ElementKind)] = &[
    (&["DOOR", "DOORS"], ElementKind::Door),
    (&["WALL", "WALLS"], ElementKind::Wall),
    (&["TOI", "TOILET"], ElementKind::Bathroom),
    (&["BATH", "BATHROOM"], ElementKind::Bathroom),
    (&["WIN", "WINDOW", "WINDOWS"], ElementKind::Window),
];

/// Display-name keywords per kind, checked in order. Windows precede doors
/// because `창문` contains `문`.
const NAME_KEYWORDS: &[(ElementKind, &[&str])] = &[
    (
        ElementKind::Bathroom,
        &[
            "양변기", "변기", "소변기", "세면기", "세면대", "욕조", "샤워", "비데", "toilet", "basin",
            "bathtub", "shower", "lavatory", "urinal", "bath",
        ],
    ),
    (
        ElementKind::Kitchen,
        &[
            "싱크", "씽크", "가스레인지", "쿡탑", "냉장고", "레인지후드", "주방", "sink", "cooktop",
            "stove", "fridge", "refrigerator", "kitchen",
        ],
    ),
    (ElementKind::Window, &["창문", "창호", "이중창", "window", "glazing"]),
    (ElementKind::Door, &["현관문", "방화문", "도어", "문", "door"]),
    (ElementKind::Column, &["기둥", "column", "pillar"]),
    (ElementKind::Wall, &["내력벽", "벽체", "벽", "wall"]),
    (
        ElementKind::Room,
        &["거실", "침실", "안방", "드레스룸", "다용도실", "room", "living"],
    ),
    (
        ElementKind::Fixture,
        &["조명", "전등", "등기구", "콘센트", "스위치", "에어컨", "light", "lamp", "outlet", "switch"],
    ),
    (
        ElementKind::Furniture,
        &[
            "침대", "소파", "쇼파", "식탁", "의자", "책상", "옷장", "장롱", "붙박이장", "수납장", "bed",
            "sofa", "table", "chair", "desk", "wardrobe", "closet",
        ],
    ),
];

/// Layer/name classifier with optional deployment-specific exact rules.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    extra_layers: FxHashMap<String, ElementKind>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add exact layer rules consulted after the built-in table. Layers
    /// already covered by the built-in table keep their built-in kind.
    pub fn with_layer_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (S, ElementKind)>,
        S: AsRef<str>,
    {
        for (layer, kind) in rules {
            self.extra_layers
                .insert(layer.as_ref().trim().to_uppercase(), kind);
        }
        self
    }

    pub fn classify(&self, name: &str, layer: &str) -> ElementKind {
        self.classify_with_tier(name, layer).0
    }

    pub fn classify_with_tier(&self, name: &str, layer: &str) -> (ElementKind, MatchTier) {
        let layer = layer.trim().to_uppercase();

        if !layer.is_empty() {
            if let Some(kind) = EXACT_TABLE
                .get(layer.as_str())
                .or_else(|| self.extra_layers.get(&layer))
            {
                return (*kind, MatchTier::ExactLayer);
            }

            if let Some(kind) = partial_layer_match(&layer) {
                return (kind, MatchTier::PartialLayer);
            }
        }

        if let Some(kind) = name_keyword_match(name) {
            return (kind, MatchTier::NameKeyword);
        }

        (ElementKind::Other, MatchTier::Fallback)
    }
}

/// Classify with the built-in tables only.
pub fn classify(name: &str, layer: &str) -> ElementKind {
    static DEFAULT: Lazy<Classifier> = Lazy::new(Classifier::new);
    DEFAULT.classify(name, layer)
}

fn partial_layer_match(layer: &str) -> Option<ElementKind> {
    let tokens: Vec<&str> = layer
        .split(|c: char| !c.is_alphanumeric())
        .map(|token| token.trim_end_matches(|c: char| c.is_ascii_digit()))
        .filter(|token| !token.is_empty())
        .collect();

    PARTIAL_LAYERS
        .iter()
        .find(|(spellings, _)| tokens.iter().any(|token| spellings.contains(token)))
        .map(|(_, kind)| *kind)
}

fn name_keyword_match(name: &str) -> Option<ElementKind> {
    if name.is_empty() {
        return None;
    }
    let lowered = name.to_lowercase();
    NAME_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| lowered.contains(keyword) || name.contains(keyword))
        })
        .map(|(kind, _)| *kind)
}
