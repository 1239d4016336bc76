// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end pipeline tests over JSON payloads shaped like the translation
//! service output.

use floorplan_lite_processing::{
    parse_floor_plan, parse_floor_plan_str, ElementKind, ParseResult, ParserConfig, SourceInfo,
};
use approx::assert_relative_eq;
use serde_json::{json, Value};

fn tree(objects: Value) -> Value {
    json!({ "data": { "type": "objects", "objects": objects } })
}

fn properties(collection: Value) -> Value {
    json!({ "data": { "type": "properties", "collection": collection } })
}

fn parse(object_tree: &Value, properties: &Value) -> ParseResult {
    parse_floor_plan(object_tree, properties, SourceInfo::default(), &ParserConfig::default())
}

/// A small apartment unit: walls, a column, doors, a window, two rooms,
/// duplicated bathroom blocks, kitchen, furniture and loose geometry.
///
/// Wall segments and loose lines carry their entity type as the bag name;
/// the toilets carry their instance names there. Other blocks are unnamed in
/// their bags and fall back to the tree node name.
fn unit_payloads() -> (Value, Value) {
    let object_tree = tree(json!([
        {
            "objectid": 1,
            "name": "Model",
            "objects": [
                { "objectid": 2, "name": "wall [10]" },
                { "objectid": 3, "name": "wall [11]" },
                { "objectid": 4, "name": "col [12]" },
                { "objectid": 5, "name": "84a door [13]" },
                { "objectid": 6, "name": "84a 창문 [14]" },
                { "objectid": 7, "name": "84a 양변기" },
                { "objectid": 8, "name": "84a 양변기" },
                { "objectid": 9, "name": "싱크 [15]" },
                { "objectid": 10, "name": "거실" },
                { "objectid": 11, "name": "침실" },
                { "objectid": 12, "name": "DOUBLE BED [16]" },
                {
                    "objectid": 13,
                    "name": "Line [17]",
                    "objects": [{ "objectid": 14, "name": "Line [18]" }]
                }
            ]
        }
    ]));

    let properties = properties(json!([
        { "objectid": 2, "name": "wall", "properties": {
            "General": { "Name ": "Line", "Layer": "A-WALL" },
            "Geometry": {
                "Start Point X": "100", "Start Point Y": "50",
                "End Point X": "3100", "End Point Y": "50"
            }
        }},
        { "objectid": 3, "name": "wall", "properties": {
            "General": { "Name ": "Line", "Layer": "A-WALL" },
            "Geometry": {
                "Start Point X": "100", "Start Point Y": "50",
                "End Point X": "100", "End Point Y": "2450"
            }
        }},
        { "objectid": 4, "name": "col", "properties": {
            "General": { "Layer": "COL" },
            "Geometry": { "Position X": "1500", "Position Y": "1200", "Width": "400", "Height": "400" }
        }},
        { "objectid": 5, "name": "84a door", "properties": {
            "General": { "Layer": "DOOR" },
            "Geometry": { "Position X": "900", "Position Y": "50", "Width": "900", "Height": "100" }
        }},
        { "objectid": 6, "name": "84a 창문", "properties": {
            "General": { "Layer": "WIN" },
            "Geometry": { "Position X": "2000", "Position Y": "2450", "Width": "1200", "Height": "200" }
        }},
        { "objectid": 7, "name": "84a 양변기", "properties": {
            "General": { "Name ": "84a 양변기 [105E79]", "Layer": "TOI" },
            "Geometry": { "Position X": "300", "Position Y": "300" }
        }},
        { "objectid": 8, "name": "84a 양변기", "properties": {
            "General": { "Name ": "84a 양변기 [2C91F0]", "Layer": "TOI" },
            "Geometry": { "Position X": "600", "Position Y": "300" }
        }},
        { "objectid": 9, "name": "싱크", "properties": {
            "General": { "Layer": "가구" }
        }},
        { "objectid": 10, "name": "거실", "properties": {
            "General": { "Layer": "A-AREA" },
            "Geometry": { "Area": "12.5" }
        }},
        { "objectid": 11, "name": "침실", "properties": {
            "General": { "Layer": "A-AREA" },
            "Geometry": { "Area": 8.0 }
        }},
        { "objectid": 12, "name": "DOUBLE BED", "properties": {
            "General": { "Layer": "FURN" }
        }},
        { "objectid": 13, "name": "Line", "properties": {
            "General": { "Name ": "Line", "Layer": "0" },
            "Geometry": { "Start Point X": "4000", "Start Point Y": "10" }
        }},
        { "objectid": 14, "name": "Line", "properties": {
            "General": { "Name ": "Line", "Layer": "0" }
        }}
    ]));

    (object_tree, properties)
}

#[test]
fn test_minimal_door() {
    let object_tree = tree(json!([{ "objectId": 1, "name": "84a door" }]));
    let properties = properties(json!([
        { "objectid": 1, "name": "84a door", "properties": { "General": { "Layer": "DOOR" } } }
    ]));

    let result = parse(&object_tree, &properties);

    assert_eq!(result.doors.len(), 1);
    assert_eq!(result.doors[0].kind, ElementKind::Door);
    assert_eq!(result.doors[0].layer, "DOOR");
    assert_eq!(result.metadata.total_elements, 1);
    assert_eq!(result.metadata.classified_elements, 1);
}

#[test]
fn test_empty_input() {
    let result = parse(&tree(json!([])), &properties(json!([])));

    assert!(result.walls.is_empty());
    assert!(result.doors.is_empty());
    assert!(result.windows.is_empty());
    assert!(result.columns.is_empty());
    assert!(result.bathroom.is_empty());
    assert!(result.kitchen.is_empty());
    assert!(result.fixtures.is_empty());
    assert!(result.furniture.is_empty());
    assert!(result.room_elements.is_empty());
    assert!(result.others.is_empty());
    assert!(result.rooms.is_empty());
    assert_eq!(result.metadata.total_elements, 0);
    assert_eq!(result.metadata.scale, 1.0);
    assert!(result.metadata.bounds.is_none());
    assert_eq!(result.semantic_description.summary, "총 0개 요소 감지");
    assert_eq!(result.template_elements.unique_counts.total, 0);
}

#[test]
fn test_malformed_payloads_degrade_to_empty() {
    let config = ParserConfig::default();

    let no_objects = parse_floor_plan(
        &json!({ "data": { "objects": "not an array" } }),
        &json!("not an object"),
        SourceInfo::default(),
        &config,
    );
    assert_eq!(no_objects.metadata.total_elements, 0);

    // Without bags every node still counts; only name keywords can classify it.
    let no_bags = parse_floor_plan(
        &tree(json!([{ "objectid": 1, "name": "84a door" }, { "objectid": 2, "name": "Line" }])),
        &json!(null),
        SourceInfo::default(),
        &config,
    );
    assert_eq!(no_bags.metadata.total_elements, 2);
    assert_eq!(no_bags.metadata.classified_elements, 1);
    assert_eq!(no_bags.doors.len(), 1);
    assert_eq!(no_bags.doors[0].layer, "");
    assert!(no_bags.others.is_empty());
}

#[test]
fn test_invalid_json_text_is_an_error() {
    let config = ParserConfig::default();
    assert!(parse_floor_plan_str("{", "{}", SourceInfo::default(), &config).is_err());
    assert!(parse_floor_plan_str(r#"{"data":{"objects":[]}}"#, "[", SourceInfo::default(), &config).is_err());

    let result = parse_floor_plan_str(
        r#"{"data":{"objects":[{"objectid":1,"name":"door"}]}}"#,
        r#"{"data":{"collection":[]}}"#,
        SourceInfo::default(),
        &config,
    )
    .unwrap();
    assert_eq!(result.doors.len(), 1);
}

#[test]
fn test_unit_buckets() {
    let (object_tree, properties) = unit_payloads();
    let result = parse(&object_tree, &properties);

    let ids = |bucket: &[floorplan_lite_processing::ClassifiedElement]| -> Vec<String> {
        bucket.iter().map(|e| e.id.clone()).collect()
    };

    assert_eq!(ids(&result.walls), ["2", "3", "4"]);
    assert_eq!(ids(&result.columns), ["4"]);
    assert_eq!(ids(&result.doors), ["5"]);
    assert_eq!(ids(&result.windows), ["6"]);
    assert_eq!(ids(&result.bathroom), ["7", "8"]);
    assert_eq!(ids(&result.kitchen), ["9"]);
    assert_eq!(ids(&result.room_elements), ["10", "11"]);
    assert_eq!(ids(&result.furniture), ["12"]);
    // Node 1 and 14 are unlocated and unclassified; 13 has an origin.
    assert_eq!(ids(&result.others), ["13"]);

    assert_eq!(result.metadata.total_elements, 14);
    assert_eq!(result.metadata.classified_elements, 11);
}

#[test]
fn test_bucket_membership() {
    let (object_tree, properties) = unit_payloads();
    let result = parse(&object_tree, &properties);

    let buckets = [
        (ElementKind::Door, &result.doors),
        (ElementKind::Window, &result.windows),
        (ElementKind::Column, &result.columns),
        (ElementKind::Room, &result.room_elements),
        (ElementKind::Bathroom, &result.bathroom),
        (ElementKind::Kitchen, &result.kitchen),
        (ElementKind::Fixture, &result.fixtures),
        (ElementKind::Furniture, &result.furniture),
        (ElementKind::Other, &result.others),
    ];
    for (kind, bucket) in buckets {
        assert!(bucket.iter().all(|e| e.kind == kind), "bucket {kind}");
    }
    assert!(result
        .walls
        .iter()
        .all(|e| matches!(e.kind, ElementKind::Wall | ElementKind::Column)));
    assert_eq!(
        result.walls.iter().filter(|e| e.kind == ElementKind::Column).count(),
        result.columns.len()
    );
}

#[test]
fn test_classified_count_excludes_other() {
    let (object_tree, properties) = unit_payloads();
    let result = parse(&object_tree, &properties);

    // Nodes 1, 13 and 14 are Other; only 13 is kept.
    let other_visited = 3;
    assert_eq!(
        result.metadata.classified_elements,
        result.metadata.total_elements - other_visited
    );
}

#[test]
fn test_room_area_aggregation() {
    let (object_tree, properties) = unit_payloads();
    let result = parse(&object_tree, &properties);

    assert_eq!(result.rooms.len(), 2);
    assert_eq!(result.rooms[0].name, "거실");
    assert_relative_eq!(result.metadata.total_area, 20.5);
}

#[test]
fn test_duplicate_fixture_instances() {
    let (object_tree, properties) = unit_payloads();
    let result = parse(&object_tree, &properties);

    let template = &result.template_elements;
    assert_eq!(result.bathroom.len(), 2);
    assert_eq!(template.bathroom.len(), 1);
    assert_eq!(template.bathroom[0].id, "7");
    assert_eq!(template.bathroom[0].name, "84a 양변기 [105E79]");
    // Both wall segments are primitive lines.
    assert_eq!(template.walls.len(), 1);
    assert_eq!(template.walls[0].id, "4");
    assert_eq!(template.unique_counts.total, 6);
}

#[test]
fn test_classification_priority() {
    let object_tree = tree(json!([
        { "objectid": 1, "name": "84a 창문" },
        { "objectid": 2, "name": "panel" },
        { "objectid": 3, "name": "panel" }
    ]));
    let properties = properties(json!([
        { "objectid": 1, "properties": { "General": { "Layer": "DOOR" } } },
        { "objectid": 2, "properties": {
            "General": { "Layer": "WALLPAPER" },
            "Geometry": { "Position X": "5", "Position Y": "5" }
        }},
        { "objectid": 3, "properties": { "General": { "Layer": "I-WALL-NEW" } } }
    ]));

    let result = parse(&object_tree, &properties);

    assert_eq!(result.doors.len(), 1);
    assert!(result.windows.is_empty());
    assert_eq!(result.others.len(), 1);
    assert_eq!(result.others[0].layer, "WALLPAPER");
    assert_eq!(result.walls.len(), 1);
    assert_eq!(result.walls[0].id, "3");
}

#[test]
fn test_coordinates_and_bounds() {
    let (object_tree, properties) = unit_payloads();
    let result = parse(&object_tree, &properties);

    let wall = &result.walls[0];
    assert_eq!((wall.rect.x, wall.rect.y), (100.0, 50.0));
    assert_eq!((wall.rect.width, wall.rect.height), (Some(3000.0), Some(0.0)));

    let bounds = result.metadata.bounds.expect("located elements");
    assert_eq!((bounds.min_x, bounds.min_y), (100.0, 10.0));
    // Bounds follow element origins; extents do not widen them.
    assert_eq!((bounds.max_x, bounds.max_y), (4000.0, 2450.0));
    assert_relative_eq!(result.metadata.scale, 0.25);
    assert_eq!(result.max_y(), 2650.0);
}

#[test]
fn test_semantic_description() {
    let (object_tree, properties) = unit_payloads();
    let result = parse(&object_tree, &properties);
    let description = &result.semantic_description;

    assert_eq!(
        description.summary,
        "총 12개 요소 감지, 벽 3개, 문 1개, 욕실 설비 2개, 주방 설비 1개, 가구 1개"
    );
    assert_eq!(description.element_counts["walls"], 3);
    assert_eq!(description.element_counts["bathroom"], 2);
    assert_eq!(description.estimated_rooms, ["욕실 2개", "주방"]);
    assert_eq!(description.layers, ["A-WALL", "COL", "DOOR", "WIN", "A-AREA", "TOI", "가구", "FURN", "0"]);
    assert_eq!(description.block_names, ["Line", "거실", "침실"]);
}

#[test]
fn test_idempotent() {
    let (object_tree, properties) = unit_payloads();
    let first = serde_json::to_string(&parse(&object_tree, &properties)).unwrap();
    let second = serde_json::to_string(&parse(&object_tree, &properties)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parallel_walk_matches_sequential() {
    let (object_tree, properties) = unit_payloads();
    // Lift the model's children to top level so there is more than one root.
    let object_tree = tree(object_tree["data"]["objects"][0]["objects"].clone());

    let sequential = parse(&object_tree, &properties);
    let config = ParserConfig {
        parallel_walk: true,
        ..ParserConfig::default()
    };
    let parallel = parse_floor_plan(&object_tree, &properties, SourceInfo::default(), &config);

    assert_eq!(parallel, sequential);
}

#[test]
fn test_source_and_raw_echo() {
    let (object_tree, properties) = unit_payloads();
    let source = SourceInfo {
        property_type: Some("아파트".into()),
        file_name: Some("84A.dwg".into()),
        urn: Some("dXJuOmFkc2s".into()),
    };

    let with_raw = parse_floor_plan(&object_tree, &properties, source.clone(), &ParserConfig::default());
    let json = serde_json::to_value(&with_raw).unwrap();
    assert_eq!(json["fileName"], "84A.dwg");
    assert_eq!(json["urn"], "dXJuOmFkc2s");
    assert_eq!(json["rawObjectTree"], object_tree);
    assert_eq!(json["rawProperties"], properties);
    // Attribute bags keep upstream key order.
    let keys: Vec<&String> = json["walls"][0]["properties"]["Geometry"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(keys, ["Start Point X", "Start Point Y", "End Point X", "End Point Y"]);

    let config = ParserConfig {
        include_raw: false,
        ..ParserConfig::default()
    };
    let without_raw = serde_json::to_value(parse_floor_plan(&object_tree, &properties, source, &config)).unwrap();
    assert!(without_raw.get("rawObjectTree").is_none());
    assert!(without_raw.get("rawProperties").is_none());
}

#[test]
fn test_extra_layer_rules() {
    let object_tree = tree(json!([{ "objectid": 1, "name": "unit" }]));
    let properties = properties(json!([
        { "objectid": 1, "properties": { "General": { "Layer": "X-SANITARY" } } }
    ]));

    let config = ParserConfig {
        extra_layer_rules: vec![("X-SANITARY".into(), ElementKind::Bathroom)],
        ..ParserConfig::default()
    };
    let result = parse_floor_plan(&object_tree, &properties, SourceInfo::default(), &config);

    assert_eq!(result.bathroom.len(), 1);
    assert_eq!(parse(&object_tree, &properties).bathroom.len(), 0);
}

#[test]
fn test_display_name_from_bag() {
    let object_tree = tree(json!([
        { "objectid": 1, "name": "84a door" },
        { "objectid": 2, "name": "84a door" }
    ]));
    let properties = properties(json!([
        { "objectid": 1, "properties": { "General": { "Name ": "Door Block", "Layer": "DOOR" } } },
        { "objectid": 2, "properties": { "General": { "Layer": "DOOR" } } }
    ]));

    let result = parse(&object_tree, &properties);

    assert_eq!(result.doors[0].name, "Door Block");
    assert_eq!(result.doors[1].name, "84a door");
    let names: Vec<&str> = result.template_elements.doors.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Door Block", "84a door"]);
}

#[test]
fn test_unknown_extents_are_omitted() {
    let (object_tree, properties) = unit_payloads();
    let json = serde_json::to_value(parse(&object_tree, &properties)).unwrap();

    // Toilets are placed by position only.
    assert_eq!(json["bathroom"][0]["coordinates"], json!({ "x": 300.0, "y": 300.0 }));
    assert_eq!(
        json["doors"][0]["coordinates"],
        json!({ "x": 900.0, "y": 50.0, "width": 900.0, "height": 100.0 })
    );
    // Room records report unknown extents as zero.
    assert_eq!(
        json["rooms"][0]["coordinates"],
        json!({ "x": 0.0, "y": 0.0, "width": 0.0, "height": 0.0 })
    );
}
