//! Fixture-driven extraction: a JSON page dump in the shape the CLI tools
//! consume, parsed by hand and fed through the finder.

use pagegrid_core::geometry::BBox;
use pagegrid_core::table::{Char, TableFinder, TableSettings, extract_grid};
use serde_json::Value;

const PAGE_DUMP: &str = r#"{
  "width": 100.0,
  "height": 40.0,
  "chars": [
    {"text": "n", "x0": 5.0, "top": 5.0, "x1": 10.0, "bottom": 15.0, "size": 10.0, "upright": true, "font": "Helvetica"},
    {"text": "1", "x0": 55.0, "top": 5.0, "x1": 60.0, "bottom": 15.0, "size": 10.0, "upright": true, "font": "Helvetica"},
    {"text": "m", "x0": 5.0, "top": 25.0, "x1": 10.0, "bottom": 35.0, "size": 10.0, "upright": true, "font": "Helvetica"},
    {"text": "2", "x0": 55.0, "top": 25.0, "x1": 60.0, "bottom": 35.0, "size": 10.0, "upright": true, "font": "Helvetica"}
  ],
  "paths": [
    [0.0, 0.0, 50.0, 20.0],
    [50.0, 0.0, 100.0, 20.0],
    [0.0, 20.0, 50.0, 40.0],
    [50.0, 20.0, 100.0, 40.0]
  ]
}"#;

fn f(value: &Value, key: &str) -> f64 {
    value[key].as_f64().unwrap()
}

fn parse_dump(dump: &str) -> (BBox, Vec<Char>, Vec<BBox>) {
    let value: Value = serde_json::from_str(dump).unwrap();
    let bbox = BBox::new(0.0, 0.0, f(&value, "width"), f(&value, "height"));
    let chars = value["chars"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| Char {
            text: c["text"].as_str().unwrap().to_string(),
            bbox: BBox::new(f(c, "x0"), f(c, "top"), f(c, "x1"), f(c, "bottom")),
            doctop: f(c, "top"),
            fontname: c["font"].as_str().unwrap().to_string(),
            size: f(c, "size"),
            upright: c["upright"].as_bool().unwrap(),
            page: 0,
        })
        .collect();
    let paths = value["paths"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            let r = r.as_array().unwrap();
            BBox::new(
                r[0].as_f64().unwrap(),
                r[1].as_f64().unwrap(),
                r[2].as_f64().unwrap(),
                r[3].as_f64().unwrap(),
            )
        })
        .collect();
    (bbox, chars, paths)
}

#[test]
fn dump_round_trips_through_the_finder() {
    let (bbox, chars, paths) = parse_dump(PAGE_DUMP);
    let finder = TableFinder::new(bbox, chars, &paths, &TableSettings::default());
    let tables = finder.find_tables().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].row_count(), 2);
    assert_eq!(tables[0].col_count(), 2);

    let provider = finder.text_provider();
    let grid = extract_grid(&tables[0], &provider);
    assert_eq!(grid, vec![vec!["n", "1"], vec!["m", "2"]]);
}
