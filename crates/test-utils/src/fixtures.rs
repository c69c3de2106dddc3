//! Boundary fixtures for geoplot tests.
//!
//! All fixtures are GeoJSON FeatureCollections of axis-aligned squares placed
//! inside the main Taiwan panel (lon 118.9..122.6, lat 21.75..25.35), so they
//! render with the default figure layout.

use serde_json::{json, Value};

/// Attribute holding county names.
pub const COUNTY_FIELD: &str = "COUNTYNAME";

/// Attribute holding town names.
pub const TOWN_FIELD: &str = "TOWNNAME";

/// Center of county "A" in [`two_counties`].
pub const COUNTY_A_CENTER: (f64, f64) = (120.4, 23.4);

/// Center of county "B" in [`two_counties`].
pub const COUNTY_B_CENTER: (f64, f64) = (121.4, 23.4);

/// Side length of the fixture squares, in degrees.
pub const SQUARE_SIZE: f64 = 0.8;

/// A GeoJSON Feature with a square polygon.
pub fn square_feature(properties: Value, min_x: f64, min_y: f64, size: f64) -> Value {
    let (max_x, max_y) = (min_x + size, min_y + size);
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [min_x, min_y], [max_x, min_y], [max_x, max_y], [min_x, max_y], [min_x, min_y]
            ]]
        }
    })
}

/// Wrap features into a FeatureCollection string.
pub fn collection(features: Vec<Value>) -> String {
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// Two side-by-side counties, "A" and "B".
pub fn two_counties() -> String {
    collection(vec![
        square_feature(json!({ COUNTY_FIELD: "A" }), 120.0, 23.0, SQUARE_SIZE),
        square_feature(json!({ COUNTY_FIELD: "B" }), 121.0, 23.0, SQUARE_SIZE),
    ])
}

/// Towns of [`two_counties`]: "A" split into "a1" and "a2", "B" holds "b1".
pub fn two_county_towns() -> String {
    let half = SQUARE_SIZE / 2.0;
    collection(vec![
        square_town("A", "a1", 120.0, 23.0, half),
        square_town("A", "a2", 120.0 + half, 23.0, half),
        square_town("B", "b1", 121.0, 23.0, SQUARE_SIZE),
    ])
}

fn square_town(county: &str, town: &str, min_x: f64, min_y: f64, width: f64) -> Value {
    let mut feature = square_feature(
        json!({ COUNTY_FIELD: county, TOWN_FIELD: town }),
        min_x,
        min_y,
        SQUARE_SIZE,
    );
    // Narrow the square to `width`.
    let max_x = min_x + width;
    feature["geometry"]["coordinates"][0][1][0] = json!(max_x);
    feature["geometry"]["coordinates"][0][2][0] = json!(max_x);
    feature
}

/// Counties named like the real data set, one per layout panel family.
pub fn taiwan_counties() -> String {
    collection(vec![
        square_feature(json!({ COUNTY_FIELD: "臺北市" }), 121.45, 24.95, 0.15),
        square_feature(json!({ COUNTY_FIELD: "新北市" }), 121.6, 24.8, 0.3),
        square_feature(json!({ COUNTY_FIELD: "臺中市" }), 120.5, 24.0, 0.4),
        square_feature(json!({ COUNTY_FIELD: "澎湖縣" }), 119.5, 23.5, 0.1),
        square_feature(json!({ COUNTY_FIELD: "金門縣" }), 118.3, 24.4, 0.1),
    ])
}

/// A FeatureCollection that is valid JSON but not GeoJSON.
pub const MALFORMED_GEOJSON: &str = r#"{"type": "Nope", "features": 3}"#;
