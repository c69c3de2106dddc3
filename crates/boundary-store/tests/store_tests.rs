//! Loading boundary fixtures from disk.

use boundary_store::{BoundarySource, BoundarySources, BoundaryStore, Level};
use geoplot_common::{BoundingBox, PlotError};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};
use std::path::PathBuf;
use test_utils::fixtures::{self, COUNTY_FIELD, SQUARE_SIZE, TOWN_FIELD};
use test_utils::{temp_test_dir, write_fixture};

fn sources(entries: Vec<(Level, BoundarySource)>) -> BoundarySources {
    entries.into_iter().collect()
}

#[test]
fn test_load_counties_and_towns() {
    let dir = temp_test_dir();
    let counties = write_fixture(&dir, "counties.geojson", &fixtures::two_counties());
    let towns = write_fixture(&dir, "towns.json", &fixtures::two_county_towns());

    let store = BoundaryStore::new(sources(vec![
        (Level::County, BoundarySource::new(counties, COUNTY_FIELD)),
        (
            Level::Town,
            BoundarySource::new(towns, TOWN_FIELD).with_parent_field(COUNTY_FIELD),
        ),
    ]));
    store.preload().unwrap();

    let county_keys: Vec<&str> = store
        .get(Level::County)
        .unwrap()
        .iter()
        .map(|f| f.key.as_str())
        .collect();
    assert_eq!(county_keys, ["a", "b"]);

    let set = store.load().unwrap();
    assert_eq!(set.len(), 5);
    let a2 = set.find(Level::Town, "a/a2").unwrap();
    assert_eq!(a2.parent.as_deref(), Some("A"));

    let outline = store.get_outline(Level::County).unwrap();
    assert_eq!(
        outline.bounds,
        BoundingBox::new(120.0, 23.0, 121.0 + SQUARE_SIZE, 23.0 + SQUARE_SIZE)
    );
}

#[test]
fn test_canonical_names_from_real_style_data() {
    let dir = temp_test_dir();
    let path = write_fixture(&dir, "tw.geojson", &fixtures::taiwan_counties());
    let store = BoundaryStore::new(sources(vec![(Level::County, BoundarySource::new(path, COUNTY_FIELD))]));

    let set = store.load().unwrap();
    // 台 and 臺 spellings resolve to the same region
    let taipei = set.find(Level::County, &boundary_store::canonical_key("台北市")).unwrap();
    assert_eq!(taipei.name, "臺北市");
}

#[test]
fn test_malformed_source_fails_every_call() {
    let dir = temp_test_dir();
    let path = write_fixture(&dir, "broken.geojson", fixtures::MALFORMED_GEOJSON);
    let store = BoundaryStore::new(sources(vec![(Level::County, BoundarySource::new(path, COUNTY_FIELD))]));

    assert!(matches!(store.get(Level::County), Err(PlotError::BoundaryLoad(_))));
    assert!(matches!(store.get_outline(Level::County), Err(PlotError::BoundaryLoad(_))));
}

#[test]
fn test_concurrent_first_use_loads_once() {
    let dir = temp_test_dir();
    let path = write_fixture(&dir, "counties.geojson", &fixtures::two_counties());
    let store = std::sync::Arc::new(BoundaryStore::new(sources(vec![(
        Level::County,
        BoundarySource::new(path, COUNTY_FIELD),
    )])));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || store.get(Level::County).map(|f| f.as_ptr() as usize))
        })
        .collect();
    let ptrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
    // every thread sees the same cached features
    assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_broken_town_source_leaves_counties_usable() {
    let dir = temp_test_dir();
    let counties = write_fixture(&dir, "counties.geojson", &fixtures::two_counties());
    let store = BoundaryStore::new(sources(vec![
        (Level::County, BoundarySource::new(counties, COUNTY_FIELD)),
        (Level::Town, BoundarySource::new("/nonexistent/towns.geojson", TOWN_FIELD)),
    ]));

    assert_eq!(store.get(Level::County).unwrap().len(), 2);
    assert!(store.get_outline(Level::County).is_ok());
    let err = store.get(Level::Town).unwrap_err();
    assert!(matches!(err, PlotError::BoundaryLoad(ref m) if m.contains("towns.geojson")));
    // startup preload still reports the broken source
    assert!(store.preload().is_err());
}

/// Writes one square polygon per name into `name.shp` (+ `.shx`, `.dbf`).
fn write_county_shapefile(dir: &tempfile::TempDir, name: &str, squares: &[(&str, f64, f64)]) -> PathBuf {
    let path = dir.path().join(format!("{}.shp", name));
    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from(COUNTY_FIELD).unwrap(), 50);
    let mut writer = shapefile::Writer::from_path(&path, table).unwrap();
    for &(county, x, y) in squares {
        let polygon = Polygon::new(PolygonRing::Outer(vec![
            Point::new(x, y),
            Point::new(x, y + 1.0),
            Point::new(x + 1.0, y + 1.0),
            Point::new(x + 1.0, y),
            Point::new(x, y),
        ]));
        let mut record = Record::default();
        record.insert(COUNTY_FIELD.to_string(), FieldValue::Character(Some(county.to_string())));
        writer.write_shape_and_record(&polygon, &record).unwrap();
    }
    path
}

#[test]
fn test_load_counties_from_shapefile() {
    let dir = temp_test_dir();
    let path = write_county_shapefile(&dir, "counties", &[("Taipei City", 121.0, 24.5), ("TAICHUNG", 120.0, 23.5)]);
    let store = BoundaryStore::new(sources(vec![(Level::County, BoundarySource::new(path, COUNTY_FIELD))]));

    let keys: Vec<&str> = store
        .get(Level::County)
        .unwrap()
        .iter()
        .map(|f| f.key.as_str())
        .collect();
    assert_eq!(keys, ["taipei city", "taichung"]);

    let outline = store.get_outline(Level::County).unwrap();
    assert_eq!(outline.bounds, BoundingBox::new(120.0, 23.5, 122.0, 25.5));
}

#[test]
fn test_shapefile_without_name_field_fails() {
    let dir = temp_test_dir();
    let path = write_county_shapefile(&dir, "counties", &[("A", 120.0, 23.0)]);
    let store = BoundaryStore::new(sources(vec![(Level::County, BoundarySource::new(path, "TOWNNAME"))]));

    let err = store.get(Level::County).unwrap_err();
    assert!(matches!(err, PlotError::BoundaryLoad(ref m) if m.contains("TOWNNAME")));
}
