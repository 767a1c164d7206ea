use std::io::Write;
use std::path::PathBuf;

use citymap_lib::{load_road_map, Error};
use tempfile::NamedTempFile;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/france.map")
}

fn write_map(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp map");
    file.write_all(contents.as_bytes()).expect("write temp map");
    file
}

#[test]
fn fixture_loads_every_city() {
    let map = load_road_map(&fixture_path()).expect("fixture loads");
    assert_eq!(map.len(), 12);
    assert!(map.cities().iter().all(|city| !city.is_placeholder()));

    let nantes = map.city_by_name("Nantes").expect("Nantes present");
    assert_eq!((nantes.latitude(), nantes.longitude()), (4722, -155));
    assert_eq!(nantes.to_string(), "Nantes 4722 -155 3");

    let rennes = map.city_id_by_name("Rennes").unwrap();
    let caen = map.city_id_by_name("Caen").unwrap();
    assert_eq!(map.road_distance(rennes, caen), Some(185));
    assert_eq!(map.road_distance(caen, rennes), Some(185));
}

#[test]
fn neighbour_first_cities_are_patched_later() {
    let file = write_map("Brest 4839 -449\nQuimper 72\n\nQuimper 4799 -410\nBrest 72\n");
    let map = load_road_map(file.path()).expect("map loads");

    let quimper = map.city_by_name("Quimper").unwrap();
    assert_eq!(quimper.id(), 1);
    assert!(!quimper.is_placeholder());
    assert_eq!((quimper.latitude(), quimper.longitude()), (4799, -410));
}

#[test]
fn duplicate_records_patch_coordinates() {
    let file = write_map("Brest 0 0\nQuimper 72\nBrest 4839 -449\nMorlaix 60\n");
    let map = load_road_map(file.path()).expect("map loads");

    assert_eq!(map.len(), 3);
    let brest = map.city_by_name("Brest").unwrap();
    assert_eq!((brest.latitude(), brest.longitude()), (4839, -449));
    assert_eq!(brest.neighbours().len(), 2);
    assert!(map.city_by_name("Morlaix").unwrap().is_placeholder());
}

#[test]
fn parse_errors_name_the_line() {
    let file = write_map("Brest 4839 -449\nQuimper 72\nMorlaix sixty\n");
    let err = load_road_map(file.path()).expect_err("bad distance");
    assert!(matches!(err, Error::MapParse { line: 3, .. }));
    assert!(err.to_string().starts_with("map line 3:"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_road_map(&dir.path().join("absent.map")).expect_err("no such file");
    assert!(matches!(err, Error::Io(_)));
}
