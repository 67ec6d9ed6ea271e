use geojson::{Geometry, Value};
use mockito::{Matcher, Server};
use serde_json::json;
use stac::{Item, ItemCollection};
use stac_api::Search;
use tempfile::TempDir;

const NO_OPTIONS: [(&str, &str); 0] = [];

fn page(ids: &[&str]) -> String {
    let features: Vec<_> = ids
        .iter()
        .map(|id| {
            let mut item = Item::new(*id);
            item.geometry = Some(Geometry::new(Value::Point(vec![-105.1, 40.2])));
            serde_json::to_value(item).unwrap()
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features}).to_string()
}

#[tokio::test]
async fn search_to_geoparquet() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_body(Matcher::PartialJson(json!({"limit": 1})))
        .with_header("content-type", "application/geo+json")
        .with_body(page(&["item-a", "item-b"]))
        .create_async()
        .await;
    let tempdir = TempDir::new().unwrap();
    let outfile = tempdir.path().join("items.parquet");
    let search = Search::new().intersects(Geometry::new(Value::Point(vec![-105.1, 40.2])));

    let count = stac_io::search_to(
        outfile.to_str().unwrap(),
        &server.url(),
        search,
        Some(1),
        NO_OPTIONS,
    )
    .await
    .unwrap();
    mock.assert_async().await;
    assert_eq!(count, 1);

    let item_collection: ItemCollection = stac_io::read(outfile.to_str().unwrap()).unwrap();
    assert_eq!(item_collection.items.len(), 1);
    assert_eq!(item_collection.items[0].id, "item-a");
    assert!(item_collection.items[0].geometry.is_some());
}

#[tokio::test]
async fn search_to_ndjson() {
    let mut server = Server::new_async().await;
    let _ = server
        .mock("POST", "/search")
        .with_body(page(&["item-a", "item-b"]))
        .create_async()
        .await;
    let tempdir = TempDir::new().unwrap();
    let outfile = tempdir.path().join("items.ndjson");
    let count = stac_io::search_to(
        outfile.to_str().unwrap(),
        &server.url(),
        Search::new(),
        None,
        NO_OPTIONS,
    )
    .await
    .unwrap();
    assert_eq!(count, 2);
    let text = std::fs::read_to_string(&outfile).unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[tokio::test]
async fn search_to_unknown_format() {
    let tempdir = TempDir::new().unwrap();
    let outfile = tempdir.path().join("items.tif");
    let error = stac_io::search_to(
        outfile.to_str().unwrap(),
        "http://stac.test",
        Search::new(),
        None,
        NO_OPTIONS,
    )
    .await
    .unwrap_err();
    assert!(matches!(error, stac_io::Error::UnknownFormat(_)));
}
