use futures::{StreamExt, TryStreamExt};
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use stac::Item;
use stac_api::{BlockingClient, Client, Error, Fields, Items, Search, SearchClient};

fn page(ids: &[&str], next: Option<Value>) -> String {
    let features: Vec<_> = ids
        .iter()
        .map(|id| serde_json::to_value(Item::new(*id)).unwrap())
        .collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
        "links": next.into_iter().collect::<Vec<_>>(),
    })
    .to_string()
}

fn ids(items: &[stac_api::Item]) -> Vec<&str> {
    items.iter().map(|item| item["id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn search_follows_merged_post_links() {
    let mut server = Server::new_async().await;
    let next = json!({
        "href": format!("{}/search", server.url()),
        "rel": "next",
        "method": "POST",
        "body": {"token": "page-2"},
        "merge": true
    });
    let page_1 = server
        .mock("POST", "/search")
        .match_body(Matcher::Json(json!({
            "collections": ["a-collection"],
            "limit": 1
        })))
        .with_header("content-type", "application/geo+json")
        .with_body(page(&["item-a"], Some(next)))
        .create_async()
        .await;
    let page_2 = server
        .mock("POST", "/search")
        .match_body(Matcher::Json(json!({
            "collections": ["a-collection"],
            "limit": 1,
            "token": "page-2"
        })))
        .with_header("content-type", "application/geo+json")
        .with_body(page(&["item-b"], None))
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let search = Search::new()
        .collections(vec!["a-collection".to_string()])
        .limit(1);
    let items: Vec<_> = client
        .search(search, None)
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    page_1.assert_async().await;
    page_2.assert_async().await;
    assert_eq!(ids(&items), vec!["item-a", "item-b"]);
}

#[tokio::test]
async fn items_follow_get_links() {
    let mut server = Server::new_async().await;
    let next = json!({
        "href": format!("{}/collections/a-collection/items?limit=1&token=page-2", server.url()),
        "rel": "next"
    });
    let page_1 = server
        .mock("GET", "/collections/a-collection/items")
        .match_query(Matcher::Exact("limit=1".to_string()))
        .with_header("content-type", "application/geo+json")
        .with_body(page(&["item-a"], Some(next)))
        .create_async()
        .await;
    let page_2 = server
        .mock("GET", "/collections/a-collection/items")
        .match_query(Matcher::Exact("limit=1&token=page-2".to_string()))
        .with_header("content-type", "application/geo+json")
        .with_body(page(&["item-b"], None))
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let items = Items {
        limit: Some(1),
        ..Default::default()
    };
    let items: Vec<_> = client
        .items("a-collection", Some(items), None)
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    page_1.assert_async().await;
    page_2.assert_async().await;
    assert_eq!(ids(&items), vec!["item-a", "item-b"]);
}

#[tokio::test]
async fn max_items_truncates_and_sets_limit() {
    let mut server = Server::new_async().await;
    let next = json!({
        "href": format!("{}/search?token=page-2", server.url()),
        "rel": "next"
    });
    let page_1 = server
        .mock("POST", "/search")
        .match_body(Matcher::Json(json!({"limit": 2})))
        .with_body(page(&["item-a", "item-b", "item-c"], Some(next)))
        .create_async()
        .await;
    let page_2 = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_body(page(&["item-d"], None))
        .expect(0)
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let items: Vec<_> = client
        .search(Search::new(), Some(2))
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    page_1.assert_async().await;
    page_2.assert_async().await;
    assert_eq!(ids(&items), vec!["item-a", "item-b"]);
}

#[tokio::test]
async fn stop_on_empty_page() {
    let mut server = Server::new_async().await;
    let next = json!({
        "href": format!("{}/search?token=page-2", server.url()),
        "rel": "next"
    });
    let page_1 = server
        .mock("POST", "/search")
        .with_body(page(&[], Some(next)))
        .create_async()
        .await;
    let page_2 = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let items: Vec<_> = client
        .search(Search::new(), None)
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    page_1.assert_async().await;
    page_2.assert_async().await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn error_status() {
    let mut server = Server::new_async().await;
    let _ = server
        .mock("POST", "/search")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let results: Vec<_> = client.search(Search::new(), None).unwrap().collect().await;
    assert_eq!(results.len(), 1);
    match &results[0] {
        Err(Error::Search { status, body }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "boom");
        }
        result => panic!("unexpected result: {result:?}"),
    }
}

#[tokio::test]
async fn invalid_search_is_not_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .with_body(page(&["item-a"], None))
        .expect(0)
        .create_async()
        .await;
    let get_mock = server
        .mock("GET", Matcher::Regex("^/search".to_string()))
        .with_body(page(&["item-a"], None))
        .expect(0)
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let fields = Fields {
        include: vec!["id".to_string()],
        exclude: vec!["id".to_string()],
    };
    assert!(matches!(
        client.search(Search::new().fields(fields.clone()), None),
        Err(Error::FieldsHasIncludeAndExclude(_))
    ));
    let bbox = stac::Bbox::try_from(vec![-106.0, 40.0, -105.0, 41.0]).unwrap();
    assert!(matches!(
        client.search_get(
            Search::new()
                .bbox(bbox)
                .intersects(geojson::Geometry::new(geojson::Value::Point(vec![
                    -105.1, 40.2
                ]))),
            None
        ),
        Err(Error::SearchHasBboxAndIntersects(_))
    ));
    assert!(matches!(
        SearchClient::search(&client, Search::new().fields(fields)).await,
        Err(Error::FieldsHasIncludeAndExclude(_))
    ));
    mock.assert_async().await;
    get_mock.assert_async().await;
}

#[tokio::test]
async fn invalid_items_are_not_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex("^/collections/a-collection/items".to_string()))
        .expect(0)
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let items = Items {
        datetime: Some("2024-01-01T00:00:00Z/2023-01-01T00:00:00Z".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        client.items("a-collection", Some(items), None),
        Err(Error::StartIsAfterEnd(_, _))
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn relative_next_link_ends_iteration() {
    let mut server = Server::new_async().await;
    let next = json!({"href": "/search?token=page-2", "rel": "next"});
    let _ = server
        .mock("POST", "/search")
        .with_body(page(&["item-a"], Some(next)))
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let results: Vec<_> = client.search(Search::new(), None).unwrap().collect().await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap()["id"], "item-a");
    assert!(matches!(results[1], Err(Error::Pagination(_))));
}

#[tokio::test]
async fn search_get() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("collections".to_string(), "a,b".to_string()),
            Matcher::UrlEncoded("limit".to_string(), "5".to_string()),
        ]))
        .with_body(page(&["item-a"], None))
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let search = Search::new().collections(vec!["a".to_string(), "b".to_string()]);
    let items: Vec<_> = client
        .search_get(search, Some(5))
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn user_agent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_header(
            "user-agent",
            format!("rustac/{}", stac_api::version()).as_str(),
        )
        .with_body(page(&[], None))
        .create_async()
        .await;
    let client = Client::new(&server.url()).unwrap();
    let _: Vec<_> = client.search(Search::new(), None).unwrap().collect().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn search_function() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_body(Matcher::Json(json!({"limit": 1})))
        .with_body(page(&["item-a"], None))
        .create_async()
        .await;
    let item_collection = stac_api::search(&server.url(), Search::new(), Some(1))
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(item_collection.items.len(), 1);
    assert_eq!(item_collection.number_returned, Some(1));
}

#[tokio::test]
async fn search_client_item() {
    let mut server = Server::new_async().await;
    let _ = server
        .mock("POST", "/search")
        .match_body(Matcher::Json(json!({
            "ids": ["item-a"],
            "collections": ["a-collection"]
        })))
        .with_body(page(&["item-a"], None))
        .create_async()
        .await;
    let client = Client::new(&server.url()).unwrap();
    let item = client.item("a-collection", "item-a").await.unwrap().unwrap();
    assert_eq!(item.id, "item-a");
}

#[tokio::test]
async fn search_client_returns_one_page() {
    let mut server = Server::new_async().await;
    let next = json!({
        "href": format!("{}/search?token=page-2", server.url()),
        "rel": "next"
    });
    let _ = server
        .mock("POST", "/search")
        .with_body(page(&["item-a", "item-b"], Some(next)))
        .create_async()
        .await;
    let client = Client::new(&server.url()).unwrap();
    let item_collection = SearchClient::search(&client, Search::new()).await.unwrap();
    assert_eq!(ids(&item_collection.items), vec!["item-a", "item-b"]);
}

#[test]
fn blocking_client() {
    let mut server = Server::new();
    let next = json!({
        "href": format!("{}/search?token=page-2", server.url()),
        "rel": "next"
    });
    let _ = server
        .mock("POST", "/search")
        .with_body(page(&["item-a"], Some(next)))
        .create();
    let _ = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("token".to_string(), "page-2".to_string()))
        .with_body(page(&["item-b"], None))
        .create();

    let client = BlockingClient::new(&server.url()).unwrap();
    let items: Vec<_> = client
        .search(Search::new(), None)
        .unwrap()
        .collect::<stac_api::Result<_>>()
        .unwrap();
    assert_eq!(ids(&items), vec!["item-a", "item-b"]);
}
