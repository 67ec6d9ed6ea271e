//! A STAC API client.

use crate::{Error, GetItems, GetSearch, Item, ItemCollection, Items, Result, Search, UrlBuilder};
use async_stream::try_stream;
use futures::{Stream, StreamExt, TryStreamExt};
use http::header::{HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Method, header::HeaderMap};
use serde::Serialize;
use serde_json::{Map, Value};
use stac::{Link, Links};
use std::{future::Future, pin::Pin, sync::Arc};
use tokio::runtime::{Builder, Runtime};
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("rustac/", env!("CARGO_PKG_VERSION"));

/// Searches a STAC API, collecting all items into an [ItemCollection].
///
/// If the search has no `limit` and `max_items` is set, `max_items` is used as
/// the page size.
///
/// # Examples
///
/// ```no_run
/// use stac_api::Search;
///
/// let search = Search::new().collections(vec!["sentinel-2-l2a".to_string()]);
/// # tokio_test::block_on(async {
/// let item_collection = stac_api::search(
///     "https://planetarycomputer.microsoft.com/api/stac/v1",
///     search,
///     Some(1),
/// ).await.unwrap();
/// assert_eq!(item_collection.items.len(), 1);
/// # })
/// ```
pub async fn search(
    href: &str,
    search: Search,
    max_items: Option<usize>,
) -> Result<ItemCollection> {
    let client = Client::new(href)?;
    let items: Vec<Item> = client.search(search, max_items)?.try_collect().await?;
    ItemCollection::new(items)
}

/// A client that can search for STAC items, one page at a time.
///
/// [`SearchClient::search`] is the only required method. [`SearchClient::item`]
/// and [`SearchClient::items`] have default implementations that delegate to
/// `search`.
pub trait SearchClient: Send + Sync {
    /// The error type for this client.
    type Error: Send;

    /// Searches for STAC items matching the given parameters, returning the first page.
    fn search(
        &self,
        search: Search,
    ) -> impl Future<Output = std::result::Result<ItemCollection, Self::Error>> + Send;

    /// Returns a single item from a collection.
    ///
    /// The default implementation uses [`SearchClient::search`] with `ids` and
    /// `collections` filters, then deserializes the result.
    fn item(
        &self,
        collection_id: &str,
        item_id: &str,
    ) -> impl Future<Output = std::result::Result<Option<stac::Item>, Self::Error>> + Send
    where
        Self::Error: From<Error>,
    {
        async move {
            let search = Search::default()
                .ids(vec![item_id.to_string()])
                .collections(vec![collection_id.to_string()]);
            let mut item_collection = self.search(search).await?;
            match item_collection.items.pop() {
                Some(item) if item_collection.items.is_empty() => {
                    let item: stac::Item =
                        serde_json::from_value(Value::Object(item)).map_err(Error::from)?;
                    Ok(Some(item))
                }
                _ => Ok(None),
            }
        }
    }

    /// Returns the first page of items from a collection.
    ///
    /// The default implementation converts the request to a [`Search`] scoped
    /// to the given collection and delegates to [`SearchClient::search`].
    fn items(
        &self,
        collection_id: &str,
        items: Items,
    ) -> impl Future<Output = std::result::Result<ItemCollection, Self::Error>> + Send {
        async move {
            let search = items.search_collection(collection_id);
            self.search(search).await
        }
    }
}

/// A client for interacting with STAC APIs.
///
/// Items are streamed page by page. A page is requested only when the
/// consumer asks for an item past the end of the current page, so dropping a
/// stream stops pagination at a page boundary.
#[derive(Clone, Debug)]
pub struct Client {
    client: reqwest::Client,
    url_builder: UrlBuilder,
}

/// A client for interacting with STAC APIs without async.
#[derive(Debug, Clone)]
pub struct BlockingClient {
    client: Client,
    runtime: Arc<Runtime>,
}

/// A blocking iterator over items.
pub struct BlockingIterator {
    runtime: Arc<Runtime>,
    stream: Pin<Box<dyn Stream<Item = Result<Item>>>>,
}

/// One http request of a paginated search.
#[derive(Debug, Clone)]
struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Map<String, Value>>,
}

impl Client {
    /// Creates a new API client.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stac_api::Client;
    /// let client = Client::new("https://planetarycomputer.microsoft.com/api/stac/v1").unwrap();
    /// ```
    pub fn new(url: &str) -> Result<Client> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Client::with_client(client, url)
    }

    /// Creates a new API client with the given [reqwest::Client].
    ///
    /// Use this to set timeouts, proxies, or default headers.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_api::Client;
    ///
    /// let client = reqwest::Client::new();
    /// let client = Client::with_client(client, "https://earth-search.aws.element84.com/v1/").unwrap();
    /// ```
    pub fn with_client(client: reqwest::Client, url: &str) -> Result<Client> {
        Ok(Client {
            client,
            url_builder: UrlBuilder::new(url)?,
        })
    }

    /// Returns this client's url builder.
    pub fn url_builder(&self) -> &UrlBuilder {
        &self.url_builder
    }

    /// Searches an API with a POST, returning a stream of items.
    ///
    /// Iteration stops after `max_items` items, when there is no `next` link,
    /// or when a page is empty.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stac_api::{Search, Client};
    /// use futures::StreamExt;
    ///
    /// let client = Client::new("https://planetarycomputer.microsoft.com/api/stac/v1").unwrap();
    /// let search = Search::new().collections(vec!["sentinel-2-l2a".to_string()]);
    /// # tokio_test::block_on(async {
    /// let items: Vec<_> = client
    ///     .search(search, Some(1))
    ///     .unwrap()
    ///     .map(|result| result.unwrap())
    ///     .collect()
    ///     .await;
    /// assert_eq!(items.len(), 1);
    /// # })
    /// ```
    pub fn search(
        &self,
        search: Search,
        max_items: Option<usize>,
    ) -> Result<impl Stream<Item = Result<Item>> + use<>> {
        let mut search = search.valid()?;
        set_limit(&mut search.items, max_items)?;
        let request = Request::post(self.url_builder.search().clone(), &search)?;
        Ok(stream_items(self.clone(), request, max_items))
    }

    /// Searches an API with a GET, returning a stream of items.
    pub fn search_get(
        &self,
        search: Search,
        max_items: Option<usize>,
    ) -> Result<impl Stream<Item = Result<Item>> + use<>> {
        let mut search = search.valid()?;
        set_limit(&mut search.items, max_items)?;
        let get_search = GetSearch::try_from(search)?;
        let request = Request::get(self.url_builder.search().clone(), &get_search)?;
        Ok(stream_items(self.clone(), request, max_items))
    }

    /// Returns a stream of items belonging to a collection, using the [items
    /// endpoint](https://github.com/radiantearth/stac-api-spec/tree/main/ogcapi-features#collection-items-collectionscollectioniditems).
    ///
    /// The `items` argument can be used to filter, sort, and otherwise
    /// configure the request.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stac_api::{Items, Client};
    /// use futures::StreamExt;
    ///
    /// let client = Client::new("https://planetarycomputer.microsoft.com/api/stac/v1").unwrap();
    /// # tokio_test::block_on(async {
    /// let items: Vec<_> = client
    ///     .items("sentinel-2-l2a", None, Some(1))
    ///     .unwrap()
    ///     .map(|result| result.unwrap())
    ///     .collect()
    ///     .await;
    /// assert_eq!(items.len(), 1);
    /// # })
    /// ```
    pub fn items(
        &self,
        id: &str,
        items: Option<Items>,
        max_items: Option<usize>,
    ) -> Result<impl Stream<Item = Result<Item>> + use<>> {
        let url = self.url_builder.items(id)?;
        let mut items = items.unwrap_or_default().valid()?;
        set_limit(&mut items, max_items)?;
        let get_items = GetItems::try_from(items)?;
        let request = Request::get(url, &get_items)?;
        Ok(stream_items(self.clone(), request, max_items))
    }

    async fn send(&self, request: &Request) -> Result<ItemCollection> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if request.method != Method::GET {
            if let Some(body) = request.body.as_ref() {
                builder = builder.json(body);
            }
        }
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(Error::Search {
                status: status.as_u16(),
                body,
            });
        }
        response.json().await.map_err(Error::from)
    }
}

impl SearchClient for Client {
    type Error = Error;

    async fn search(&self, search: Search) -> Result<ItemCollection> {
        let search = search.valid()?;
        let request = Request::post(self.url_builder.search().clone(), &search)?;
        self.send(&request).await
    }
}

impl BlockingClient {
    /// Creates a new blocking client.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_api::BlockingClient;
    ///
    /// let client = BlockingClient::new("https://planetarycomputer.microsoft.com/api/stac/v1").unwrap();
    /// ```
    pub fn new(url: &str) -> Result<BlockingClient> {
        Client::new(url).and_then(BlockingClient::with_client)
    }

    /// Creates a new blocking client that wraps an async one.
    pub fn with_client(client: Client) -> Result<BlockingClient> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(BlockingClient {
            client,
            runtime: Arc::new(runtime),
        })
    }

    /// Searches an API, returning an iterable of items.
    ///
    /// To prevent fetching _all_ the items (which might be a lot), it is recommended to pass a `max_items`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stac_api::{Search, BlockingClient};
    ///
    /// let client = BlockingClient::new("https://planetarycomputer.microsoft.com/api/stac/v1").unwrap();
    /// let search = Search::new().collections(vec!["sentinel-2-l2a".to_string()]);
    /// let items: Vec<_> = client
    ///     .search(search, Some(1))
    ///     .unwrap()
    ///     .map(|result| result.unwrap())
    ///     .collect();
    /// assert_eq!(items.len(), 1);
    /// ```
    pub fn search(&self, search: Search, max_items: Option<usize>) -> Result<BlockingIterator> {
        let stream = self.client.search(search, max_items)?;
        Ok(self.iter(stream))
    }

    /// Returns an iterable of items belonging to a collection.
    pub fn items(
        &self,
        id: &str,
        items: Option<Items>,
        max_items: Option<usize>,
    ) -> Result<BlockingIterator> {
        let stream = self.client.items(id, items, max_items)?;
        Ok(self.iter(stream))
    }

    fn iter(&self, stream: impl Stream<Item = Result<Item>> + 'static) -> BlockingIterator {
        BlockingIterator {
            runtime: self.runtime.clone(),
            stream: Box::pin(stream),
        }
    }
}

impl Iterator for BlockingIterator {
    type Item = Result<Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.stream.next())
    }
}

impl std::fmt::Debug for BlockingIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingIterator").finish_non_exhaustive()
    }
}

impl Request {
    fn get(mut url: Url, query: impl Serialize) -> Result<Request> {
        let query = serde_urlencoded::to_string(query)?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        Ok(Request {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    fn post(url: Url, body: impl Serialize) -> Result<Request> {
        let body = match serde_json::to_value(body)? {
            Value::Object(body) => Some(body),
            _ => None,
        };
        Ok(Request {
            method: Method::POST,
            url,
            headers: HeaderMap::new(),
            body,
        })
    }

    /// Builds the request for a `next` link.
    ///
    /// With `merge`, the link's headers and body are layered over this
    /// request's. Without it they replace them.
    fn follow(&self, link: Link) -> Result<Request> {
        let url = match Url::parse(&link.href) {
            Ok(url) if url.has_host() => url,
            _ => return Err(Error::Pagination(link.href)),
        };
        let method = match link.method.as_deref() {
            Some(method) => Method::from_bytes(method.to_ascii_uppercase().as_bytes())?,
            None => Method::GET,
        };
        let merge = link.merge.unwrap_or_default();
        let mut headers = if merge {
            self.headers.clone()
        } else {
            HeaderMap::new()
        };
        for (key, value) in link.headers.into_iter().flatten() {
            let value = match value {
                Value::String(value) => value,
                value => value.to_string(),
            };
            let _ = headers.insert(
                HeaderName::from_bytes(key.as_bytes())?,
                HeaderValue::from_str(&value)?,
            );
        }
        let body = match (merge, self.body.clone(), link.body) {
            (true, Some(mut body), Some(link_body)) => {
                body.extend(link_body);
                Some(body)
            }
            (true, body, None) => body,
            (_, _, link_body) => link_body,
        };
        Ok(Request {
            method,
            url,
            headers,
            body,
        })
    }
}

fn set_limit(items: &mut Items, max_items: Option<usize>) -> Result<()> {
    if items.limit.is_none() {
        if let Some(max_items) = max_items {
            items.limit = Some(max_items.try_into()?);
        }
    }
    Ok(())
}

fn stream_items(
    client: Client,
    request: Request,
    max_items: Option<usize>,
) -> impl Stream<Item = Result<Item>> {
    try_stream! {
        let mut request = request;
        let mut remaining = max_items;
        loop {
            if remaining == Some(0) {
                break;
            }
            tracing::debug!("fetching page: {} {}", request.method, request.url);
            let page = client.send(&request).await?;
            if page.items.is_empty() {
                break;
            }
            let next_link = page.next_link().cloned();
            for item in page.items {
                if remaining == Some(0) {
                    break;
                }
                if let Some(remaining) = remaining.as_mut() {
                    *remaining -= 1;
                }
                yield item;
            }
            if remaining == Some(0) {
                break;
            }
            let Some(next_link) = next_link else {
                break;
            };
            request = request.follow(next_link)?;
        }
    }
}
