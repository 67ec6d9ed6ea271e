use std::str::FromStr;
use url::{ParseError, Url};

/// Builds urls on a root url.
///
/// Urls are resolved against the root, so the root always gets a trailing
/// slash.
///
/// # Examples
///
/// ```
/// # use stac_api::UrlBuilder;
/// let url_builder = UrlBuilder::new("http://stac-api-rs.test/api/v1").unwrap();
/// assert_eq!(
///     url_builder.items("an-id").unwrap().as_str(),
///     "http://stac-api-rs.test/api/v1/collections/an-id/items"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct UrlBuilder {
    root: Url,
    collections: Url,
    collections_with_slash: Url,
    search: Url,
}

impl UrlBuilder {
    /// Creates a new url builder.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stac_api::UrlBuilder;
    /// let url_builder = UrlBuilder::new("http://stac-api-rs.test").unwrap();
    /// ```
    pub fn new(url: &str) -> Result<UrlBuilder, ParseError> {
        let root: Url = if url.ends_with('/') {
            url.parse()?
        } else {
            format!("{url}/").parse()?
        };
        Ok(UrlBuilder {
            collections: root.join("collections")?,
            collections_with_slash: root.join("collections/")?,
            search: root.join("search")?,
            root,
        })
    }

    /// Returns the root url.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Returns the collections url.
    pub fn collections(&self) -> &Url {
        &self.collections
    }

    /// Returns a collection url.
    pub fn collection(&self, id: &str) -> Result<Url, ParseError> {
        self.collections_with_slash.join(id)
    }

    /// Returns the items url for a collection.
    pub fn items(&self, id: &str) -> Result<Url, ParseError> {
        self.collections_with_slash.join(&format!("{id}/items"))
    }

    /// Returns an item url.
    pub fn item(&self, collection_id: &str, id: &str) -> Result<Url, ParseError> {
        self.collections_with_slash
            .join(&format!("{collection_id}/items/{id}"))
    }

    /// Returns the search url.
    pub fn search(&self) -> &Url {
        &self.search
    }
}

impl FromStr for UrlBuilder {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UrlBuilder::new(s)
    }
}
