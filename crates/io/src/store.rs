//! Read and write STAC values in object stores.
//!
//! The free functions take any href. Urls are routed to an object store built
//! by [object_store::parse_url_opts], with the options passed through as-is,
//! and everything else is read or written on the local filesystem with
//! [tokio::fs].

mod get;
mod put;

use crate::{Format, Readable, Result, Writeable};
use bytes::Bytes;
use object_store::{ObjectStore, PutResult, path::Path};
use std::sync::Arc;
use url::Url;

pub use {
    get::{get, get_bytes_opts, get_opts},
    put::{put, put_bytes_opts, put_opts},
};

/// Reads and writes STAC in an [ObjectStore].
#[derive(Debug, Clone)]
pub struct StacStore(Arc<dyn ObjectStore>);

impl StacStore {
    /// Creates a new [StacStore] from an [ObjectStore].
    ///
    /// # Examples
    ///
    /// ```
    /// use object_store::memory::InMemory;
    /// use stac_io::StacStore;
    /// use std::sync::Arc;
    ///
    /// let stac_store = StacStore::new(Arc::new(InMemory::new()));
    /// ```
    pub fn new(store: Arc<dyn ObjectStore>) -> StacStore {
        StacStore(store)
    }

    /// Gets a STAC value from the store.
    ///
    /// The format will be inferred from the path's file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use object_store::local::LocalFileSystem;
    /// use stac_io::StacStore;
    ///
    /// let store = LocalFileSystem::new_with_prefix("../core/data").unwrap();
    /// let stac_store = StacStore::from(store);
    /// # tokio_test::block_on(async {
    /// let item: stac::Item = stac_store.get("simple-item.json").await.unwrap();
    /// });
    /// ```
    pub async fn get<T: Readable>(&self, path: impl Into<Path>) -> Result<T> {
        let path = path.into();
        let format = Format::infer_from_href(path.as_ref())?;
        self.get_format(path, format).await
    }

    /// Gets a STAC value from the store in a specific format.
    pub async fn get_format<T: Readable>(
        &self,
        path: impl Into<Path>,
        format: Format,
    ) -> Result<T> {
        let bytes = self.get_bytes(path).await?;
        format.from_bytes(bytes)
    }

    /// Gets the raw bytes of an object.
    pub async fn get_bytes(&self, path: impl Into<Path>) -> Result<Bytes> {
        let path = path.into();
        tracing::debug!("getting {path} from {}", self.0);
        let get_result = self.0.get(&path).await?;
        let bytes = get_result.bytes().await?;
        Ok(bytes)
    }

    /// Puts a STAC value to the store.
    ///
    /// The format will be inferred from the path's file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use object_store::memory::InMemory;
    /// use stac::Item;
    /// use stac_io::StacStore;
    ///
    /// let stac_store = StacStore::from(InMemory::new());
    /// # tokio_test::block_on(async {
    /// let _ = stac_store.put("an-id.json", Item::new("an-id")).await.unwrap();
    /// });
    /// ```
    pub async fn put<T: Writeable>(&self, path: impl Into<Path>, value: T) -> Result<PutResult> {
        let path = path.into();
        let format = Format::infer_from_href(path.as_ref())?;
        self.put_format(path, value, format).await
    }

    /// Puts a STAC value to the store in a specific format.
    pub async fn put_format<T: Writeable>(
        &self,
        path: impl Into<Path>,
        value: T,
        format: Format,
    ) -> Result<PutResult> {
        let bytes = format.into_vec(value)?;
        self.put_bytes(path, bytes).await
    }

    /// Puts raw bytes to the store.
    pub async fn put_bytes(
        &self,
        path: impl Into<Path>,
        bytes: impl Into<Bytes>,
    ) -> Result<PutResult> {
        let path = path.into();
        let bytes: Bytes = bytes.into();
        tracing::debug!("putting {path} to {}", self.0);
        let put_result = self.0.put(&path, bytes.into()).await?;
        Ok(put_result)
    }
}

impl<T> From<T> for StacStore
where
    T: ObjectStore,
{
    fn from(value: T) -> Self {
        StacStore(Arc::new(value))
    }
}

/// Builds a [StacStore] and an object path from a url.
///
/// The options are passed to [object_store::parse_url_opts], e.g. to
/// configure credentials or a region.
///
/// # Examples
///
/// ```
/// let url = "memory:///catalog.json".parse().unwrap();
/// let (_store, path) = stac_io::parse_url_opts(&url, [("ignored", "value")]).unwrap();
/// assert_eq!(path.as_ref(), "catalog.json");
/// ```
pub fn parse_url_opts<I, K, V>(url: &Url, options: I) -> Result<(StacStore, Path)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let (store, path) = object_store::parse_url_opts(url, options)?;
    Ok((StacStore(Arc::from(store)), path))
}

#[cfg(test)]
mod tests {
    use super::StacStore;
    use object_store::{local::LocalFileSystem, memory::InMemory};
    use stac::{Item, ItemCollection};

    #[tokio::test]
    async fn get_local() {
        let store = StacStore::from(LocalFileSystem::new_with_prefix("../core/data").unwrap());
        let item: Item = store.get("simple-item.json").await.unwrap();
        assert_eq!(item.id, "20201211_223832_CS2");
        let item_collection: ItemCollection = store.get("items.ndjson").await.unwrap();
        assert_eq!(item_collection.items.len(), 2);
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = StacStore::from(InMemory::new());
        let item_collection = ItemCollection::from(vec![Item::new("a"), Item::new("b")]);
        let _ = store.put("items.ndjson", item_collection).await.unwrap();
        let bytes = store.get_bytes("items.ndjson").await.unwrap();
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 2);
        let item_collection: ItemCollection = store.get("items.ndjson").await.unwrap();
        assert_eq!(item_collection.items[1].id, "b");
    }

    #[tokio::test]
    async fn unknown_extension() {
        let store = StacStore::from(InMemory::new());
        let _ = store.put("item.tif", Item::new("a")).await.unwrap_err();
    }
}
