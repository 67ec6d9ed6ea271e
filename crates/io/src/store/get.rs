use crate::{Error, Format, Readable, Result, location::Location};
use bytes::Bytes;
use stac::{Href, SelfHref};

/// Gets a value from an href, which may point into an object store.
///
/// # Examples
///
/// ```
/// use stac::Item;
///
/// # tokio_test::block_on(async {
/// let item: Item = stac_io::get("../core/data/simple-item.json").await.unwrap();
/// # })
/// ```
pub async fn get<T: SelfHref + Readable>(href: impl Into<Href>) -> Result<T> {
    let options: [(&str, &str); 0] = [];
    get_opts(href, options).await
}

/// Gets a value from an href with object store options.
///
/// The format is inferred from the href's extension.
///
/// # Examples
///
/// ```no_run
/// use stac::Item;
///
/// #[cfg(feature = "store-aws")]
/// {
/// # tokio_test::block_on(async {
///     let item: Item = stac_io::get_opts("s3://bucket/item.json", [("aws_access_key_id", "...")]).await.unwrap();
/// # })
/// }
/// ```
pub async fn get_opts<T, I, K, V>(href: impl Into<Href>, options: I) -> Result<T>
where
    T: SelfHref + Readable,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let href = href.into();
    let format = Format::infer_from_href(href.as_str())?;
    format.get_opts(href, options).await
}

/// Gets the raw bytes behind an href.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// let options: [(&str, &str); 0] = [];
/// let bytes = stac_io::get_bytes_opts("../core/data/simple-item.json", options).await.unwrap();
/// assert!(!bytes.is_empty());
/// # })
/// ```
pub async fn get_bytes_opts<I, K, V>(href: impl Into<Href>, options: I) -> Result<Bytes>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let (bytes, _) = fetch(href.into(), options).await?;
    Ok(bytes)
}

impl Format {
    /// Gets a value in this format from an href with object store options.
    ///
    /// Urls are fetched through [object_store::parse_url_opts]. Local paths
    /// are read with [tokio::fs]. The value's self href is set to where it was
    /// read from.
    pub async fn get_opts<T, I, K, V>(&self, href: impl Into<Href>, options: I) -> Result<T>
    where
        T: SelfHref + Readable,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let (bytes, href) = fetch(href.into(), options).await?;
        let mut value: T = self.from_bytes(bytes)?;
        value.set_self_href(href);
        Ok(value)
    }
}

/// Returns the bytes and the resolved href they came from.
async fn fetch<I, K, V>(href: Href, options: I) -> Result<(Bytes, Href)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    match Location::from(href) {
        Location::Url(url) => {
            let (store, path) = super::parse_url_opts(&url, options)?;
            let bytes = store.get_bytes(path).await?;
            Ok((bytes, url.into()))
        }
        Location::Path(path) => {
            let from_path = |io| Error::FromPath {
                io,
                path: path.to_string_lossy().into_owned(),
            };
            let path = tokio::fs::canonicalize(&path).await.map_err(from_path)?;
            tracing::debug!("reading {}", path.display());
            let bytes = tokio::fs::read(&path).await.map_err(from_path)?;
            Ok((bytes.into(), path.into()))
        }
    }
}
