use crate::{Format, Result, Writeable, location::Location};
use bytes::Bytes;
use object_store::PutResult;

/// Puts a value to an href, which may point into an object store.
///
/// # Examples
///
/// ```no_run
/// use stac::Item;
///
/// #[cfg(feature = "store-aws")]
/// {
/// let item = Item::new("an-item");
/// # tokio_test::block_on(async {
///     stac_io::put("s3://bucket/an-item.json", item).await.unwrap();
/// # })
/// }
/// ```
pub async fn put<T>(href: impl ToString, value: T) -> Result<Option<PutResult>>
where
    T: Writeable,
{
    let options: [(&str, &str); 0] = [];
    put_opts(href, value, options).await
}

/// Puts a value to an href with object store options.
///
/// The format is inferred from the href's extension. Local writes return
/// `None`, object store writes return the store's [PutResult].
///
/// # Examples
///
/// ```no_run
/// use stac::Item;
///
/// #[cfg(feature = "store-aws")]
/// {
/// let item = Item::new("an-item");
/// # tokio_test::block_on(async {
///     stac_io::put_opts("s3://bucket/an-item.json", item, [("aws_access_key_id", "...")]).await.unwrap();
/// # })
/// }
/// ```
pub async fn put_opts<T, I, K, V>(
    href: impl ToString,
    value: T,
    options: I,
) -> Result<Option<PutResult>>
where
    T: Writeable,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let href = href.to_string();
    let format = Format::infer_from_href(&href)?;
    format.put_opts(href, value, options).await
}

/// Puts raw bytes to an href.
pub async fn put_bytes_opts<I, K, V>(
    href: impl ToString,
    bytes: impl Into<Bytes>,
    options: I,
) -> Result<Option<PutResult>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let href = href.to_string();
    let bytes: Bytes = bytes.into();
    match Location::from(href.as_str()) {
        Location::Url(url) => {
            let (store, path) = super::parse_url_opts(&url, options)?;
            let put_result = store.put_bytes(path, bytes).await?;
            Ok(Some(put_result))
        }
        Location::Path(path) => {
            tracing::debug!("writing {}", path.display());
            tokio::fs::write(&path, bytes).await?;
            Ok(None)
        }
    }
}

impl Format {
    /// Puts a value in this format to an href with object store options.
    pub async fn put_opts<T, I, K, V>(
        &self,
        href: impl ToString,
        value: T,
        options: I,
    ) -> Result<Option<PutResult>>
    where
        T: Writeable,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let bytes = self.into_vec(value)?;
        put_bytes_opts(href, bytes, options).await
    }
}
