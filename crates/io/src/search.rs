use crate::{Format, Result};
use stac_api::Search;

/// Searches a STAC API and writes every matching item to an href.
///
/// The output format is inferred from `outfile`, which can be a local path or
/// an object store url configured with `options`. Returns the number of items
/// written.
///
/// Items are written as the server returned them, so a search that excludes
/// fields can still be written to JSON or newline-delimited JSON.
///
/// # Examples
///
/// ```no_run
/// use stac_api::Search;
///
/// # tokio_test::block_on(async {
/// let options: [(&str, &str); 0] = [];
/// let count = stac_io::search_to(
///     "items.parquet",
///     "https://planetarycomputer.microsoft.com/api/stac/v1",
///     Search::new().collections(vec!["naip".to_string()]),
///     Some(10),
///     options,
/// )
/// .await
/// .unwrap();
/// # })
/// ```
pub async fn search_to<I, K, V>(
    outfile: impl ToString,
    href: &str,
    search: Search,
    max_items: Option<usize>,
    options: I,
) -> Result<usize>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let outfile = outfile.to_string();
    let format = Format::infer_from_href(&outfile)?;
    let item_collection = stac_api::search(href, search, max_items).await?;
    let count = item_collection.items.len();
    tracing::debug!("writing {count} item(s) to {outfile} as {format}");
    let value = serde_json::to_value(item_collection)?;
    let _ = format.put_opts(outfile, value, options).await?;
    Ok(count)
}
