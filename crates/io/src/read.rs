use crate::{Format, Readable, Result};
use stac::{Href, SelfHref};

/// Reads a STAC value from an href.
///
/// The format will be inferred from the href's extension. If you want to
/// specify the format, use [Format::read].
///
/// # Examples
///
/// ```
/// let item: stac::Item = stac_io::read("../core/data/simple-item.json").unwrap();
/// ```
pub fn read<T: SelfHref + Readable>(href: impl Into<Href>) -> Result<T> {
    let href = href.into();
    let format = Format::infer_from_href(href.as_str())?;
    format.read(href)
}

/// Gets the bytes behind a url with a blocking client.
///
/// Non-success statuses are [Error::Get](crate::Error::Get).
#[cfg(feature = "reqwest")]
pub(crate) fn get_url(url: &url::Url) -> Result<bytes::Bytes> {
    tracing::debug!("getting {url}");
    let client = reqwest::blocking::Client::builder()
        .user_agent(crate::user_agent())
        .build()?;
    let response = client.get(url.as_str()).send()?;
    let status = response.status();
    if status.is_success() {
        response.bytes().map_err(crate::Error::from)
    } else {
        Err(crate::Error::Get {
            href: url.to_string(),
            message: status.to_string(),
        })
    }
}
