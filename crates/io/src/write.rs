use crate::{Error, Format, Result, Writeable};
use std::path::Path;

/// Writes a STAC value to a path.
///
/// The format will be inferred from the path's extension. If you want to
/// specify the format, use [Format::write].
///
/// # Examples
///
/// ```no_run
/// use stac::Item;
///
/// let item = Item::new("an-id");
/// stac_io::write("an-id.json", item).unwrap();
/// ```
pub fn write<T: Writeable>(path: impl AsRef<Path>, value: T) -> Result<()> {
    let path = path.as_ref();
    let href = path
        .to_str()
        .ok_or_else(|| Error::UnknownFormat(path.to_string_lossy().into_owned()))?;
    Format::infer_from_href(href)?.write(path, value)
}
