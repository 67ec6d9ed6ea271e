use crate::{Error, Result, location::Location};
use stac::Href;
use stac_validate::Validator;

/// Reads the JSON behind an href and validates it.
///
/// The value is validated as-is, without being parsed into a STAC type
/// first, so malformed objects produce violations instead of decode errors.
/// Failures to fetch the href are returned as [Error::Get] or [Error::FromPath].
///
/// # Examples
///
/// ```
/// stac_io::validate_href("../core/data/simple-item.json").unwrap();
/// ```
pub fn validate_href(href: impl Into<Href>) -> Result<()> {
    let bytes = match Location::from(href.into()) {
        Location::Url(url) => crate::read::get_url(&url)?,
        Location::Path(path) => std::fs::read(&path)
            .map_err(|io| Error::FromPath {
                io,
                path: path.to_string_lossy().into_owned(),
            })?
            .into(),
    };
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    let mut validator = Validator::new()?;
    validator.validate_value(&value)?;
    Ok(())
}
