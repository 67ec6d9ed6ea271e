//! Utilities and structures for working with hrefs.

use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use url::Url;

/// An href, either a url or a (possibly relative) path.
///
/// # Examples
///
/// ```
/// use stac::Href;
///
/// let href = Href::from("http://stac.test/item.json");
/// assert!(href.is_url());
/// let href = Href::from("item.json");
/// assert!(!href.is_url());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Href {
    /// A parsed url.
    Url(Url),

    /// Anything that didn't parse as a url, usually a path.
    String(String),
}

/// Implemented by all STAC objects, the [SelfHref] trait allows getting
/// and setting an object's href.
///
/// Though the self href isn't part of the data structure, it is useful to know
/// where a given STAC object was read from. Objects created from scratch don't
/// have an href.
///
/// # Examples
///
/// ```
/// use stac::{Item, SelfHref};
///
/// let mut item = Item::new("an-id");
/// assert!(item.self_href().is_none());
/// item.set_self_href("./a/relative/path.json");
/// assert_eq!(item.self_href().unwrap().to_string(), "./a/relative/path.json");
/// ```
pub trait SelfHref {
    /// Gets this object's href.
    fn self_href(&self) -> Option<&Href>;

    /// Returns a mutable reference to this object's self href.
    fn self_href_mut(&mut self) -> &mut Option<Href>;

    /// Sets this object's self href.
    fn set_self_href(&mut self, href: impl Into<Href>) {
        *self.self_href_mut() = Some(href.into())
    }

    /// Clear's this object's self href.
    fn clear_self_href(&mut self) {
        *self.self_href_mut() = None
    }
}

impl Href {
    /// Returns true if this href is a url.
    pub fn is_url(&self) -> bool {
        matches!(self, Href::Url(_))
    }

    /// Returns this href as a str.
    pub fn as_str(&self) -> &str {
        match self {
            Href::Url(url) => url.as_str(),
            Href::String(s) => s.as_str(),
        }
    }
}

/// Returns `true` if the href is absolute.
///
/// An href is absolute if it can be parsed to a url or starts with a `/`.
///
/// # Examples
///
/// ```
/// assert!(stac::href::is_absolute("/an/absolute/path.json"));
/// assert!(stac::href::is_absolute("s3://bucket/item.json"));
/// assert!(!stac::href::is_absolute("./item.json"));
/// ```
pub fn is_absolute(href: &str) -> bool {
    Url::parse(href).is_ok() || href.starts_with('/')
}

impl Display for Href {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Href {
    fn from(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) => Href::Url(url),
            Err(_) => Href::String(value.to_string()),
        }
    }
}

impl From<String> for Href {
    fn from(value: String) -> Self {
        match Url::parse(&value) {
            Ok(url) => Href::Url(url),
            Err(_) => Href::String(value),
        }
    }
}

impl From<&String> for Href {
    fn from(value: &String) -> Self {
        value.as_str().into()
    }
}

impl From<Url> for Href {
    fn from(value: Url) -> Self {
        Href::Url(value)
    }
}

impl From<&Path> for Href {
    fn from(value: &Path) -> Self {
        if cfg!(target_os = "windows") {
            if let Ok(url) = Url::from_file_path(value) {
                return Href::Url(url);
            }
        }
        Href::String(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Href {
    fn from(value: PathBuf) -> Self {
        value.as_path().into()
    }
}

impl From<Href> for String {
    fn from(value: Href) -> Self {
        match value {
            Href::Url(url) => url.into(),
            Href::String(s) => s,
        }
    }
}
