use stac::Href;
use std::path::PathBuf;
use url::Url;

/// Where an href points: the local filesystem or somewhere with a url scheme.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Location {
    Path(PathBuf),
    Url(Url),
}

impl From<Href> for Location {
    fn from(href: Href) -> Location {
        match href {
            Href::Url(url) => match url.scheme() {
                "file" => url
                    .to_file_path()
                    .map(Location::Path)
                    .unwrap_or_else(|_| Location::Url(url)),
                _ => Location::Url(url),
            },
            Href::String(s) => Location::Path(PathBuf::from(s)),
        }
    }
}

impl From<&str> for Location {
    fn from(href: &str) -> Location {
        Href::from(href).into()
    }
}
