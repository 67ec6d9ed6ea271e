//! Input and output for STAC values.
//!
//! Read and write local files:
//!
//! ```no_run
//! use stac::Item;
//!
//! let item: Item = stac_io::read("../core/data/simple-item.json").unwrap();
//! stac_io::write("item.json", item).unwrap();
//! ```
//!
//! The format is inferred from the href's extension (see
//! [Format::infer_from_href]), or can be given explicitly with the methods on
//! [Format].
//!
//! # Features
//!
//! - `geoparquet`: read and write [stac-geoparquet](https://github.com/stac-utils/stac-geoparquet)
//! - `reqwest`: read from http(s) urls with a blocking client
//! - `store`: async [get], [put], and their byte-level variants, backed by
//!   [object_store] for urls (`store-aws`, `store-azure`, `store-gcp`, and
//!   `store-http` enable the backends)
//! - `validate`: [validate_href]
//! - `api`: [search_to]

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    missing_debug_implementations,
    missing_docs,
    non_ascii_idents,
    noop_method_call,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

mod error;
mod format;
mod location;
mod read;
#[cfg(feature = "api")]
mod search;
#[cfg(feature = "store")]
mod store;
#[cfg(feature = "validate")]
mod validate;
mod write;

#[cfg(feature = "geoparquet")]
use stac::{FromGeoparquet, IntoGeoparquet};
use stac::{FromJson, FromNdjson, ToJson, ToNdjson};

#[cfg(feature = "api")]
pub use search::search_to;
#[cfg(feature = "store")]
pub use store::{
    StacStore, get, get_bytes_opts, get_opts, parse_url_opts, put, put_bytes_opts, put_opts,
};
#[cfg(feature = "validate")]
pub use validate::validate_href;
pub use {error::Error, format::Format, read::read, write::write};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Composite trait for all formats readable by stac-io.
#[cfg(feature = "geoparquet")]
pub trait Readable: FromJson + FromNdjson + FromGeoparquet {}
/// Composite trait for all formats readable by stac-io.
#[cfg(not(feature = "geoparquet"))]
pub trait Readable: FromJson + FromNdjson {}

#[cfg(feature = "geoparquet")]
impl<T> Readable for T where T: FromJson + FromNdjson + FromGeoparquet {}
#[cfg(not(feature = "geoparquet"))]
impl<T> Readable for T where T: FromJson + FromNdjson {}

/// Composite trait for all formats writeable by stac-io.
#[cfg(feature = "geoparquet")]
pub trait Writeable: ToJson + ToNdjson + IntoGeoparquet {}
/// Composite trait for all formats writeable by stac-io.
#[cfg(not(feature = "geoparquet"))]
pub trait Writeable: ToJson + ToNdjson {}

#[cfg(feature = "geoparquet")]
impl<T> Writeable for T where T: ToJson + ToNdjson + IntoGeoparquet {}
#[cfg(not(feature = "geoparquet"))]
impl<T> Writeable for T where T: ToJson + ToNdjson {}

/// Returns a string suitable for use as a HTTP user agent.
pub fn user_agent() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use stac::{Catalog, Collection, Item, ItemCollection, SelfHref, Value};
    use tempfile::TempDir;

    macro_rules! read {
        ($function:ident, $filename:expr_2021, $value:ty) => {
            #[test]
            fn $function() {
                let value: $value = crate::read($filename).unwrap();
                assert!(
                    value
                        .self_href()
                        .unwrap()
                        .as_str()
                        .ends_with($filename.trim_start_matches("../core/"))
                );
            }
        };
    }

    read!(read_item, "../core/data/simple-item.json", Item);
    read!(read_catalog, "../core/data/catalog.json", Catalog);
    read!(read_collection, "../core/data/collection.json", Collection);
    read!(
        read_item_collection,
        "../core/data/item-collection.json",
        ItemCollection
    );
    read!(read_ndjson, "../core/data/items.ndjson", ItemCollection);

    #[test]
    #[cfg(not(feature = "reqwest"))]
    fn read_without_reqwest() {
        assert!(matches!(
            super::read::<Item>("http://rustac.test/item.json").unwrap_err(),
            crate::Error::FeatureNotEnabled("reqwest")
        ));
    }

    #[test]
    #[cfg(feature = "reqwest")]
    fn read_from_url() {
        let mut server = mockito::Server::new();
        let item = std::fs::read("../core/data/simple-item.json").unwrap();
        let _ = server
            .mock("GET", "/item.json")
            .match_header(
                "user-agent",
                format!("stac-io/{}", env!("CARGO_PKG_VERSION")).as_str(),
            )
            .with_body(item)
            .create();
        let href = format!("{}/item.json", server.url());
        let item: Item = super::read(href.as_str()).unwrap();
        assert_eq!(item.self_href().unwrap().as_str(), href);
    }

    #[test]
    fn read_unknown_format() {
        assert!(matches!(
            super::read::<Item>("../core/data/item.tif").unwrap_err(),
            crate::Error::UnknownFormat(_)
        ));
    }

    #[test]
    fn read_missing_file() {
        assert!(matches!(
            super::read::<Item>("../core/data/not-a-file.json").unwrap_err(),
            crate::Error::FromPath { .. }
        ));
    }

    #[rstest]
    #[case("item.json")]
    #[case("item.ndjson")]
    fn write_then_read(#[case] file_name: &str) {
        let tempdir = TempDir::new().unwrap();
        let path = tempdir.path().join(file_name);
        super::write(&path, Item::new("an-id")).unwrap();
        let value: Value = super::read(path.to_str().unwrap()).unwrap();
        let item_collection = ItemCollection::try_from(value).unwrap();
        assert_eq!(item_collection.items[0].id, "an-id");
    }

    #[test]
    #[cfg(feature = "geoparquet")]
    fn write_then_read_geoparquet() {
        let tempdir = TempDir::new().unwrap();
        let path = tempdir.path().join("items.parquet");
        let item_collection = ItemCollection::from(vec![Item::new("a"), Item::new("b")]);
        super::write(&path, item_collection).unwrap();
        let item_collection: ItemCollection = super::read(path.to_str().unwrap()).unwrap();
        assert_eq!(item_collection.items.len(), 2);
    }

    #[test]
    fn write_pretty() {
        let tempdir = TempDir::new().unwrap();
        let path = tempdir.path().join("item.json");
        crate::Format::Json(true)
            .write(&path, Item::new("an-id"))
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
    }
}
