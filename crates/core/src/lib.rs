//! Rust implementation of the [SpatioTemporal Asset Catalog (STAC)](https://stacspec.org/) data model.
//!
//! This crate holds the object model, the version migration engine, and the
//! JSON, newline-delimited JSON, and (with the `geoparquet` feature)
//! [stac-geoparquet](https://github.com/stac-utils/stac-geoparquet) codecs.
//!
//! # Data structures
//!
//! Each of the three core STAC objects and the item collection has its own
//! structure:
//!
//! - [Catalog]
//! - [Collection]
//! - [Item]
//! - [ItemCollection]
//!
//! [Value] can be any of them, and is dispatched on the `type` field:
//!
//! ```
//! use stac::Value;
//!
//! let value: Value = serde_json::from_str(r#"{
//!     "type": "Catalog",
//!     "stac_version": "1.1.0",
//!     "id": "an-id",
//!     "description": "a description",
//!     "links": []
//! }"#).unwrap();
//! assert!(value.is_catalog());
//! ```
//!
//! # Migration
//!
//! Objects move forward between STAC versions with [Migrate]:
//!
//! ```
//! use stac::{Item, Migrate, Version};
//!
//! let mut item = Item::new("an-id");
//! item.version = Version::v1_0_0;
//! let item = item.migrate(&Version::v1_1_0).unwrap();
//! assert_eq!(item.version, Version::v1_1_0);
//! ```
//!
//! # Features
//!
//! - `geoarrow`: convert [ItemCollection]s to and from arrow record batches
//! - `geoparquet`: read and write [stac-geoparquet](https://github.com/stac-utils/stac-geoparquet)
//! - `geoparquet-compression`: enable parquet compression codecs

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
    rust_2021_incompatible_closure_captures,
    rust_2021_incompatible_or_patterns,
    rust_2021_prefixes_incompatible_syntax,
    rust_2021_prelude_collisions,
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

mod asset;
mod bbox;
mod catalog;
mod collection;
mod error;
mod fields;
#[cfg(feature = "geoarrow")]
pub mod geoarrow;
#[cfg(feature = "geoparquet")]
pub mod geoparquet;
pub mod href;
mod item;
mod item_collection;
mod json;
mod link;
pub mod migrate;
mod ndjson;
mod value;
mod version;

#[cfg(feature = "geoparquet")]
pub use geoparquet::{FromGeoparquet, IntoGeoparquet};
pub use {
    asset::{Asset, Assets},
    bbox::Bbox,
    catalog::{CATALOG_TYPE, Catalog},
    collection::{COLLECTION_TYPE, Collection, Extent, Provider, SpatialExtent, TemporalExtent},
    error::Error,
    fields::Fields,
    href::{Href, SelfHref},
    item::{ITEM_TYPE, Item, Properties},
    item_collection::{ITEM_COLLECTION_TYPE, ItemCollection},
    json::{FromJson, ToJson},
    link::{Link, Links},
    migrate::{Migrate, migrate_value},
    ndjson::{FromNdjson, ToNdjson},
    value::{Type, Value},
    version::Version,
};

/// The default STAC version of this library.
pub const STAC_VERSION: Version = Version::v1_1_0;

/// Media type for JSON.
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// Media type for GeoJSON.
pub const MEDIA_TYPE_GEOJSON: &str = "application/geo+json";

/// Media type for newline-delimited GeoJSON.
pub const MEDIA_TYPE_GEOJSON_SEQ: &str = "application/geo+json-seq";

/// Media type for (geo)parquet.
pub const MEDIA_TYPE_PARQUET: &str = "application/vnd.apache.parquet";

/// Custom [Result](std::result::Result) type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns true if this media type is some flavor of JSON.
///
/// # Examples
///
/// ```
/// assert!(stac::is_json_media_type("application/geo+json"));
/// assert!(stac::is_json_media_type("application/json; charset=utf-8"));
/// assert!(!stac::is_json_media_type("image/tiff"));
/// ```
pub fn is_json_media_type(media_type: &str) -> bool {
    media_type.parse::<mime::Mime>().is_ok_and(|mime| {
        mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
    })
}

#[cfg(test)]
pub(crate) fn read<T: FromJson + SelfHref>(path: &str) -> T {
    let bytes = std::fs::read(path).unwrap();
    let mut value = T::from_json_slice(&bytes).unwrap();
    value.set_self_href(path);
    value
}
