use crate::{Asset, Assets, Bbox, Fields, Href, Link, Links, SelfHref, Version};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The type field for [Collections](Collection).
pub const COLLECTION_TYPE: &str = "Collection";

const DEFAULT_LICENSE: &str = "other";

/// The STAC `Collection` Specification defines a set of common fields to
/// describe a group of [Items](crate::Item) that share properties and metadata.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Collection {
    /// Must be set to `"Collection"` to be a valid `Collection`.
    #[serde(
        deserialize_with = "deserialize_type",
        default = "default_type"
    )]
    pub r#type: String,

    /// The STAC version the `Collection` implements.
    #[serde(rename = "stac_version", default)]
    pub version: Version,

    /// A list of extension identifiers the `Collection` implements.
    #[serde(
        rename = "stac_extensions",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub extensions: Vec<String>,

    /// Identifier for the `Collection` that is unique across the provider.
    pub id: String,

    /// A short descriptive one-line title for the `Collection`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed multi-line description to fully explain the `Collection`.
    pub description: String,

    /// List of keywords describing the `Collection`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    /// `Collection`'s license(s), either a SPDX License identifier or `"other"`.
    #[serde(default = "default_license")]
    pub license: String,

    /// A list of providers, which may include all organizations capturing or
    /// processing the data or the hosting provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<Provider>>,

    /// Spatial and temporal extents.
    pub extent: Extent,

    /// A map of property summaries, either a set of values, a range of values
    /// or a JSON Schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<Map<String, Value>>,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Dictionary of asset objects that can be downloaded, each with a unique key.
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub assets: IndexMap<String, Asset>,

    /// Additional fields not part of the `Collection` specification.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,

    #[serde(skip)]
    self_href: Option<Href>,
}

/// A provider is any of the organizations that captures or processes the
/// content of the [Collection] and therefore influences the data offered by
/// this `Collection`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Provider {
    /// The name of the organization or the individual.
    pub name: String,

    /// Multi-line description to add further provider information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Roles of the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Homepage on which the provider describes the dataset and publishes contact information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Additional fields on the provider.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// The object describes the spatio-temporal extents of the [Collection].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Extent {
    /// Spatial extents covered by the `Collection`.
    pub spatial: SpatialExtent,

    /// Temporal extents covered by the `Collection`.
    pub temporal: TemporalExtent,

    /// Additional fields on the extent.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// The object describes the spatial extents of the [Collection].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SpatialExtent {
    /// Potential spatial extents covered by the Collection.
    pub bbox: Vec<Bbox>,
}

/// The object describes the temporal extents of the [Collection].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TemporalExtent {
    /// Potential temporal extents covered by the Collection.
    pub interval: Vec<[Option<DateTime<Utc>>; 2]>,
}

impl Collection {
    /// Creates a new `Collection` with the given `id` and `description`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Collection;
    ///
    /// let collection = Collection::new("an-id", "a description");
    /// assert_eq!(collection.license, "other");
    /// ```
    pub fn new(id: impl ToString, description: impl ToString) -> Collection {
        Collection {
            r#type: default_type(),
            version: Version::default(),
            extensions: Vec::new(),
            id: id.to_string(),
            title: None,
            description: description.to_string(),
            keywords: None,
            license: default_license(),
            providers: None,
            extent: Extent::default(),
            summaries: None,
            links: Vec::new(),
            assets: IndexMap::new(),
            additional_fields: Map::new(),
            self_href: None,
        }
    }
}

impl Default for Extent {
    fn default() -> Extent {
        Extent {
            spatial: SpatialExtent {
                bbox: vec![Bbox::new(-180.0, -90.0, 180.0, 90.0)],
            },
            temporal: TemporalExtent {
                interval: vec![[None, None]],
            },
            additional_fields: Map::new(),
        }
    }
}

impl SelfHref for Collection {
    fn self_href(&self) -> Option<&Href> {
        self.self_href.as_ref()
    }

    fn self_href_mut(&mut self) -> &mut Option<Href> {
        &mut self.self_href
    }
}

impl Links for Collection {
    fn links(&self) -> &[Link] {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Vec<Link> {
        &mut self.links
    }
}

impl Assets for Collection {
    fn assets(&self) -> &IndexMap<String, Asset> {
        &self.assets
    }

    fn assets_mut(&mut self) -> &mut IndexMap<String, Asset> {
        &mut self.assets
    }
}

impl Fields for Collection {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }

    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}

fn default_type() -> String {
    COLLECTION_TYPE.to_string()
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

fn deserialize_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    crate::value::deserialize_type(deserializer, COLLECTION_TYPE)
}
