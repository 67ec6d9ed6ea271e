use crate::Fields;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An Asset is an object that contains a URI to data associated with the
/// [Item](crate::Item) that can be downloaded or streamed.
///
/// Extension fields (e.g. `bands`, `eo:cloud_cover`, `raster:scale`) live in
/// `additional_fields`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Asset {
    /// URI to the asset object.
    pub href: String,

    /// The displayed title for clients and users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// A description of the Asset providing additional details, such as how it
    /// was processed or created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Media type of the asset.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// The semantic roles of the asset.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub roles: Vec<String>,

    /// Additional fields on the asset.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// Trait implemented by anything that has assets.
pub trait Assets {
    /// Returns a reference to this object's assets.
    fn assets(&self) -> &IndexMap<String, Asset>;

    /// Returns a mutable reference to this object's assets.
    fn assets_mut(&mut self) -> &mut IndexMap<String, Asset>;
}

impl Asset {
    /// Creates a new asset with the provided href.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Asset;
    ///
    /// let asset = Asset::new("an-href");
    /// assert_eq!(asset.href, "an-href");
    /// ```
    pub fn new(href: impl ToString) -> Asset {
        Asset {
            href: href.to_string(),
            title: None,
            description: None,
            r#type: None,
            roles: Vec::new(),
            additional_fields: Map::new(),
        }
    }

    /// Adds a role to this asset, returning the modified asset.
    pub fn role(mut self, role: impl ToString) -> Asset {
        self.roles.push(role.to_string());
        self
    }
}

impl Fields for Asset {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }

    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}

impl From<String> for Asset {
    fn from(value: String) -> Self {
        Asset::new(value)
    }
}

impl From<&str> for Asset {
    fn from(value: &str) -> Self {
        Asset::new(value)
    }
}
