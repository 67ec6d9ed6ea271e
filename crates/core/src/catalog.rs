use crate::{Fields, Href, Link, Links, SelfHref, Version};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The type field for [Catalogs](Catalog).
pub const CATALOG_TYPE: &str = "Catalog";

/// A STAC Catalog object represents a logical group of other `Catalog`,
/// [Collection](crate::Collection), and [Item](crate::Item) objects.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Catalog {
    /// Set to `"Catalog"` if this Catalog only implements the Catalog spec.
    #[serde(
        deserialize_with = "deserialize_type",
        default = "default_type"
    )]
    pub r#type: String,

    /// The STAC version the `Catalog` implements.
    #[serde(rename = "stac_version", default)]
    pub version: Version,

    /// A list of extension identifiers the `Catalog` implements.
    #[serde(
        rename = "stac_extensions",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub extensions: Vec<String>,

    /// Identifier for the `Catalog`.
    pub id: String,

    /// A short descriptive one-line title for the `Catalog`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed multi-line description to fully explain the `Catalog`.
    pub description: String,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Additional fields not part of the Catalog specification.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,

    #[serde(skip)]
    self_href: Option<Href>,
}

impl Catalog {
    /// Creates a new `Catalog` with the given `id` and `description`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Catalog;
    ///
    /// let catalog = Catalog::new("an-id", "a description");
    /// assert_eq!(catalog.id, "an-id");
    /// assert_eq!(catalog.description, "a description");
    /// ```
    pub fn new(id: impl ToString, description: impl ToString) -> Catalog {
        Catalog {
            r#type: default_type(),
            version: Version::default(),
            extensions: Vec::new(),
            id: id.to_string(),
            title: None,
            description: description.to_string(),
            links: Vec::new(),
            additional_fields: Map::new(),
            self_href: None,
        }
    }
}

impl SelfHref for Catalog {
    fn self_href(&self) -> Option<&Href> {
        self.self_href.as_ref()
    }

    fn self_href_mut(&mut self) -> &mut Option<Href> {
        &mut self.self_href
    }
}

impl Links for Catalog {
    fn links(&self) -> &[Link] {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Vec<Link> {
        &mut self.links
    }
}

impl Fields for Catalog {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }

    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}

fn default_type() -> String {
    CATALOG_TYPE.to_string()
}

fn deserialize_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    crate::value::deserialize_type(deserializer, CATALOG_TYPE)
}

#[cfg(test)]
mod tests {
    use super::Catalog;

    #[test]
    fn read() {
        let catalog: Catalog = crate::read("data/catalog.json");
        assert_eq!(catalog.id, "examples");
        assert_eq!(catalog.links.len(), 3);
    }

    #[test]
    fn skip_empty_extensions() {
        let value = serde_json::to_value(Catalog::new("an-id", "a description")).unwrap();
        assert!(value.get("stac_extensions").is_none());
        assert!(value.get("title").is_none());
    }
}
