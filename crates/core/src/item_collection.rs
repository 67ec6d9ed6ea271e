use crate::{Error, Href, Item, Link, Links, Result, SelfHref};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::{ops::Deref, vec::IntoIter};

/// The type field for [ItemCollections](ItemCollection).
pub const ITEM_COLLECTION_TYPE: &str = "FeatureCollection";

/// A [GeoJSON FeatureCollection](https://www.rfc-editor.org/rfc/rfc7946#page-12) of items.
///
/// While not part of the STAC specification, ItemCollections are often used to
/// store many items in a single file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItemCollection {
    #[serde(
        deserialize_with = "deserialize_type",
        default = "default_type"
    )]
    r#type: String,

    /// The list of [Items](Item).
    ///
    /// The attribute is actually "features", but we rename to "items".
    #[serde(rename = "features")]
    pub items: Vec<Item>,

    /// List of link objects to resources and related URLs.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub links: Vec<Link>,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,

    #[serde(skip)]
    self_href: Option<Href>,
}

impl From<Vec<Item>> for ItemCollection {
    fn from(items: Vec<Item>) -> Self {
        ItemCollection {
            r#type: default_type(),
            items,
            links: Vec::new(),
            additional_fields: Map::new(),
            self_href: None,
        }
    }
}

impl Default for ItemCollection {
    fn default() -> Self {
        Vec::new().into()
    }
}

impl FromIterator<Item> for ItemCollection {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl IntoIterator for ItemCollection {
    type IntoIter = IntoIter<Item>;
    type Item = Item;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl Deref for ItemCollection {
    type Target = Vec<Item>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl SelfHref for ItemCollection {
    fn self_href(&self) -> Option<&Href> {
        self.self_href.as_ref()
    }

    fn self_href_mut(&mut self) -> &mut Option<Href> {
        &mut self.self_href
    }
}

impl Links for ItemCollection {
    fn links(&self) -> &[Link] {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Vec<Link> {
        &mut self.links
    }
}

impl TryFrom<Value> for ItemCollection {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(Error::from)
    }
}

fn default_type() -> String {
    ITEM_COLLECTION_TYPE.to_string()
}

fn deserialize_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    crate::value::deserialize_type(deserializer, ITEM_COLLECTION_TYPE)
}

#[cfg(test)]
mod tests {
    use super::ItemCollection;
    use crate::Item;

    #[test]
    fn item_collection_from_vec() {
        let items = vec![Item::new("a"), Item::new("b")];
        let item_collection = ItemCollection::from(items);
        assert_eq!(item_collection.len(), 2);
    }

    #[test]
    fn serialize_type_field() {
        let item_collection = ItemCollection::from(vec![]);
        let value = serde_json::to_value(item_collection).unwrap();
        assert_eq!(value.as_object().unwrap()["type"], "FeatureCollection");
        assert_eq!(value.as_object().unwrap()["features"], serde_json::json!([]));
    }

    #[test]
    fn read() {
        let item_collection: ItemCollection = crate::read("data/item-collection.json");
        assert_eq!(item_collection.items.len(), 2);
    }
}
