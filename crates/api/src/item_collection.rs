use crate::{Item, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use stac::{ITEM_COLLECTION_TYPE, Link, Links};

fn item_collection_type() -> String {
    ITEM_COLLECTION_TYPE.to_string()
}

fn deserialize_item_collection_type<'de, D>(
    deserializer: D,
) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let r#type = String::deserialize(deserializer)?;
    if r#type != ITEM_COLLECTION_TYPE {
        Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&r#type),
            &ITEM_COLLECTION_TYPE,
        ))
    } else {
        Ok(r#type)
    }
}

/// The return value of the `/items` and `/search` endpoints.
///
/// This might be a [stac::ItemCollection], but if the [fields
/// extension](https://github.com/stac-api-extensions/fields) is used, it might
/// not be. Defined by the [itemcollection
/// fragment](https://github.com/radiantearth/stac-api-spec/blob/main/fragments/itemcollection/README.md).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCollection {
    #[serde(
        default = "item_collection_type",
        deserialize_with = "deserialize_item_collection_type"
    )]
    r#type: String,

    /// A possibly-empty array of Item objects.
    #[serde(rename = "features")]
    pub items: Vec<Item>,

    /// An array of Links related to this ItemCollection.
    #[serde(default)]
    pub links: Vec<Link>,

    /// The number of Items that meet the selection parameters, possibly estimated.
    #[serde(skip_serializing_if = "Option::is_none", rename = "numberMatched")]
    pub number_matched: Option<u64>,

    /// The number of Items in the features array.
    #[serde(skip_serializing_if = "Option::is_none", rename = "numberReturned")]
    pub number_returned: Option<u64>,

    /// The search-related metadata for the [ItemCollection].
    ///
    /// Part of the [context extension](https://github.com/stac-api-extensions/context).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// The search-related metadata for the [ItemCollection].
///
/// Part of the [context extension](https://github.com/stac-api-extensions/context).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// The count of results returned by this response. Equal to the cardinality
    /// of features array.
    pub returned: u64,

    /// The maximum number of results to which the result was limited.
    pub limit: Option<u64>,

    /// The count of total number of results that match for this query, possibly
    /// estimated, particularly in the context of NoSQL data stores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<u64>,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl ItemCollection {
    /// Creates a new [ItemCollection] from a vector of items.
    ///
    /// # Examples
    ///
    /// ```
    /// let item = serde_json::to_value(stac::Item::new("an-id")).unwrap();
    /// let item_collection = stac_api::ItemCollection::new(vec![
    ///     item.as_object().unwrap().clone()
    /// ]).unwrap();
    /// assert_eq!(item_collection.number_returned, Some(1));
    /// ```
    pub fn new(items: Vec<Item>) -> Result<ItemCollection> {
        let number_returned = items.len();
        Ok(ItemCollection {
            number_returned: Some(number_returned.try_into()?),
            ..ItemCollection::from(items)
        })
    }
}

impl Default for ItemCollection {
    fn default() -> Self {
        ItemCollection::from(Vec::new())
    }
}

impl From<Vec<Item>> for ItemCollection {
    fn from(items: Vec<Item>) -> Self {
        ItemCollection {
            r#type: item_collection_type(),
            items,
            links: Vec::new(),
            number_matched: None,
            number_returned: None,
            context: None,
            additional_fields: Map::new(),
        }
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

impl TryFrom<ItemCollection> for stac::ItemCollection {
    type Error = crate::Error;

    fn try_from(item_collection: ItemCollection) -> Result<stac::ItemCollection> {
        let items = item_collection
            .items
            .into_iter()
            .map(|item| serde_json::from_value::<stac::Item>(Value::Object(item)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(stac::ItemCollection::from(items))
    }
}

#[cfg(test)]
mod tests {
    use super::ItemCollection;
    use serde_json::json;
    use stac::Links;

    #[test]
    fn wrong_type() {
        assert!(
            serde_json::from_value::<ItemCollection>(json!({
                "type": "Feature",
                "features": []
            }))
            .is_err()
        );
    }

    #[test]
    fn next_link() {
        let item_collection: ItemCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [],
            "links": [{"href": "http://stac.test/search?token=abc", "rel": "next"}],
            "numberMatched": 42
        }))
        .unwrap();
        assert_eq!(item_collection.number_matched, Some(42));
        assert_eq!(
            item_collection.next_link().unwrap().href,
            "http://stac.test/search?token=abc"
        );
    }

    #[test]
    fn into_stac() {
        let item = serde_json::to_value(stac::Item::new("an-id")).unwrap();
        let item_collection =
            ItemCollection::new(vec![item.as_object().unwrap().clone()]).unwrap();
        let item_collection = stac::ItemCollection::try_from(item_collection).unwrap();
        assert_eq!(item_collection.items[0].id, "an-id");
    }
}
