use crate::{
    Catalog, Collection, Error, Href, Item, ItemCollection, Link, Links, Result, SelfHref,
    Version,
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, Unexpected},
};
use std::{fmt::Display, str::FromStr};

/// An enum that can hold any STAC object type.
///
/// Deserialization dispatches on the `type` field.
///
/// # Examples
///
/// ```
/// use stac::{Item, Value};
///
/// let value = Value::from(Item::new("an-id"));
/// let value: Value = serde_json::from_value(serde_json::to_value(value).unwrap()).unwrap();
/// assert!(value.is_item());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A STAC Item.
    Item(Item),

    /// A STAC Catalog.
    Catalog(Catalog),

    /// A STAC Collection.
    Collection(Collection),

    /// An ItemCollection.
    ItemCollection(ItemCollection),
}

/// The kinds of STAC objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// An item, `"type": "Feature"`.
    Item,

    /// A catalog.
    Catalog,

    /// A collection.
    Collection,

    /// An item collection, `"type": "FeatureCollection"`.
    ItemCollection,
}

impl Value {
    /// Returns this value's type.
    pub fn type_(&self) -> Type {
        match self {
            Value::Item(_) => Type::Item,
            Value::Catalog(_) => Type::Catalog,
            Value::Collection(_) => Type::Collection,
            Value::ItemCollection(_) => Type::ItemCollection,
        }
    }

    /// Returns this value's declared STAC version.
    ///
    /// Item collections don't have their own version, so this returns the
    /// first item's version, or `None` if the collection is empty.
    pub fn version(&self) -> Option<&Version> {
        match self {
            Value::Item(item) => Some(&item.version),
            Value::Catalog(catalog) => Some(&catalog.version),
            Value::Collection(collection) => Some(&collection.version),
            Value::ItemCollection(item_collection) => {
                item_collection.items.first().map(|item| &item.version)
            }
        }
    }

    /// Returns true if this is an item.
    pub fn is_item(&self) -> bool {
        matches!(self, Value::Item(_))
    }

    /// Returns true if this is a catalog.
    pub fn is_catalog(&self) -> bool {
        matches!(self, Value::Catalog(_))
    }

    /// Returns true if this is a collection.
    pub fn is_collection(&self) -> bool {
        matches!(self, Value::Collection(_))
    }

    /// Returns true if this is an item collection.
    pub fn is_item_collection(&self) -> bool {
        matches!(self, Value::ItemCollection(_))
    }

    /// Splits this value into a vector of values.
    ///
    /// Item collections become one value per item, everything else is a single
    /// value.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Item, ItemCollection, Value};
    ///
    /// let item_collection = ItemCollection::from(vec![Item::new("a"), Item::new("b")]);
    /// assert_eq!(Value::from(item_collection).into_values().len(), 2);
    /// ```
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Value::ItemCollection(item_collection) => {
                item_collection.items.into_iter().map(Value::Item).collect()
            }
            value => vec![value],
        }
    }
}

impl Type {
    /// Returns this type's `type` field value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Item => crate::ITEM_TYPE,
            Type::Catalog => crate::CATALOG_TYPE,
            Type::Collection => crate::COLLECTION_TYPE,
            Type::ItemCollection => crate::ITEM_COLLECTION_TYPE,
        }
    }

    /// Returns the path of this type's json-schema, relative to the schemas
    /// root, for the given version.
    ///
    /// Item collections don't have a schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Type, Version};
    ///
    /// assert_eq!(
    ///     Type::Item.spec_path(&Version::v1_1_0).unwrap(),
    ///     "/v1.1.0/item-spec/json-schema/item.json"
    /// );
    /// assert!(Type::ItemCollection.spec_path(&Version::v1_1_0).is_none());
    /// ```
    pub fn spec_path(&self, version: &Version) -> Option<String> {
        let directory = version.schema_directory();
        match self {
            Type::Item => Some(format!("/{directory}/item-spec/json-schema/item.json")),
            Type::Catalog => Some(format!("/{directory}/catalog-spec/json-schema/catalog.json")),
            Type::Collection => Some(format!(
                "/{directory}/collection-spec/json-schema/collection.json"
            )),
            Type::ItemCollection => None,
        }
    }
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Type> {
        match s {
            crate::ITEM_TYPE => Ok(Type::Item),
            crate::CATALOG_TYPE => Ok(Type::Catalog),
            crate::COLLECTION_TYPE => Ok(Type::Collection),
            crate::ITEM_COLLECTION_TYPE => Ok(Type::ItemCollection),
            _ => Err(Error::UnknownType(s.to_string())),
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Value::try_from(value).map_err(de::Error::custom)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Value> {
        let r#type: Type = value
            .as_object()
            .ok_or_else(|| Error::NotAnObject(value.clone()))?
            .get("type")
            .ok_or(Error::MissingField("type"))?
            .as_str()
            .ok_or(Error::MissingField("type"))?
            .parse()?;
        match r#type {
            Type::Item => Ok(Value::Item(serde_json::from_value(value)?)),
            Type::Catalog => Ok(Value::Catalog(serde_json::from_value(value)?)),
            Type::Collection => Ok(Value::Collection(serde_json::from_value(value)?)),
            Type::ItemCollection => Ok(Value::ItemCollection(serde_json::from_value(value)?)),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = Error;

    fn try_from(value: Value) -> Result<serde_json::Value> {
        serde_json::to_value(value).map_err(Error::from)
    }
}

macro_rules! impl_value_conversions {
    ($object:ident) => {
        impl From<$object> for Value {
            fn from(value: $object) -> Self {
                Value::$object(value)
            }
        }

        impl TryFrom<Value> for $object {
            type Error = Error;

            fn try_from(value: Value) -> Result<Self> {
                match value {
                    Value::$object(object) => Ok(object),
                    _ => Err(Error::IncorrectType {
                        actual: value.type_().to_string(),
                        expected: Type::$object.to_string(),
                    }),
                }
            }
        }
    };
}

impl_value_conversions!(Item);
impl_value_conversions!(Catalog);
impl_value_conversions!(Collection);

impl From<ItemCollection> for Value {
    fn from(value: ItemCollection) -> Self {
        Value::ItemCollection(value)
    }
}

impl TryFrom<Value> for ItemCollection {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::ItemCollection(item_collection) => Ok(item_collection),
            Value::Item(item) => Ok(ItemCollection::from(vec![item])),
            _ => Err(Error::IncorrectType {
                actual: value.type_().to_string(),
                expected: Type::ItemCollection.to_string(),
            }),
        }
    }
}

impl SelfHref for Value {
    fn self_href(&self) -> Option<&Href> {
        match self {
            Value::Item(item) => item.self_href(),
            Value::Catalog(catalog) => catalog.self_href(),
            Value::Collection(collection) => collection.self_href(),
            Value::ItemCollection(item_collection) => item_collection.self_href(),
        }
    }

    fn self_href_mut(&mut self) -> &mut Option<Href> {
        match self {
            Value::Item(item) => item.self_href_mut(),
            Value::Catalog(catalog) => catalog.self_href_mut(),
            Value::Collection(collection) => collection.self_href_mut(),
            Value::ItemCollection(item_collection) => item_collection.self_href_mut(),
        }
    }
}

impl Links for Value {
    fn links(&self) -> &[Link] {
        match self {
            Value::Item(item) => item.links(),
            Value::Catalog(catalog) => catalog.links(),
            Value::Collection(collection) => collection.links(),
            Value::ItemCollection(item_collection) => item_collection.links(),
        }
    }

    fn links_mut(&mut self) -> &mut Vec<Link> {
        match self {
            Value::Item(item) => item.links_mut(),
            Value::Catalog(catalog) => catalog.links_mut(),
            Value::Collection(collection) => collection.links_mut(),
            Value::ItemCollection(item_collection) => item_collection.links_mut(),
        }
    }
}

/// Deserializes a `type` field, erroring if it isn't the expected value.
pub(crate) fn deserialize_type<'de, D>(
    deserializer: D,
    expected: &'static str,
) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let r#type = String::deserialize(deserializer)?;
    if r#type == expected {
        Ok(r#type)
    } else {
        Err(de::Error::invalid_value(Unexpected::Str(&r#type), &expected))
    }
}

#[cfg(test)]
mod tests {
    use super::{Type, Value};
    use crate::{Catalog, Collection, Item, ItemCollection};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("data/simple-item.json", Type::Item)]
    #[case("data/catalog.json", Type::Catalog)]
    #[case("data/collection.json", Type::Collection)]
    #[case("data/item-collection.json", Type::ItemCollection)]
    fn dispatch(#[case] path: &str, #[case] expected: Type) {
        let value: Value = crate::read(path);
        assert_eq!(value.type_(), expected);
    }

    #[test]
    fn serialize_has_one_type() {
        let value = Value::from(Catalog::new("an-id", "a description"));
        let s = serde_json::to_string(&value).unwrap();
        assert_eq!(s.matches("\"type\"").count(), 1);
    }

    #[test]
    fn unknown_type() {
        let err = serde_json::from_value::<Value>(json!({"type": "Foo"})).unwrap_err();
        assert!(err.to_string().contains("Foo"));
    }

    #[test]
    fn incorrect_type() {
        let value = Value::from(Collection::new("an-id", "a description"));
        assert!(Item::try_from(value.clone()).is_err());
        assert!(ItemCollection::try_from(value).is_err());
    }
}
