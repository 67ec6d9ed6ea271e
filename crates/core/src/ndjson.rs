use crate::{Catalog, Collection, Error, FromJson, Item, ItemCollection, Result, Value};
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use std::io::Write;

/// Create a STAC object from newline-delimited JSON.
pub trait FromNdjson: FromJson {
    /// Creates a STAC object from ndjson bytes.
    ///
    /// Single objects are read from the first non-empty line.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::{fs::File, io::Read};
    /// use stac::{ItemCollection, FromNdjson};
    ///
    /// let mut buf = Vec::new();
    /// File::open("data/items.ndjson").unwrap().read_to_end(&mut buf).unwrap();
    /// let item_collection = ItemCollection::from_ndjson_bytes(buf).unwrap();
    /// ```
    fn from_ndjson_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        let mut values = from_lines::<Self>(&bytes.into())?;
        if values.is_empty() {
            Err(Error::NoItems)
        } else {
            Ok(values.swap_remove(0))
        }
    }
}

/// Write a STAC object to newline-delimited JSON.
pub trait ToNdjson: Serialize {
    /// Writes a value to a writer as newline-delimited JSON.
    ///
    /// Every line, including the last, is terminated with `\n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{ToNdjson, ItemCollection, Item};
    ///
    /// let item_collection: ItemCollection = vec![Item::new("a"), Item::new("b")].into();
    /// let mut buf = Vec::new();
    /// item_collection.to_ndjson_writer(&mut buf).unwrap();
    /// assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 2);
    /// ```
    fn to_ndjson_writer(&self, mut writer: impl Write) -> Result<()> {
        serde_json::to_writer(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Writes a value as newline-delimited JSON bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{ToNdjson, Item, ItemCollection};
    ///
    /// let item_collection: ItemCollection = vec![Item::new("a"), Item::new("b")].into();
    /// let bytes = item_collection.to_ndjson_vec().unwrap();
    /// ```
    fn to_ndjson_vec(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.to_ndjson_writer(&mut buf)?;
        Ok(buf)
    }
}

/// Decodes every non-empty line, reporting failures with their 1-based line number.
fn from_lines<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
        .map(|(i, line)| {
            serde_json::from_slice::<T>(line)
                .map_err(|err| Error::codec(format!("line {}", i + 1), err))
        })
        .collect()
}

impl FromNdjson for Item {}
impl FromNdjson for Catalog {}
impl FromNdjson for Collection {}

impl FromNdjson for ItemCollection {
    fn from_ndjson_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        from_lines::<Item>(&bytes.into()).map(ItemCollection::from)
    }
}

impl FromNdjson for Value {
    fn from_ndjson_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        let values = from_lines::<Value>(&bytes.into())?;
        vec_into_value(values)
    }
}

/// Collapses decoded values: one value stays itself, anything else must be
/// items and becomes an item collection.
pub(crate) fn vec_into_value(mut values: Vec<Value>) -> Result<Value> {
    if values.len() == 1 {
        Ok(values.swap_remove(0))
    } else {
        Ok(ItemCollection::from(
            values
                .into_iter()
                .map(Item::try_from)
                .collect::<Result<Vec<_>>>()?,
        )
        .into())
    }
}

impl ToNdjson for Item {}
impl ToNdjson for Catalog {}
impl ToNdjson for Collection {}

impl ToNdjson for ItemCollection {
    fn to_ndjson_writer(&self, mut writer: impl Write) -> Result<()> {
        for item in &self.items {
            item.to_ndjson_writer(&mut writer)?;
        }
        Ok(())
    }
}

impl ToNdjson for Value {
    fn to_ndjson_writer(&self, writer: impl Write) -> Result<()> {
        match self {
            Value::Item(item) => item.to_ndjson_writer(writer),
            Value::Catalog(catalog) => catalog.to_ndjson_writer(writer),
            Value::Collection(collection) => collection.to_ndjson_writer(writer),
            Value::ItemCollection(item_collection) => item_collection.to_ndjson_writer(writer),
        }
    }
}

impl ToNdjson for serde_json::Value {
    fn to_ndjson_writer(&self, mut writer: impl Write) -> Result<()> {
        if let Some(features) = self
            .as_object()
            .filter(|object| {
                object.get("type").and_then(|t| t.as_str()) == Some(crate::ITEM_COLLECTION_TYPE)
            })
            .and_then(|object| object.get("features"))
            .and_then(|features| features.as_array())
        {
            let writer: &mut dyn Write = &mut writer;
            for feature in features {
                feature.to_ndjson_writer(&mut *writer)?;
            }
            Ok(())
        } else {
            serde_json::to_writer(&mut writer, self)?;
            writer.write_all(b"\n")?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FromNdjson, ToNdjson};
    use crate::{Error, Item, ItemCollection, Value};
    use std::{fs::File, io::Read};

    fn items_ndjson() -> Vec<u8> {
        let mut buf = Vec::new();
        let _ = File::open("data/items.ndjson")
            .unwrap()
            .read_to_end(&mut buf)
            .unwrap();
        buf
    }

    #[test]
    fn item_collection_from_bytes() {
        let item_collection = ItemCollection::from_ndjson_bytes(items_ndjson()).unwrap();
        assert_eq!(item_collection.items.len(), 2);
    }

    #[test]
    fn value_from_bytes() {
        let value = Value::from_ndjson_bytes(items_ndjson()).unwrap();
        assert!(value.is_item_collection());
    }

    #[test]
    fn preserves_order_and_count() {
        let items: Vec<Item> = (0..5).map(|i| Item::new(format!("item-{i}"))).collect();
        let bytes = ItemCollection::from(items.clone()).to_ndjson_vec().unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));
        let item_collection = ItemCollection::from_ndjson_bytes(bytes).unwrap();
        assert_eq!(item_collection.items, items);
    }

    #[test]
    fn malformed_line_number() {
        let mut bytes = Item::new("a").to_ndjson_vec().unwrap();
        bytes.extend_from_slice(b"\n");
        bytes.extend_from_slice(b"{\"type\": \"Feature\", oops}\n");
        let err = ItemCollection::from_ndjson_bytes(bytes).unwrap_err();
        match err {
            Error::Codec { location, .. } => assert_eq!(location, "line 3"),
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn feature_collection_json_value_writes_lines() {
        let value = serde_json::to_value(ItemCollection::from(vec![Item::new("a"), Item::new("b")]))
            .unwrap();
        let bytes = value.to_ndjson_vec().unwrap();
        assert_eq!(bytes.split(|b| *b == b'\n').filter(|l| !l.is_empty()).count(), 2);
    }
}
