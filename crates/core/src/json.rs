use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::io::Write;

/// Create a STAC object from JSON.
///
/// Decoding errors are [Error::Codec] with a `line N, column M` location.
pub trait FromJson: DeserializeOwned {
    /// Creates an object from JSON bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::{fs::File, io::Read};
    /// use stac::{Item, FromJson};
    ///
    /// let mut buf = Vec::new();
    /// File::open("data/simple-item.json").unwrap().read_to_end(&mut buf).unwrap();
    /// let item = Item::from_json_slice(&buf).unwrap();
    /// ```
    fn from_json_slice(slice: &[u8]) -> Result<Self> {
        serde_json::from_slice(slice).map_err(located)
    }
}

/// Writes a STAC object to JSON bytes.
pub trait ToJson: Serialize {
    /// Writes a value as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{ToJson, Item};
    ///
    /// let mut buf = Vec::new();
    /// Item::new("an-id").to_json_writer(&mut buf, true).unwrap();
    /// ```
    fn to_json_writer(&self, writer: impl Write, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self).map_err(Error::from)
        } else {
            serde_json::to_writer(writer, self).map_err(Error::from)
        }
    }

    /// Writes a value as JSON bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{ToJson, Item};
    ///
    /// Item::new("an-id").to_json_vec(true).unwrap();
    /// ```
    fn to_json_vec(&self, pretty: bool) -> Result<Vec<u8>> {
        if pretty {
            serde_json::to_vec_pretty(self).map_err(Error::from)
        } else {
            serde_json::to_vec(self).map_err(Error::from)
        }
    }
}

fn located(err: serde_json::Error) -> Error {
    if err.line() == 0 {
        Error::from(err)
    } else {
        Error::codec(format!("line {}, column {}", err.line(), err.column()), err)
    }
}

impl<T: DeserializeOwned> FromJson for T {}
impl<T: Serialize> ToJson for T {}

#[cfg(test)]
mod tests {
    use super::{FromJson, ToJson};
    use crate::{Item, Value};

    #[test]
    fn pretty_and_compact_decode_the_same() {
        let item = Item::new("an-id");
        let compact = item.to_json_vec(false).unwrap();
        let pretty = item.to_json_vec(true).unwrap();
        assert!(pretty.len() > compact.len());
        assert_eq!(
            Item::from_json_slice(&compact).unwrap(),
            Item::from_json_slice(&pretty).unwrap()
        );
    }

    #[test]
    fn syntax_error_location() {
        let err = Item::from_json_slice(b"{\n  \"id\": ").unwrap_err();
        assert!(
            matches!(err, crate::Error::Codec { location, .. } if location.starts_with("line 2"))
        );
    }

    #[test]
    fn feature_collection_is_a_value() {
        let bytes = std::fs::read("data/item-collection.json").unwrap();
        let value = Value::from_json_slice(&bytes).unwrap();
        assert!(value.is_item_collection());
    }
}
