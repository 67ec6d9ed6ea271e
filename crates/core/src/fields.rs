use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Get and set additional, non-core fields on a STAC object.
///
/// For an [Item](crate::Item) these are the fields in `properties`, for
/// everything else they are the unknown top-level keys.
///
/// # Examples
///
/// ```
/// use stac::{Fields, Item};
///
/// let mut item = Item::new("an-id");
/// let _ = item.set_field("eo:cloud_cover", 42).unwrap();
/// assert_eq!(item.field("eo:cloud_cover").unwrap(), 42);
/// ```
pub trait Fields {
    /// Gets the fields value.
    fn fields(&self) -> &Map<String, Value>;

    /// Gets a mutable reference to the fields value.
    fn fields_mut(&mut self) -> &mut Map<String, Value>;

    /// Gets the value of a field.
    fn field(&self, key: &str) -> Option<&Value> {
        self.fields().get(key)
    }

    /// Sets the value of a field, returning the previous one.
    fn set_field<S: Serialize>(&mut self, key: impl ToString, value: S) -> Result<Option<Value>> {
        let value = serde_json::to_value(value)?;
        Ok(self.fields_mut().insert(key.to_string(), value))
    }

    /// Removes a field and deserializes it.
    fn remove_field<D: DeserializeOwned>(&mut self, key: &str) -> Option<D> {
        self.fields_mut()
            .remove(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Returns all fields that start with `prefix:` with the prefix stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Fields, Item};
    ///
    /// let mut item = Item::new("an-id");
    /// let _ = item.set_field("eo:cloud_cover", 42).unwrap();
    /// let eo = item.fields_with_prefix("eo");
    /// assert_eq!(eo["cloud_cover"], 42);
    /// ```
    fn fields_with_prefix(&self, prefix: &str) -> Map<String, Value> {
        self.fields()
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(prefix)
                    .and_then(|key| key.strip_prefix(':'))
                    .map(|key| (key.to_string(), value.clone()))
            })
            .collect()
    }
}

/// Converts a serde_json value into an object, or errors.
pub(crate) fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(Error::NotAnObject(value)),
    }
}
