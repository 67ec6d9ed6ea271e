use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    convert::Infallible,
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Include/exclude fields from item collections.
///
/// By default, STAC API endpoints that return Item objects return every field
/// of those Items. The [fields
/// extension](https://github.com/stac-api-extensions/fields) lets clients
/// ask for less. Filtering happens on the server.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Fields {
    /// Fields to include.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub include: Vec<String>,

    /// Fields to exclude.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exclude: Vec<String>,
}

impl Fields {
    /// Returns an error if both include and exclude are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_api::Fields;
    ///
    /// let fields: Fields = "id,properties".parse().unwrap();
    /// let fields = fields.valid().unwrap();
    /// let fields: Fields = "id,-geometry".parse().unwrap();
    /// assert!(fields.valid().is_err());
    /// ```
    pub fn valid(self) -> Result<Fields> {
        if !self.include.is_empty() && !self.exclude.is_empty() {
            Err(Error::FieldsHasIncludeAndExclude(self))
        } else {
            Ok(self)
        }
    }
}

impl FromStr for Fields {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for field in s.split(',').filter(|s| !s.is_empty()) {
            if let Some(field) = field.strip_prefix('-') {
                exclude.push(field.to_string());
            } else if let Some(field) = field.strip_prefix('+') {
                include.push(field.to_string());
            } else {
                include.push(field.to_string());
            }
        }
        Ok(Fields { include, exclude })
    }
}

impl Display for Fields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<_> = self
            .include
            .iter()
            .cloned()
            .chain(self.exclude.iter().map(|field| format!("-{field}")))
            .collect();
        write!(f, "{}", fields.join(","))
    }
}
