use crate::{Error, Result};
use cql2::Expr;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{convert::Infallible, str::FromStr};

/// A CQL2 filter expression, tagged with its language.
///
/// Filters are sent to the server as-is. They are never evaluated locally.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "filter-lang", content = "filter")]
pub enum Filter {
    /// `cql2-text`
    #[serde(rename = "cql2-text")]
    Cql2Text(String),

    /// `cql2-json`
    #[serde(rename = "cql2-json")]
    Cql2Json(Map<String, Value>),
}

impl Filter {
    /// Converts this filter to cql2-json.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_api::Filter;
    ///
    /// let filter = Filter::Cql2Text("collection = 'landsat'".to_string())
    ///     .into_cql2_json()
    ///     .unwrap();
    /// assert!(matches!(filter, Filter::Cql2Json(_)));
    /// ```
    pub fn into_cql2_json(self) -> Result<Filter> {
        match self {
            Filter::Cql2Json(_) => Ok(self),
            Filter::Cql2Text(text) => {
                let expr = cql2::parse_text(&text).map_err(Box::new)?;
                Ok(Filter::Cql2Json(serde_json::from_value(
                    serde_json::to_value(expr)?,
                )?))
            }
        }
    }

    /// Converts this filter to cql2-text.
    pub fn into_cql2_text(self) -> Result<Filter> {
        match self {
            Filter::Cql2Text(_) => Ok(self),
            Filter::Cql2Json(json) => {
                let expr: Expr = serde_json::from_value(Value::Object(json))?;
                Ok(Filter::Cql2Text(expr.to_text().map_err(Box::new)?))
            }
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::Cql2Json(Default::default())
    }
}

impl FromStr for Filter {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Filter::Cql2Text(s.to_string()))
    }
}

impl TryFrom<Filter> for Expr {
    type Error = Error;

    fn try_from(value: Filter) -> Result<Self> {
        match value {
            Filter::Cql2Json(json) => {
                serde_json::from_value(Value::Object(json)).map_err(Error::from)
            }
            Filter::Cql2Text(text) => cql2::parse_text(&text).map_err(|e| Error::from(Box::new(e))),
        }
    }
}
