use thiserror::Error;

/// Crate-specific error enum.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [fluent_uri::error::ParseError]
    #[error(transparent)]
    FluentUriParse(#[from] fluent_uri::error::ParseError<String>),

    /// [reqwest::Error], returned when the schema client can't be built.
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// JSON is a scalar when an array or object was expected
    #[error("json value is not an object or an array")]
    ScalarJson(serde_json::Value),

    /// A schema couldn't be found, fetched, or compiled.
    #[error("could not resolve schema {uri}: {message}")]
    SchemaResolution {
        /// The schema's uri.
        uri: String,

        /// What went wrong.
        message: String,
    },

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [stac::Error]
    #[error(transparent)]
    Stac(#[from] stac::Error),

    /// A list of validation errors.
    #[error("{} validation error(s)", .0.len())]
    Validation(Vec<Violation>),
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The id of the STAC object that failed to validate.
    pub id: Option<String>,

    /// The type of the STAC object that failed to validate.
    pub r#type: Option<stac::Type>,

    /// JSON pointer to the offending value.
    ///
    /// For a missing required property, this points at where the property
    /// should be, e.g. `/id`.
    pub path: String,

    /// JSON pointer into the schema at the keyword that failed.
    pub expected: String,

    /// The offending value, as compact JSON.
    pub actual: String,

    /// Human-readable description.
    pub message: String,
}

impl Violation {
    pub(crate) fn new(
        error: &jsonschema::ValidationError<'_>,
        value: &serde_json::Value,
    ) -> Violation {
        let object = value.as_object();
        let id = object
            .and_then(|object| object.get("id"))
            .and_then(|id| id.as_str())
            .map(String::from);
        let r#type = object
            .and_then(|object| object.get("type"))
            .and_then(|r#type| r#type.as_str())
            .and_then(|r#type| r#type.parse::<stac::Type>().ok());
        let mut path = error.instance_path.to_string();
        if let jsonschema::error::ValidationErrorKind::Required { property } = &error.kind {
            if let Some(property) = property.as_str() {
                path = format!(
                    "{path}/{}",
                    property.replace('~', "~0").replace('/', "~1")
                );
            }
        }
        Violation {
            id,
            r#type,
            path,
            expected: error.schema_path.to_string(),
            actual: error.instance.to_string(),
            message: error.to_string(),
        }
    }

    /// Converts this violation into a [serde_json::Value].
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_validate::{Error, Validate};
    ///
    /// let value = serde_json::json!({"type": "Catalog", "stac_version": "1.1.0"});
    /// let Err(Error::Validation(violations)) = value.validate() else { panic!() };
    /// let json = violations[0].clone().into_json();
    /// assert_eq!(json["type"], "Catalog");
    /// ```
    pub fn into_json(self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "type": self.r#type.map(|r#type| r#type.to_string()),
            "path": self.path,
            "expected": self.expected,
            "actual": self.actual,
            "message": self.message,
        })
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(r#type) = self.r#type {
            if let Some(id) = self.id.as_ref() {
                write!(f, "{}[id={id}] at {}: {}", r#type, self.path, self.message)
            } else {
                write!(f, "{} at {}: {}", r#type, self.path, self.message)
            }
        } else if let Some(id) = self.id.as_ref() {
            write!(f, "[id={id}] at {}: {}", self.path, self.message)
        } else {
            write!(f, "at {}: {}", self.path, self.message)
        }
    }
}
