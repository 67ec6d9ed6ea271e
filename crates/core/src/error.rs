use thiserror::Error;

/// Error enum for crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [arrow_schema::ArrowError]
    #[error(transparent)]
    #[cfg(feature = "geoarrow")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// [chrono::ParseError]
    #[error(transparent)]
    ChronoParse(#[from] chrono::ParseError),

    /// Returned when bytes can't be decoded (or values can't be encoded) in
    /// some format.
    ///
    /// The location is format-specific, e.g. `line 3` for newline-delimited
    /// JSON or `row 12` for stac-geoparquet.
    #[error("codec error at {location}: {source}")]
    Codec {
        /// Where in the input the error occurred.
        location: String,

        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// [geojson::Error]
    #[error(transparent)]
    Geojson(#[from] Box<geojson::Error>),

    /// [geozero::error::GeozeroError]
    #[error(transparent)]
    #[cfg(feature = "geoarrow")]
    Geozero(#[from] geozero::error::GeozeroError),

    /// Returned when a STAC object has the wrong type field.
    #[error("incorrect type: expected={expected}, actual={actual}")]
    IncorrectType {
        /// The actual type field on the object.
        actual: String,

        /// The expected value.
        expected: String,
    },

    /// Returned when a property name conflicts with a top-level STAC field, or
    /// it's an invalid top-level field name.
    #[error("invalid attribute name: {0}")]
    InvalidAttribute(String),

    /// This vector is not a valid bounding box.
    #[error("invalid bbox: {0:?}")]
    InvalidBbox(Vec<f64>),

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A structural problem was found while migrating an object.
    #[error("migration error at {path}: {message}")]
    Migration {
        /// JSON pointer to the offending field.
        path: String,

        /// What went wrong.
        message: String,
    },

    /// Returned when there is not a required field on a STAC object
    #[error("no \"{0}\" field in the JSON object")]
    MissingField(&'static str),

    /// There are no items, when items are required.
    #[error("no items")]
    NoItems,

    /// This is not a JSON object.
    #[error("json value is not an object")]
    NotAnObject(serde_json::Value),

    /// [parquet::errors::ParquetError]
    #[error(transparent)]
    #[cfg(feature = "geoparquet")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [std::num::TryFromIntError]
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// Unsupported geoparquet type
    #[error("unsupported geoparquet type")]
    UnsupportedGeoparquetType,

    /// The stac-geoparquet file was written with a column layout we don't know.
    #[error("unsupported stac-geoparquet schema version: {0}")]
    UnsupportedSchemaVersion(u32),

    /// Returned when the `type` field of a STAC object does not equal `"Feature"`, `"Catalog"`, `"Collection"`, or `"FeatureCollection"`.
    #[error("unknown \"type\": {0}")]
    UnknownType(String),

    /// The object's `stac_version` is missing or isn't one we know how to
    /// migrate from (or to).
    #[error("unknown STAC version: {}", .0.as_deref().unwrap_or("<none>"))]
    UnknownVersion(Option<String>),

    /// Migrations only go forward.
    #[error("unsupported downgrade: {from} to {to}")]
    UnsupportedDowngrade {
        /// The object's current version.
        from: crate::Version,

        /// The requested version.
        to: crate::Version,
    },

    /// [url::ParseError]
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Creates a codec error with a location.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Error;
    ///
    /// let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    /// let err = Error::codec("line 1", err);
    /// assert_eq!(err.to_string().split(':').next().unwrap(), "codec error at line 1");
    /// ```
    pub fn codec(
        location: impl ToString,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Error {
        Error::Codec {
            location: location.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn migration(path: impl ToString, message: impl ToString) -> Error {
        Error::Migration {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}
