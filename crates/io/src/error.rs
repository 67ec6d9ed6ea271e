use thiserror::Error;

/// Crate-specific error enum
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [stac_api::Error]
    #[cfg(feature = "api")]
    #[error(transparent)]
    Api(#[from] stac_api::Error),

    /// A required feature is not enabled.
    #[error("{0} is not enabled")]
    FeatureNotEnabled(&'static str),

    /// Returned when unable to read a STAC value from a path.
    #[error("{io}: {path}")]
    FromPath {
        /// The [std::io::Error]
        #[source]
        io: std::io::Error,

        /// The path.
        path: String,
    },

    /// An error occurred when getting an href.
    #[error("error when getting href={href}: {message}")]
    Get {
        /// The href that we were trying to get.
        href: String,

        /// The underling error message.
        message: String,
    },

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// [object_store::Error]
    #[cfg(feature = "store")]
    #[error(transparent)]
    ObjectStore(#[from] object_store::Error),

    /// [reqwest::Error]
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [stac::Error]
    #[error(transparent)]
    Stac(#[from] stac::Error),

    /// The format could not be determined, either from a name or from an href's extension.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// [stac_validate::Error]
    #[cfg(feature = "validate")]
    #[error(transparent)]
    Validate(#[from] stac_validate::Error),
}
