use crate::{Error, Result, Violation};
use fluent_uri::Uri;
use jsonschema::{Resource, Retrieve, ValidationOptions, Validator as JsonschemaValidator};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use stac::{Type, Version};
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    sync::Arc,
};

const SCHEMA_BASE: &str = "https://schemas.stacspec.org";

/// A structure for validating STAC.
///
/// Schemas that aren't bundled are fetched with a blocking http client, so
/// don't validate from inside an async runtime. Use
/// `tokio::task::spawn_blocking` instead.
pub struct Validator {
    validators: HashMap<Uri<String>, Arc<JsonschemaValidator>>,
    validation_options: ValidationOptions,
    retriever: Retriever,
}

#[derive(Debug, Clone)]
struct Retriever(Client);

impl Validator {
    /// Creates a new validator with the bundled schemas.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_validate::Validator;
    ///
    /// let validator = Validator::new().unwrap();
    /// ```
    pub fn new() -> Result<Validator> {
        let client = Client::builder().user_agent(crate::user_agent()).build()?;
        let retriever = Retriever(client);
        let validation_options = jsonschema::options()
            .with_resources(prebuild_resources()?.into_iter())
            .with_retriever(retriever.clone());
        let mut validator = Validator {
            validators: HashMap::new(),
            validation_options,
            retriever,
        };
        validator.prebuild_validators()?;
        Ok(validator)
    }

    /// Registers a schema for a uri, so it will never be fetched.
    ///
    /// Useful for extension schemas when you're offline.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use stac::Item;
    /// use stac_validate::Validator;
    ///
    /// let mut validator = Validator::new()
    ///     .unwrap()
    ///     .with_schema("https://example.com/schema.json", json!({"type": "object"}))
    ///     .unwrap();
    /// let mut item = Item::new("an-id");
    /// item.extensions.push("https://example.com/schema.json".to_string());
    /// validator.validate(&item).unwrap();
    /// ```
    pub fn with_schema(mut self, uri: impl ToString, schema: Value) -> Result<Validator> {
        let uri = Uri::parse(uri.to_string())?;
        let validator = self
            .validation_options
            .build(&schema)
            .map_err(|err| resolution(&uri, err))?;
        let _ = self.validators.insert(uri, Arc::new(validator));
        Ok(self)
    }

    /// Validates a single value.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    /// use stac_validate::Validator;
    ///
    /// let mut validator = Validator::new().unwrap();
    /// validator.validate(&Item::new("an-id")).unwrap();
    /// ```
    pub fn validate<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let value = serde_json::to_value(value)?;
        self.validate_value(&value)
    }

    /// If you have a [serde_json::Value], you can skip a serialization step by using this method.
    ///
    /// Arrays, `FeatureCollection`s, and `{"collections": [...]}` objects
    /// validate each of their members, and all violations are returned
    /// together.
    pub fn validate_value(&mut self, value: &Value) -> Result<()> {
        let mut violations = Vec::new();
        self.collect_violations(value, &mut violations)?;
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(violations))
        }
    }

    fn collect_violations(&mut self, value: &Value, violations: &mut Vec<Violation>) -> Result<()> {
        match value {
            Value::Object(object) => self.collect_object_violations(object, value, violations),
            Value::Array(array) => {
                for value in array {
                    self.collect_violations(value, violations)?;
                }
                Ok(())
            }
            _ => Err(Error::ScalarJson(value.clone())),
        }
    }

    fn collect_object_violations(
        &mut self,
        object: &Map<String, Value>,
        value: &Value,
        violations: &mut Vec<Violation>,
    ) -> Result<()> {
        let r#type: Type = match object.get("type").and_then(|v| v.as_str()) {
            Some(r#type) => r#type.parse()?,
            None => {
                return match object.get("collections") {
                    Some(collections) => self.collect_violations(collections, violations),
                    None => Err(stac::Error::MissingField("type").into()),
                };
            }
        };
        if r#type == Type::ItemCollection {
            return match object.get("features") {
                Some(features) => self.collect_violations(features, violations),
                None => Ok(()),
            };
        }
        let version: Version = object
            .get("stac_version")
            .and_then(|v| v.as_str())
            .ok_or(stac::Error::MissingField("stac_version"))?
            .parse()
            .unwrap_or_else(|never| match never {});

        let uri = schema_uri(r#type, &version)?;
        let validator = self.validator(&uri)?;
        violations.extend(
            validator
                .iter_errors(value)
                .map(|error| Violation::new(&error, value)),
        );

        if let Some(stac_extensions) = object.get("stac_extensions").and_then(|v| v.as_array()) {
            for extension in stac_extensions.iter().filter_map(|v| v.as_str()) {
                let uri =
                    Uri::parse(extension.to_string()).map_err(|err| Error::SchemaResolution {
                        uri: extension.to_string(),
                        message: err.to_string(),
                    })?;
                let validator = self.validator(&uri)?;
                violations.extend(
                    validator
                        .iter_errors(value)
                        .map(|error| Violation::new(&error, value)),
                );
            }
        }
        Ok(())
    }

    fn validator(&mut self, uri: &Uri<String>) -> Result<Arc<JsonschemaValidator>> {
        if let Some(validator) = self.validators.get(uri) {
            return Ok(validator.clone());
        }
        tracing::debug!("fetching schema: {uri}");
        let schema = self
            .retriever
            .retrieve(uri)
            .map_err(|err| resolution(uri, err))?;
        let validator = Arc::new(
            self.validation_options
                .build(&schema)
                .map_err(|err| resolution(uri, err))?,
        );
        let _ = self.validators.insert(uri.clone(), validator.clone());
        Ok(validator)
    }

    fn prebuild_validators(&mut self) -> Result<()> {
        use Type::*;
        use Version::*;

        macro_rules! schema {
            ($t:expr_2021, $v:expr_2021, $path:expr_2021) => {
                let uri = schema_uri($t, &$v)?;
                let value: Value = serde_json::from_str(include_str!($path))?;
                let validator = self
                    .validation_options
                    .build(&value)
                    .map_err(|err| resolution(&uri, err))?;
                let _ = self.validators.insert(uri, Arc::new(validator));
            };
        }

        schema!(Item, v1_0_0, "../schemas/v1.0.0/item.json");
        schema!(Catalog, v1_0_0, "../schemas/v1.0.0/catalog.json");
        schema!(Collection, v1_0_0, "../schemas/v1.0.0/collection.json");
        schema!(Item, v1_1_0, "../schemas/v1.1.0/item.json");
        schema!(Catalog, v1_1_0, "../schemas/v1.1.0/catalog.json");
        schema!(Collection, v1_1_0, "../schemas/v1.1.0/collection.json");

        Ok(())
    }
}

impl Debug for Validator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field(
                "schemas",
                &self.validators.keys().map(Uri::as_str).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Retrieve for Retriever {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let response = self.0.get(uri.as_str()).send()?.error_for_status()?;
        let value = response.json()?;
        Ok(value)
    }
}

fn schema_uri(r#type: Type, version: &Version) -> Result<Uri<String>> {
    let path = r#type
        .spec_path(version)
        .ok_or_else(|| Error::SchemaResolution {
            uri: r#type.to_string(),
            message: "there is no schema for this type".to_string(),
        })?;
    let uri = format!("{SCHEMA_BASE}{path}");
    if !version.is_known() {
        return Err(Error::SchemaResolution {
            uri,
            message: format!("unknown STAC version: {version}"),
        });
    }
    Uri::parse(uri).map_err(Error::from)
}

fn resolution(uri: &Uri<String>, err: impl ToString) -> Error {
    Error::SchemaResolution {
        uri: uri.to_string(),
        message: err.to_string(),
    }
}

fn prebuild_resources() -> Result<Vec<(String, Resource)>> {
    let mut resources = Vec::new();

    macro_rules! resolve {
        ($url:expr_2021, $path:expr_2021) => {
            let value: Value = serde_json::from_str(include_str!($path))?;
            let resource = Resource::from_contents(value).map_err(|err| Error::SchemaResolution {
                uri: $url.to_string(),
                message: err.to_string(),
            })?;
            resources.push(($url.to_string(), resource));
        };
    }

    // General
    resolve!(
        "https://geojson.org/schema/Feature.json",
        "../schemas/geojson/Feature.json"
    );
    resolve!(
        "https://geojson.org/schema/Geometry.json",
        "../schemas/geojson/Geometry.json"
    );

    // STAC v1.0.0
    resolve!(
        "https://schemas.stacspec.org/v1.0.0/item-spec/json-schema/basics.json",
        "../schemas/v1.0.0/basics.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.0.0/item-spec/json-schema/datetime.json",
        "../schemas/v1.0.0/datetime.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.0.0/item-spec/json-schema/instrument.json",
        "../schemas/v1.0.0/instrument.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.0.0/item-spec/json-schema/item.json",
        "../schemas/v1.0.0/item.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.0.0/item-spec/json-schema/licensing.json",
        "../schemas/v1.0.0/licensing.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.0.0/item-spec/json-schema/provider.json",
        "../schemas/v1.0.0/provider.json"
    );

    // STAC v1.1.0
    resolve!(
        "https://schemas.stacspec.org/v1.1.0/item-spec/json-schema/bands.json",
        "../schemas/v1.1.0/bands.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.1.0/item-spec/json-schema/basics.json",
        "../schemas/v1.1.0/basics.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.1.0/item-spec/json-schema/data-values.json",
        "../schemas/v1.1.0/data-values.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.1.0/item-spec/json-schema/datetime.json",
        "../schemas/v1.1.0/datetime.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.1.0/item-spec/json-schema/instrument.json",
        "../schemas/v1.1.0/instrument.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.1.0/item-spec/json-schema/item.json",
        "../schemas/v1.1.0/item.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.1.0/item-spec/json-schema/licensing.json",
        "../schemas/v1.1.0/licensing.json"
    );
    resolve!(
        "https://schemas.stacspec.org/v1.1.0/item-spec/json-schema/provider.json",
        "../schemas/v1.1.0/provider.json"
    );

    Ok(resources)
}
