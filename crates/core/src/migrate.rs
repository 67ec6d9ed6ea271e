//! Migrate STAC objects between versions of the specification.
//!
//! Migration works on a `serde_json` copy of the object. Each adjacent pair of
//! [known versions](Version::known) has a rule, and moving across several
//! versions applies the rules one after another. Rules never look at the
//! declared version, so going from A to C in one call is the same as going
//! from A to B and then from B to C.
//!
//! The declared `stac_version` is only rewritten once the whole chain has
//! succeeded, and a failure anywhere leaves the caller's object untouched.

use crate::{
    Catalog, Collection, Error, Item, ItemCollection, Result, SelfHref, Type, Value, Version,
};
use serde_json::{Map, Value as JsonValue};

const STAC_VERSION_KEY: &str = "stac_version";
const STAC_EXTENSIONS_KEY: &str = "stac_extensions";

/// A single hop between two adjacent versions.
///
/// The second argument is the JSON pointer of the object being migrated, used
/// to build error paths (it's empty for a top-level object).
type Rule = fn(&mut Map<String, JsonValue>, &str) -> Result<()>;

/// Migrates a STAC object from one version to another.
pub trait Migrate: Sized {
    /// Migrates this object to another version.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Item, Migrate, Version};
    ///
    /// let mut item = Item::new("an-id");
    /// item.version = Version::v1_0_0;
    /// let item = item.migrate(&Version::v1_1_0).unwrap();
    /// assert_eq!(item.version, Version::v1_1_0);
    /// ```
    fn migrate(self, to: &Version) -> Result<Self>;

    /// Migrates this object to the latest stable version.
    fn migrate_latest(self) -> Result<Self> {
        self.migrate(&Version::latest())
    }

    /// Migrates this object in place.
    ///
    /// On error, the object is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Item, Migrate, Version};
    ///
    /// let mut item = Item::new("an-id");
    /// item.version = Version::v1_1_0;
    /// assert!(item.migrate_in_place(&Version::v1_0_0).is_err());
    /// assert_eq!(item.version, Version::v1_1_0);
    /// ```
    fn migrate_in_place(&mut self, to: &Version) -> Result<()>
    where
        Self: Clone,
    {
        let migrated = self.clone().migrate(to)?;
        *self = migrated;
        Ok(())
    }
}

/// Migrates a JSON STAC object (or a `FeatureCollection` of them).
///
/// If `to` is `None`, migrates to [Version::latest].
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let value = json!({
///     "type": "Catalog",
///     "stac_version": "1.0.0",
///     "id": "an-id",
///     "description": "a description",
///     "license": "proprietary",
///     "links": []
/// });
/// let value = stac::migrate_value(value, None).unwrap();
/// assert_eq!(value["stac_version"], "1.1.0");
/// assert_eq!(value["license"], "other");
/// ```
pub fn migrate_value(value: JsonValue, to: Option<&Version>) -> Result<JsonValue> {
    let to = to.cloned().unwrap_or_else(Version::latest);
    let mut object = crate::fields::into_object(value)?;
    if object_type(&object, "")? == Type::ItemCollection {
        migrate_feature_collection(&mut object, &to)?;
    } else {
        migrate_object(&mut object, &to, "")?;
    }
    Ok(JsonValue::Object(object))
}

fn migrate_feature_collection(object: &mut Map<String, JsonValue>, to: &Version) -> Result<()> {
    let features = object
        .get_mut("features")
        .and_then(|features| features.as_array_mut())
        .ok_or_else(|| Error::migration("/features", "expected an array of features"))?;
    for (i, feature) in features.iter_mut().enumerate() {
        let path = format!("/features/{i}");
        let feature = feature
            .as_object_mut()
            .ok_or_else(|| Error::migration(&path, "feature is not an object"))?;
        if object_type(feature, &path)? != Type::Item {
            return Err(Error::migration(format!("{path}/type"), "expected a Feature"));
        }
        migrate_object(feature, to, &path)?;
    }
    if object.contains_key(STAC_VERSION_KEY) {
        let _ = object.insert(STAC_VERSION_KEY.to_string(), to.to_string().into());
    }
    Ok(())
}

fn migrate_object(object: &mut Map<String, JsonValue>, to: &Version, path: &str) -> Result<()> {
    let r#type = object_type(object, path)?;
    let from = declared_version(object)?;
    let steps = from.steps(to)?;
    ensure_structure(object, r#type, path)?;
    for (from, to) in steps {
        tracing::debug!("migrating {path:?} from {from} to {to}");
        let rule = rule(&from, &to).ok_or_else(|| {
            Error::migration(path, format!("no migration rule from {from} to {to}"))
        })?;
        rule(object, path)?;
    }
    let _ = object.insert(STAC_VERSION_KEY.to_string(), to.to_string().into());
    Ok(())
}

/// The rule table, keyed by adjacent version pairs.
fn rule(from: &Version, to: &Version) -> Option<Rule> {
    match (from, to) {
        (Version::v1_0_0_beta_2, Version::v1_0_0_rc_1) => Some(extension_names_to_uris),
        (Version::v1_0_0_rc_1, Version::v1_0_0) => Some(unchanged),
        (Version::v1_0_0, Version::v1_1_0_beta_1) => Some(v1_0_0_to_v1_1_0_beta_1),
        (Version::v1_1_0_beta_1, Version::v1_1_0) => Some(unchanged),
        _ => None,
    }
}

fn unchanged(_: &mut Map<String, JsonValue>, _: &str) -> Result<()> {
    Ok(())
}

fn extension_names_to_uris(object: &mut Map<String, JsonValue>, path: &str) -> Result<()> {
    let Some(extensions) = object.get_mut(STAC_EXTENSIONS_KEY) else {
        return Ok(());
    };
    let extensions = extensions.as_array_mut().ok_or_else(|| {
        Error::migration(
            format!("{path}/{STAC_EXTENSIONS_KEY}"),
            "expected an array of strings",
        )
    })?;
    for (i, extension) in extensions.iter_mut().enumerate() {
        let name = extension.as_str().ok_or_else(|| {
            Error::migration(
                format!("{path}/{STAC_EXTENSIONS_KEY}/{i}"),
                "extension is not a string",
            )
        })?;
        if crate::href::is_absolute(name) {
            continue;
        }
        match extension_uri(name) {
            Some(uri) => *extension = uri.into(),
            None => tracing::warn!("unknown extension short name, leaving it as-is: {name}"),
        }
    }
    Ok(())
}

fn extension_uri(name: &str) -> Option<&'static str> {
    let uri = match name {
        "eo" => "https://stac-extensions.github.io/eo/v1.0.0/schema.json",
        "proj" | "projection" => "https://stac-extensions.github.io/projection/v1.0.0/schema.json",
        "view" => "https://stac-extensions.github.io/view/v1.0.0/schema.json",
        "sat" => "https://stac-extensions.github.io/sat/v1.0.0/schema.json",
        "sar" => "https://stac-extensions.github.io/sar/v1.0.0/schema.json",
        "sci" | "scientific" => "https://stac-extensions.github.io/scientific/v1.0.0/schema.json",
        "label" => "https://stac-extensions.github.io/label/v1.0.0/schema.json",
        "pc" | "pointcloud" => "https://stac-extensions.github.io/pointcloud/v1.0.0/schema.json",
        "file" | "checksum" => "https://stac-extensions.github.io/file/v1.0.0/schema.json",
        "timestamps" => "https://stac-extensions.github.io/timestamps/v1.0.0/schema.json",
        "version" => "https://stac-extensions.github.io/version/v1.0.0/schema.json",
        "item-assets" => "https://stac-extensions.github.io/item-assets/v1.0.0/schema.json",
        "raster" => "https://stac-extensions.github.io/raster/v1.0.0/schema.json",
        _ => return None,
    };
    Some(uri)
}

fn v1_0_0_to_v1_1_0_beta_1(object: &mut Map<String, JsonValue>, path: &str) -> Result<()> {
    if let Some(assets) = object.get_mut("assets").and_then(|v| v.as_object_mut()) {
        for (key, asset) in assets.iter_mut() {
            let asset_path = format!("{path}/assets/{}", escape(key));
            let asset = asset
                .as_object_mut()
                .ok_or_else(|| Error::migration(&asset_path, "asset is not an object"))?;
            migrate_bands(asset, &asset_path)?;
        }
    }
    migrate_links(object);
    if object_type(object, path)? == Type::Item {
        let properties = object
            .get_mut("properties")
            .and_then(|v| v.as_object_mut())
            .ok_or_else(|| Error::migration(format!("{path}/properties"), "missing properties"))?;
        migrate_bands(properties, &format!("{path}/properties"))?;
        migrate_license(properties);
    } else {
        migrate_license(object);
    }
    Ok(())
}

/// Merges `eo:bands` and `raster:bands` into a single `bands` array.
///
/// Bands are matched by position. A pre-existing `bands` array is merged
/// first, then `eo:bands`, then `raster:bands`, and the first value seen for a
/// key wins.
fn migrate_bands(object: &mut Map<String, JsonValue>, path: &str) -> Result<()> {
    let existing = take_bands(object, "bands", path)?;
    let eo = take_bands(object, "eo:bands", path)?;
    let raster = take_bands(object, "raster:bands", path)?;
    if eo.is_none() && raster.is_none() {
        if let Some(existing) = existing {
            let _ = object.insert("bands".into(), bands_value(existing));
        }
        return Ok(());
    }
    let len = [&existing, &eo, &raster]
        .iter()
        .filter_map(|bands| bands.as_ref().map(Vec::len))
        .max()
        .unwrap_or_default();
    let mut bands = vec![Map::new(); len];
    merge_bands(&mut bands, existing, |key| key);
    merge_bands(&mut bands, eo, |key| {
        if key == "name" {
            key
        } else {
            format!("eo:{key}")
        }
    });
    merge_bands(&mut bands, raster, |key| {
        if matches!(key.as_str(), "nodata" | "data_type" | "statistics" | "unit") {
            key
        } else {
            format!("raster:{key}")
        }
    });
    hoist_shared_values(object, &mut bands);
    if bands.iter().any(|band| !band.is_empty()) {
        let _ = object.insert("bands".into(), bands_value(bands));
    }
    Ok(())
}

fn take_bands(
    object: &mut Map<String, JsonValue>,
    key: &str,
    path: &str,
) -> Result<Option<Vec<Map<String, JsonValue>>>> {
    match object.remove(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Array(values)) => values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                JsonValue::Object(band) => Ok(band),
                _ => Err(Error::migration(
                    format!("{path}/{}/{i}", escape(key)),
                    "band is not an object",
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(Error::migration(
            format!("{path}/{}", escape(key)),
            "expected an array of bands",
        )),
    }
}

fn merge_bands(
    bands: &mut [Map<String, JsonValue>],
    source: Option<Vec<Map<String, JsonValue>>>,
    rename: impl Fn(String) -> String,
) {
    for (band, source) in bands.iter_mut().zip(source.into_iter().flatten()) {
        for (key, value) in source {
            let _ = band.entry(rename(key)).or_insert(value);
        }
    }
}

/// Moves values that every band shares up to the containing object.
fn hoist_shared_values(object: &mut Map<String, JsonValue>, bands: &mut [Map<String, JsonValue>]) {
    if bands.len() < 2 {
        return;
    }
    let keys: Vec<String> = bands[0]
        .keys()
        .filter(|key| key.as_str() != "name")
        .cloned()
        .collect();
    for key in keys {
        let value = &bands[0][&key];
        let shared = bands[1..].iter().all(|band| band.get(&key) == Some(value))
            && object.get(&key).is_none_or(|existing| existing == value);
        if shared {
            let value = value.clone();
            for band in bands.iter_mut() {
                let _ = band.remove(&key);
            }
            let _ = object.insert(key, value);
        }
    }
}

fn bands_value(bands: Vec<Map<String, JsonValue>>) -> JsonValue {
    JsonValue::Array(bands.into_iter().map(JsonValue::Object).collect())
}

fn migrate_links(object: &mut Map<String, JsonValue>) {
    let Some(links) = object.get_mut("links").and_then(|v| v.as_array_mut()) else {
        return;
    };
    for link in links.iter_mut().filter_map(|link| link.as_object_mut()) {
        if link.get("rel").and_then(|v| v.as_str()) != Some(crate::link::SELF_REL) {
            continue;
        }
        if let Some(href) = link
            .get("href")
            .and_then(|v| v.as_str())
            .filter(|href| href.starts_with('/'))
            .map(|href| format!("file://{href}"))
        {
            let _ = link.insert("href".to_string(), href.into());
        }
    }
}

fn migrate_license(object: &mut Map<String, JsonValue>) {
    if object
        .get("license")
        .and_then(|v| v.as_str())
        .is_some_and(|license| license == "proprietary" || license == "various")
    {
        let _ = object.insert("license".into(), "other".into());
    }
}

fn object_type(object: &Map<String, JsonValue>, path: &str) -> Result<Type> {
    object
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| Error::migration(format!("{path}/type"), "missing or not a string"))?
        .parse()
}

fn declared_version(object: &Map<String, JsonValue>) -> Result<Version> {
    match object.get(STAC_VERSION_KEY) {
        Some(JsonValue::String(version)) => {
            let version: Version = version.parse().unwrap_or_else(|never| match never {});
            if version.is_known() {
                Ok(version)
            } else {
                Err(Error::UnknownVersion(Some(version.to_string())))
            }
        }
        Some(other) => Err(Error::UnknownVersion(Some(other.to_string()))),
        None => Err(Error::UnknownVersion(None)),
    }
}

/// Checks the structural invariants and fills in fields that must be present.
fn ensure_structure(object: &mut Map<String, JsonValue>, r#type: Type, path: &str) -> Result<()> {
    if r#type != Type::ItemCollection
        && !object
            .get("id")
            .and_then(|id| id.as_str())
            .is_some_and(|id| !id.is_empty())
    {
        return Err(Error::migration(format!("{path}/id"), "expected a non-empty string"));
    }
    let links = object
        .entry("links")
        .or_insert_with(|| JsonValue::Array(Vec::new()));
    let links = links
        .as_array()
        .ok_or_else(|| Error::migration(format!("{path}/links"), "expected an array"))?;
    for (i, link) in links.iter().enumerate() {
        let link = link
            .as_object()
            .ok_or_else(|| Error::migration(format!("{path}/links/{i}"), "link is not an object"))?;
        for key in ["rel", "href"] {
            if !link.get(key).is_some_and(|v| v.is_string()) {
                return Err(Error::migration(
                    format!("{path}/links/{i}/{key}"),
                    "expected a string",
                ));
            }
        }
    }
    if r#type == Type::Item {
        ensure_object(object, "properties", path)?;
        ensure_object(object, "assets", path)?;
        let _ = object.entry("geometry").or_insert(JsonValue::Null);
    }
    Ok(())
}

fn ensure_object(object: &mut Map<String, JsonValue>, key: &str, path: &str) -> Result<()> {
    let value = object
        .entry(key)
        .or_insert_with(|| JsonValue::Object(Map::new()));
    if value.is_null() {
        *value = JsonValue::Object(Map::new());
    }
    if value.is_object() {
        Ok(())
    } else {
        Err(Error::migration(format!("{path}/{key}"), "expected an object"))
    }
}

/// Escapes a key for use in a JSON pointer.
fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

impl Migrate for JsonValue {
    fn migrate(self, to: &Version) -> Result<Self> {
        migrate_value(self, Some(to))
    }
}

macro_rules! impl_migrate {
    ($object:ty) => {
        impl Migrate for $object {
            fn migrate(self, to: &Version) -> Result<Self> {
                let self_href = self.self_href().cloned();
                let value = migrate_value(serde_json::to_value(self)?, Some(to))?;
                let mut object: $object = serde_json::from_value(value)?;
                *object.self_href_mut() = self_href;
                Ok(object)
            }
        }
    };
}

impl_migrate!(Item);
impl_migrate!(Catalog);
impl_migrate!(Collection);
impl_migrate!(ItemCollection);
impl_migrate!(Value);

#[cfg(test)]
mod tests {
    use super::{Migrate, migrate_value};
    use crate::{Collection, Error, Item, Links, SelfHref, Version};
    use assert_json_diff::assert_json_eq;
    use serde_json::{Value, json};

    fn bands_item() -> Value {
        serde_json::from_slice(&std::fs::read("data/bands-v1.0.0.json").unwrap()).unwrap()
    }

    #[test]
    fn consolidate_bands() {
        let item: Item = crate::read("data/bands-v1.0.0.json");
        let item = item.migrate(&Version::v1_1_0).unwrap();
        assert_eq!(item.version, Version::v1_1_0);
        let asset = &item.assets["example"];
        assert!(!asset.additional_fields.contains_key("eo:bands"));
        assert!(!asset.additional_fields.contains_key("raster:bands"));
        assert_eq!(asset.additional_fields["data_type"], "uint16");
        assert_eq!(asset.additional_fields["raster:spatial_resolution"], 60);
        let bands = asset.additional_fields["bands"].as_array().unwrap();
        assert_eq!(bands.len(), 4);
        assert_json_eq!(
            bands[0],
            json!({
                "name": "r",
                "eo:common_name": "red",
                "eo:center_wavelength": 0.665,
                "statistics": {"minimum": 0, "maximum": 10000}
            })
        );
        assert_json_eq!(bands[3], json!({"name": "nir", "nodata": 0}));
    }

    #[test]
    fn first_seen_wins() {
        let mut item = bands_item();
        item["assets"]["example"]["bands"] = json!([{"name": "already-here"}]);
        let item = migrate_value(item, Some(&Version::v1_1_0)).unwrap();
        assert_eq!(item["assets"]["example"]["bands"][0]["name"], "already-here");
        assert_eq!(item["assets"]["example"]["bands"][1]["name"], "g");
    }

    #[test]
    fn empty_bands_are_dropped() {
        let mut item = bands_item();
        item["assets"]["example"]["eo:bands"] = json!([{}, {}]);
        item["assets"]["example"]["raster:bands"] = json!([]);
        let item = migrate_value(item, Some(&Version::v1_1_0)).unwrap();
        let asset = item["assets"]["example"].as_object().unwrap();
        assert!(!asset.contains_key("bands"));
        assert!(!asset.contains_key("eo:bands"));
    }

    #[test]
    fn bands_not_an_array() {
        let mut item = bands_item();
        item["assets"]["example"]["eo:bands"] = json!("not bands");
        let err = migrate_value(item, Some(&Version::v1_1_0)).unwrap_err();
        match err {
            Error::Migration { path, .. } => assert_eq!(path, "/assets/example/eo:bands"),
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn failed_migration_leaves_object_unchanged() {
        let mut item: Item = crate::read("data/bands-v1.0.0.json");
        let _ = item.assets["example"]
            .additional_fields
            .insert("raster:bands".into(), json!(42));
        let before = item.clone();
        assert!(item.migrate_in_place(&Version::v1_1_0).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn self_href_survives() {
        let item: Item = crate::read("data/bands-v1.0.0.json");
        let item = item.migrate(&Version::v1_1_0).unwrap();
        assert!(item.self_href().is_some());
    }

    #[test]
    fn absolute_self_link() {
        let mut item = Item::new("an-id");
        item.version = Version::v1_0_0;
        item.set_link(crate::Link::new("/an/absolute/href", "self"));
        let item = item.migrate(&Version::v1_1_0).unwrap();
        assert_eq!(item.link("self").unwrap().href, "file:///an/absolute/href");
    }

    #[test]
    fn license() {
        let mut collection = Collection::new("an-id", "a description");
        collection.version = Version::v1_0_0;
        collection.license = "various".to_string();
        let collection = collection.migrate(&Version::v1_1_0).unwrap();
        assert_eq!(collection.license, "other");
    }

    #[test]
    fn extension_short_names() {
        let value = json!({
            "type": "Catalog",
            "stac_version": "1.0.0-beta.2",
            "stac_extensions": ["eo", "https://example.com/schema.json", "not-a-real-one"],
            "id": "an-id",
            "description": "a description",
            "links": []
        });
        let value = migrate_value(value, Some(&Version::v1_0_0)).unwrap();
        assert_eq!(
            value["stac_extensions"],
            json!([
                "https://stac-extensions.github.io/eo/v1.0.0/schema.json",
                "https://example.com/schema.json",
                "not-a-real-one"
            ])
        );
        assert_eq!(value["stac_version"], "1.0.0");
    }

    #[test]
    fn extension_not_a_string() {
        let value = json!({
            "type": "Catalog",
            "stac_version": "1.0.0-beta.2",
            "stac_extensions": ["eo", 42],
            "id": "an-id",
            "description": "a description",
            "links": []
        });
        match migrate_value(value, None).unwrap_err() {
            Error::Migration { path, .. } => assert_eq!(path, "/stac_extensions/1"),
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn same_version_fills_in_required_fields() {
        let value = json!({
            "type": "Feature",
            "stac_version": "1.1.0",
            "id": "an-id",
            "properties": {"datetime": "2023-01-01T00:00:00Z"},
        });
        let migrated = migrate_value(value, Some(&Version::v1_1_0)).unwrap();
        assert_json_eq!(
            migrated,
            json!({
                "type": "Feature",
                "stac_version": "1.1.0",
                "id": "an-id",
                "geometry": null,
                "properties": {"datetime": "2023-01-01T00:00:00Z"},
                "links": [],
                "assets": {},
            })
        );
    }

    #[test]
    fn missing_version() {
        let value = json!({"type": "Catalog", "id": "an-id", "description": "", "links": []});
        assert!(matches!(
            migrate_value(value, None).unwrap_err(),
            Error::UnknownVersion(None)
        ));
    }

    #[test]
    fn unknown_version() {
        let value = json!({
            "type": "Catalog",
            "stac_version": "0.9.0",
            "id": "an-id",
            "description": "",
            "links": []
        });
        assert!(matches!(
            migrate_value(value, None).unwrap_err(),
            Error::UnknownVersion(Some(version)) if version == "0.9.0"
        ));
    }

    #[test]
    fn unknown_target() {
        let item = Item::new("an-id");
        assert!(matches!(
            item.migrate(&Version::Unknown("2.0.0".to_string())).unwrap_err(),
            Error::UnknownVersion(Some(_))
        ));
    }

    #[test]
    fn downgrade() {
        let item = Item::new("an-id");
        assert!(matches!(
            item.migrate(&Version::v1_0_0).unwrap_err(),
            Error::UnsupportedDowngrade { .. }
        ));
    }

    #[test]
    fn empty_id() {
        let mut item = Item::new("");
        item.version = Version::v1_0_0;
        match item.migrate(&Version::v1_1_0).unwrap_err() {
            Error::Migration { path, .. } => assert_eq!(path, "/id"),
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn bad_link() {
        let value = json!({
            "type": "Catalog",
            "stac_version": "1.0.0",
            "id": "an-id",
            "description": "a description",
            "links": [{"rel": "root", "href": "./catalog.json"}, {"rel": "child"}]
        });
        match migrate_value(value, None).unwrap_err() {
            Error::Migration { path, .. } => assert_eq!(path, "/links/1/href"),
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn feature_collection() {
        let item = bands_item();
        let value = json!({
            "type": "FeatureCollection",
            "features": [item.clone(), item]
        });
        let value = migrate_value(value, None).unwrap();
        for feature in value["features"].as_array().unwrap() {
            assert_eq!(feature["stac_version"], "1.1.0");
            assert!(feature["assets"]["example"].get("bands").is_some());
        }
        assert!(value.get("stac_version").is_none());
    }

    #[test]
    fn feature_collection_error_path() {
        let mut bad = bands_item();
        bad["assets"]["example"]["raster:bands"] = json!({});
        let value = json!({
            "type": "FeatureCollection",
            "features": [bands_item(), bad]
        });
        match migrate_value(value, None).unwrap_err() {
            Error::Migration { path, .. } => {
                assert_eq!(path, "/features/1/assets/example/raster:bands")
            }
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn chaining_matches_direct() {
        let item = bands_item();
        let direct = migrate_value(item.clone(), Some(&Version::v1_1_0)).unwrap();
        let hop = migrate_value(item, Some(&Version::v1_1_0_beta_1)).unwrap();
        let chained = migrate_value(hop, Some(&Version::v1_1_0)).unwrap();
        assert_json_eq!(direct, chained);
    }
}
