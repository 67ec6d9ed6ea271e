//! STAC Items.

use crate::{
    Asset, Assets, Bbox, Error, Fields, Href, Link, Links, Result, SelfHref, Version,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The type field for [Items](Item).
pub const ITEM_TYPE: &str = "Feature";

/// An `Item` is a GeoJSON Feature augmented with foreign members relevant to a
/// STAC object.
///
/// These include fields that identify the time range and assets of the `Item`. An
/// `Item` is the core object in a STAC catalog, containing the core metadata that
/// enables any client to search or crawl online catalogs of spatial 'assets'
/// (e.g., satellite imagery, derived data, DEMs).
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Item {
    /// Type of the GeoJSON Object. MUST be set to `"Feature"`.
    #[serde(
        deserialize_with = "deserialize_type",
        default = "default_type"
    )]
    pub r#type: String,

    /// The STAC version the `Item` implements.
    #[serde(rename = "stac_version", default)]
    pub version: Version,

    /// A list of extensions the `Item` implements.
    #[serde(
        rename = "stac_extensions",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub extensions: Vec<String>,

    /// Provider identifier.
    ///
    /// The ID should be unique within the [Collection](crate::Collection) that contains the `Item`.
    pub id: String,

    /// Defines the full footprint of the asset represented by this item,
    /// formatted according to [RFC 7946, section
    /// 3.1](https://tools.ietf.org/html/rfc7946#section-3.1).
    #[serde(default)]
    pub geometry: Option<geojson::Geometry>,

    /// Bounding Box of the asset represented by this `Item`, formatted according
    /// to [RFC 7946, section 5](https://tools.ietf.org/html/rfc7946#section-5).
    ///
    /// REQUIRED if `geometry` is not `null`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox: Option<Bbox>,

    /// A dictionary of additional metadata for the `Item`.
    #[serde(default)]
    pub properties: Properties,

    /// List of link objects to resources and related URLs.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Dictionary of asset objects that can be downloaded, each with a unique key.
    #[serde(default)]
    pub assets: IndexMap<String, Asset>,

    /// The `id` of the STAC [Collection](crate::Collection) this `Item`
    /// references to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// Additional top-level fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,

    #[serde(skip)]
    self_href: Option<Href>,
}

/// Additional metadata fields can be added to the GeoJSON Object Properties.
///
/// The only required field is `datetime` but it is recommended to add more
/// fields, see the [STAC Item
/// spec](https://github.com/radiantearth/stac-spec/blob/master/item-spec/item-spec.md#properties-object).
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Properties {
    /// The searchable date and time of the assets, in UTC.
    ///
    /// If `null`, then `start_datetime` and `end_datetime` should be set.
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,

    /// The first or start date and time for the item, in UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<DateTime<Utc>>,

    /// The last or end date and time for the item, in UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<DateTime<Utc>>,

    /// A human readable title describing the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed multi-line description to fully explain the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation date and time of the corresponding data, in UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Date and time the metadata was updated last, in UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,

    /// Additional fields on the properties.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Item {
    /// Creates a new `Item` with the given `id`.
    ///
    /// The item properties' `datetime` field is set to the object creation
    /// time.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    ///
    /// let item = Item::new("an-id");
    /// assert_eq!(item.id, "an-id");
    /// ```
    pub fn new(id: impl ToString) -> Item {
        Item {
            r#type: default_type(),
            version: Version::default(),
            extensions: Vec::new(),
            id: id.to_string(),
            geometry: None,
            bbox: None,
            properties: Properties::default(),
            links: Vec::new(),
            assets: IndexMap::new(),
            collection: None,
            additional_fields: Map::new(),
            self_href: None,
        }
    }

    /// Sets this item's collection id in the builder pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    ///
    /// let item = Item::new("an-id").collection("a-collection");
    /// assert_eq!(item.collection.unwrap(), "a-collection");
    /// ```
    pub fn collection(mut self, id: impl ToString) -> Item {
        self.collection = Some(id.to_string());
        self
    }

    /// Sets this item's geometry, and updates the bbox to match.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    /// use geojson::{Geometry, Value};
    ///
    /// let mut item = Item::new("an-id");
    /// item.set_geometry(Geometry::new(Value::Point(vec![-105.1, 41.1]))).unwrap();
    /// assert_eq!(item.bbox.unwrap().xmin(), -105.1);
    /// ```
    pub fn set_geometry(&mut self, geometry: impl Into<Option<geojson::Geometry>>) -> Result<()> {
        self.geometry = geometry.into();
        self.bbox = match &self.geometry {
            Some(geometry) => bounds(&geometry.value)?,
            None => None,
        };
        Ok(())
    }
}

fn bounds(value: &geojson::Value) -> Result<Option<Bbox>> {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    let mut dimensions = 0;
    let mut visit = |position: &Vec<f64>| {
        dimensions = dimensions.max(position.len().min(3));
        for (i, v) in position.iter().take(3).enumerate() {
            min[i] = min[i].min(*v);
            max[i] = max[i].max(*v);
        }
    };
    walk_positions(value, &mut visit);
    match dimensions {
        0 => Ok(None),
        2 => Ok(Some(Bbox::new(min[0], min[1], max[0], max[1]))),
        3 => Ok(Some(Bbox::ThreeDimensional([
            min[0], min[1], min[2], max[0], max[1], max[2],
        ]))),
        _ => Err(Error::InvalidBbox(min.iter().take(dimensions).copied().collect())),
    }
}

fn walk_positions(value: &geojson::Value, visit: &mut impl FnMut(&Vec<f64>)) {
    use geojson::Value::*;
    match value {
        Point(position) => visit(position),
        MultiPoint(positions) | LineString(positions) => positions.iter().for_each(visit),
        MultiLineString(lines) | Polygon(lines) => lines.iter().flatten().for_each(visit),
        MultiPolygon(polygons) => polygons.iter().flatten().flatten().for_each(visit),
        GeometryCollection(geometries) => {
            for geometry in geometries {
                walk_positions(&geometry.value, visit);
            }
        }
    }
}

impl Default for Properties {
    fn default() -> Properties {
        Properties {
            datetime: Some(Utc::now()),
            start_datetime: None,
            end_datetime: None,
            title: None,
            description: None,
            created: None,
            updated: None,
            additional_fields: Map::new(),
        }
    }
}

impl SelfHref for Item {
    fn self_href(&self) -> Option<&Href> {
        self.self_href.as_ref()
    }

    fn self_href_mut(&mut self) -> &mut Option<Href> {
        &mut self.self_href
    }
}

impl Links for Item {
    fn links(&self) -> &[Link] {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Vec<Link> {
        &mut self.links
    }
}

impl Assets for Item {
    fn assets(&self) -> &IndexMap<String, Asset> {
        &self.assets
    }

    fn assets_mut(&mut self) -> &mut IndexMap<String, Asset> {
        &mut self.assets
    }
}

impl Fields for Item {
    fn fields(&self) -> &Map<String, Value> {
        &self.properties.additional_fields
    }

    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties.additional_fields
    }
}

impl TryFrom<Item> for Map<String, Value> {
    type Error = Error;

    fn try_from(item: Item) -> Result<Self> {
        crate::fields::into_object(serde_json::to_value(item)?)
    }
}

impl TryFrom<Map<String, Value>> for Item {
    type Error = Error;

    fn try_from(map: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(map)).map_err(Error::from)
    }
}

fn default_type() -> String {
    ITEM_TYPE.to_string()
}

fn deserialize_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    crate::value::deserialize_type(deserializer, ITEM_TYPE)
}

#[cfg(test)]
mod tests {
    use super::Item;
    use crate::{Bbox, Fields, Version};
    use geojson::{Geometry, Value};
    use serde_json::json;

    #[test]
    fn new() {
        let item = Item::new("an-id");
        assert_eq!(item.r#type, "Feature");
        assert_eq!(item.version, Version::v1_1_0);
        assert!(item.geometry.is_none());
        assert!(item.properties.datetime.is_some());
        assert!(item.assets.is_empty());
    }

    #[test]
    fn geometry_is_always_serialized() {
        let value = serde_json::to_value(Item::new("an-id")).unwrap();
        assert!(value.as_object().unwrap().contains_key("geometry"));
        assert!(value["geometry"].is_null());
        assert!(!value.as_object().unwrap().contains_key("bbox"));
        assert!(!value.as_object().unwrap().contains_key("stac_extensions"));
    }

    #[test]
    fn wrong_type() {
        let mut value = serde_json::to_value(Item::new("an-id")).unwrap();
        value["type"] = "Collection".into();
        assert!(serde_json::from_value::<Item>(value).is_err());
    }

    #[test]
    fn read_simple_item() {
        let item: Item = crate::read("data/simple-item.json");
        assert_eq!(item.id, "20201211_223832_CS2");
        assert_eq!(item.version, Version::v1_1_0);
        assert!(item.geometry.is_some());
        assert_eq!(item.assets.len(), 2);
    }

    #[test]
    fn additional_fields_roundtrip() {
        let value = json!({
            "type": "Feature",
            "stac_version": "1.1.0",
            "id": "an-id",
            "geometry": null,
            "properties": {
                "datetime": "2023-01-01T00:00:00Z",
                "eo:cloud_cover": 12.5,
            },
            "links": [],
            "assets": {},
            "foo": "bar",
        });
        let item: Item = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(item.field("eo:cloud_cover").unwrap(), 12.5);
        assert_eq!(item.additional_fields["foo"], "bar");
        assert_eq!(serde_json::to_value(item).unwrap(), value);
    }

    #[test]
    fn set_geometry_3d() {
        let mut item = Item::new("an-id");
        item.set_geometry(Geometry::new(Value::LineString(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
        ])))
        .unwrap();
        assert_eq!(
            item.bbox.unwrap(),
            Bbox::ThreeDimensional([1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        );
    }
}
