//! Convert between [ItemCollection] and arrow [RecordBatch]es.
//!
//! Two column layouts ("schema versions") are supported:
//!
//! - **1**: the flat [stac-geoparquet
//!   1.0](https://github.com/stac-utils/stac-geoparquet/blob/main/spec/stac-geoparquet-spec.md)
//!   layout, where every property is a top-level column and `bbox` is a struct.
//! - **2** (the default): properties without a namespace live in a
//!   `properties` struct column, each [supported extension
//!   namespace](EXTENSION_NAMESPACES) gets its own struct column with the
//!   prefix stripped from its field names, and `bbox` is a fixed-size list.
//!
//! In both layouts `geometry` is a WKB binary column, the three datetimes are
//! UTC nanosecond timestamps, and anything that can't be given a column (an
//! unsupported namespace, an unknown top-level field, a null or empty
//! property value) is kept as JSON in the `additional_fields` column.
//!
//! Column types are inferred from the union of all items, so a key must have
//! the same JSON type in every item. A key whose numbers are integers in some
//! items and floats in others is kept in `additional_fields`, so `1` doesn't
//! come back as `1.0`. Nested `null`s and empty nested objects don't survive a
//! round trip.

pub mod json;

use crate::{Bbox, Error, Item, ItemCollection, Result};
use arrow_array::{
    Array, ArrayRef, BinaryArray, RecordBatch, RecordBatchIterator, RecordBatchReader, StringArray,
    builder::{FixedSizeListBuilder, Float64Builder, ListBuilder},
};
use arrow_json::ReaderBuilder;
use arrow_schema::{DataType, Field, Schema, SchemaRef, TimeUnit};
use chrono::{DateTime, SecondsFormat, Utc};
use geozero::{CoordDimensions, ToWkb, geojson::GeoJson};
use serde_json::{Map, Value};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// The stac-geoparquet version metadata key.
pub const VERSION_KEY: &str = "stac_geoparquet:version";

/// The stac-geoparquet version.
pub const VERSION: &str = "1.0.0";

/// The column layout metadata key.
pub const SCHEMA_VERSION_KEY: &str = "stac_geoparquet:schema_version";

/// The column layout written by default.
pub const DEFAULT_SCHEMA_VERSION: u32 = 2;

/// The column layouts we can read and write.
pub const SCHEMA_VERSIONS: [u32; 2] = [1, 2];

/// The geometry column name.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// The catch-all JSON column name.
pub const ADDITIONAL_FIELDS_COLUMN: &str = "additional_fields";

/// Extension namespaces that get their own struct column in schema version 2.
pub const EXTENSION_NAMESPACES: [&str; 13] = [
    "eo",
    "file",
    "grid",
    "landsat",
    "mgrs",
    "processing",
    "proj",
    "raster",
    "sar",
    "sat",
    "sci",
    "storage",
    "view",
];

pub(crate) const DATETIME_COLUMNS: [&str; 3] = ["datetime", "start_datetime", "end_datetime"];

/// Top-level item keys that are never properties.
pub(crate) const TOP_LEVEL_KEYS: [&str; 10] = [
    "type",
    "stac_version",
    "stac_extensions",
    "id",
    "geometry",
    "bbox",
    "links",
    "assets",
    "collection",
    ADDITIONAL_FIELDS_COLUMN,
];

/// Options for converting items to arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// The column layout to write.
    pub schema_version: u32,

    /// Whether to drop invalid attributes.
    ///
    /// In the flat (version 1) layout, a property whose name collides with a
    /// top-level column is invalid. If false, an invalid attribute will cause
    /// an error. If true, it is dropped with a warning.
    pub drop_invalid_attributes: bool,
}

/// A geoarrow table.
///
/// An arrow-ish analog to [ItemCollection].
#[derive(Debug)]
pub struct Table {
    record_batches: Vec<RecordBatch>,
    schema: SchemaRef,
}

/// A builder for converting an [ItemCollection] to a [Table]
///
/// # Examples
///
/// ```
/// use stac::{Item, geoarrow::{Options, TableBuilder}};
///
/// let builder = TableBuilder {
///     item_collection: vec![Item::new("an-id")].into(),
///     options: Options::default(),
/// };
/// let table = builder.build().unwrap();
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug)]
pub struct TableBuilder {
    /// The item collection.
    pub item_collection: ItemCollection,

    /// Conversion options.
    pub options: Options,
}

/// Keys whose numbers mix integers and floats across items.
#[derive(Debug, Default)]
struct MixedNumbers {
    top_level: HashSet<String>,
    properties: HashSet<String>,
}

/// The parts of an item that get hand-built columns.
struct Row {
    json: Value,
    wkb: Option<Vec<u8>>,
    bbox: Option<Bbox>,
    additional_fields: Option<String>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            schema_version: DEFAULT_SCHEMA_VERSION,
            drop_invalid_attributes: true,
        }
    }
}

impl TableBuilder {
    /// Builds a [Table]
    pub fn build(self) -> Result<Table> {
        let schema_version = self.options.schema_version;
        if !SCHEMA_VERSIONS.contains(&schema_version) {
            return Err(Error::UnsupportedSchemaVersion(schema_version));
        }
        if self.item_collection.items.is_empty() {
            return Err(Error::NoItems);
        }
        let mixed = MixedNumbers::new(&self.item_collection.items)?;
        let rows = self
            .item_collection
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                to_row(item, self.options, &mixed).map_err(|err| match err {
                    Error::Codec { .. } | Error::InvalidAttribute(_) => err,
                    err => Error::codec(format!("row {i}"), err),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let json_rows: Vec<&Value> = rows.iter().map(|row| &row.json).collect();
        let inferred = arrow_json::reader::infer_json_schema_from_iterator(
            json_rows.iter().map(|value| Ok(*value)),
        )?;
        let json_schema = Arc::new(override_reserved_fields(inferred, schema_version));
        let mut decoder = ReaderBuilder::new(json_schema.clone())
            .with_batch_size(rows.len())
            .build_decoder()?;
        decoder.serialize(&json_rows)?;
        let record_batch = decoder.flush()?.ok_or(Error::NoItems)?;

        let mut fields: Vec<Arc<Field>> = json_schema.fields().iter().cloned().collect();
        let mut columns = record_batch.columns().to_vec();
        let (geometry_field, geometry_column) = geometry_column(&rows);
        fields.push(geometry_field.into());
        columns.push(geometry_column);
        if schema_version >= 2 {
            let (bbox_field, bbox_column) = bbox_column(&rows);
            fields.push(bbox_field.into());
            columns.push(bbox_column);
        }
        fields.push(Field::new(ADDITIONAL_FIELDS_COLUMN, DataType::Utf8, true).into());
        columns.push(Arc::new(StringArray::from(
            rows.iter()
                .map(|row| row.additional_fields.clone())
                .collect::<Vec<_>>(),
        )));

        let metadata = HashMap::from([
            (VERSION_KEY.to_string(), VERSION.to_string()),
            (SCHEMA_VERSION_KEY.to_string(), schema_version.to_string()),
        ]);
        let schema = Arc::new(Schema::new(fields).with_metadata(metadata));
        let record_batch = RecordBatch::try_new(schema.clone(), columns)?;
        Ok(Table {
            record_batches: vec![record_batch],
            schema,
        })
    }
}

impl Table {
    /// Creates a [Table] from a vector of record batches and a schema.
    pub fn new(record_batches: Vec<RecordBatch>, schema: SchemaRef) -> Table {
        Table {
            record_batches,
            schema,
        }
    }

    /// Creates a [Table] from a [ItemCollection] with the default options.
    ///
    /// For more control over the conversion, use a [TableBuilder].
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Item, geoarrow::Table};
    ///
    /// let table = Table::from_item_collection(vec![Item::new("an-id")]).unwrap();
    /// assert_eq!(table.schema().metadata["stac_geoparquet:schema_version"], "2");
    /// ```
    pub fn from_item_collection(item_collection: impl Into<ItemCollection>) -> Result<Table> {
        TableBuilder {
            item_collection: item_collection.into(),
            options: Options::default(),
        }
        .build()
    }

    /// Returns this table's schema as a reference.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Converts this table into a [RecordBatchIterator].
    pub fn into_reader(self) -> impl RecordBatchReader {
        RecordBatchIterator::new(self.record_batches.into_iter().map(Ok), self.schema)
    }

    /// Converts this table into its record batches and schema.
    pub fn into_inner(self) -> (Vec<RecordBatch>, SchemaRef) {
        (self.record_batches, self.schema)
    }

    /// Returns the total number of records in this table.
    pub fn len(&self) -> usize {
        self.record_batches
            .iter()
            .map(|record_batch| record_batch.num_rows())
            .sum()
    }

    /// Returns true if this table has no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Converts a [RecordBatchReader] to an [ItemCollection].
///
/// The column layout is read from the schema's
/// `stac_geoparquet:schema_version` metadata, and is assumed to be the flat
/// layout (version 1) when that's missing.
///
/// # Examples
///
/// ```
/// use stac::{Item, geoarrow::Table};
///
/// let table = Table::from_item_collection(vec![Item::new("an-id")]).unwrap();
/// let item_collection = stac::geoarrow::from_record_batch_reader(table.into_reader()).unwrap();
/// assert_eq!(item_collection.items[0].id, "an-id");
/// ```
pub fn from_record_batch_reader<R: RecordBatchReader>(reader: R) -> Result<ItemCollection> {
    let schema_version = schema_version(&reader.schema())?;
    from_record_batch_reader_with_schema_version(reader, schema_version)
}

/// Converts a [RecordBatchReader] in the given column layout to an [ItemCollection].
pub fn from_record_batch_reader_with_schema_version<R: RecordBatchReader>(
    reader: R,
    schema_version: u32,
) -> Result<ItemCollection> {
    if !SCHEMA_VERSIONS.contains(&schema_version) {
        return Err(Error::UnsupportedSchemaVersion(schema_version));
    }
    let mut items = Vec::new();
    for record_batch in reader {
        let record_batch = record_batch?;
        let offset = items.len();
        for (i, object) in json::record_batch_to_items(&record_batch, schema_version)?
            .into_iter()
            .enumerate()
        {
            let row = offset + i;
            let item: Item = serde_json::from_value(Value::Object(object))
                .map_err(|err| Error::codec(format!("row {row}"), err))?;
            items.push(item);
        }
    }
    Ok(items.into())
}

/// Reads the column layout version from a schema's metadata.
pub fn schema_version(schema: &Schema) -> Result<u32> {
    match schema.metadata().get(SCHEMA_VERSION_KEY) {
        Some(version) => version
            .parse()
            .map_err(|err| Error::codec(SCHEMA_VERSION_KEY, err)),
        None => Ok(1),
    }
}

/// Adds geoarrow wkb metadata to a geometry field.
pub fn add_wkb_metadata(field: Field) -> Field {
    let mut metadata = field.metadata().clone();
    let _ = metadata.insert(
        "ARROW:extension:name".to_string(),
        "geoarrow.wkb".to_string(),
    );
    let _ = metadata.insert("ARROW:extension:metadata".to_string(), "{}".to_string());
    field.with_metadata(metadata)
}

impl MixedNumbers {
    fn new(items: &[Item]) -> Result<MixedNumbers> {
        let mut kinds = HashMap::new();
        for item in items {
            let value = serde_json::to_value(item)?;
            number_kinds(&value, &mut Vec::new(), &mut kinds);
        }
        let mut mixed = MixedNumbers::default();
        for (path, (integer, float)) in kinds {
            if !(integer && float) {
                continue;
            }
            match path.as_slice() {
                [properties, key, ..] if properties == "properties" => {
                    let _ = mixed.properties.insert(key.clone());
                }
                [key, ..] => {
                    let _ = mixed.top_level.insert(key.clone());
                }
                [] => {}
            }
        }
        Ok(mixed)
    }
}

/// Records, per path, whether integers and floats were seen there.
///
/// Array elements share the `[]` path segment, since they share a column type.
fn number_kinds(
    value: &Value,
    path: &mut Vec<String>,
    kinds: &mut HashMap<Vec<String>, (bool, bool)>,
) {
    match value {
        Value::Number(number) => {
            let kind = kinds.entry(path.clone()).or_default();
            if number.is_f64() {
                kind.1 = true;
            } else {
                kind.0 = true;
            }
        }
        Value::Array(array) => {
            path.push("[]".to_string());
            for value in array {
                number_kinds(value, path, kinds);
            }
            let _ = path.pop();
        }
        Value::Object(object) => {
            for (key, value) in object {
                path.push(key.clone());
                number_kinds(value, path, kinds);
                let _ = path.pop();
            }
        }
        _ => {}
    }
}

fn to_row(mut item: Item, options: Options, mixed: &MixedNumbers) -> Result<Row> {
    let wkb = item.geometry.take().map(|geometry| to_wkb(&geometry)).transpose()?;
    let bbox = item.bbox.take();
    let datetimes = [
        item.properties.datetime.take(),
        item.properties.start_datetime.take(),
        item.properties.end_datetime.take(),
    ];
    let object = crate::fields::into_object(serde_json::to_value(item)?)?;

    let mut row = Map::new();
    let mut catch_all = Map::new();
    let mut catch_all_properties = Map::new();
    let mut properties = Map::new();
    for (key, value) in object {
        match key.as_str() {
            "type" | "stac_version" | "id" | "collection" => {
                let _ = row.insert(key, value);
            }
            "stac_extensions" => {
                let _ = row.insert(key, value);
            }
            "links" | "assets" if mixed.top_level.contains(&key) => {
                let _ = catch_all.insert(key, value);
            }
            "links" | "assets" => {
                if !is_empty_container(&value) {
                    let _ = row.insert(key, value);
                }
            }
            "properties" => properties = crate::fields::into_object(value)?,
            _ => {
                let _ = catch_all.insert(key, value);
            }
        }
    }
    let _ = row
        .entry("stac_extensions")
        .or_insert_with(|| Value::Array(Vec::new()));
    for (key, datetime) in DATETIME_COLUMNS.iter().zip(datetimes) {
        let _ = properties.remove(*key);
        let _ = row.insert(key.to_string(), datetime.map(format_datetime).into());
    }

    let mut namespaces: Map<String, Value> = Map::new();
    let mut flat_properties = Map::new();
    for (key, value) in properties {
        if value.is_null() || is_empty_container(&value) || mixed.properties.contains(&key) {
            let _ = catch_all_properties.insert(key, value);
            continue;
        }
        if options.schema_version == 1 {
            if TOP_LEVEL_KEYS.contains(&key.as_str()) {
                if options.drop_invalid_attributes {
                    tracing::warn!("dropping property that collides with a top-level column: {key}");
                    continue;
                } else {
                    return Err(Error::InvalidAttribute(key));
                }
            }
            let _ = row.insert(key, value);
        } else if let Some((namespace, name)) = key
            .split_once(':')
            .filter(|(namespace, _)| EXTENSION_NAMESPACES.contains(namespace))
        {
            if let Value::Object(fields) = namespaces
                .entry(namespace)
                .or_insert_with(|| Value::Object(Map::new()))
            {
                let _ = fields.insert(name.to_string(), value);
            }
        } else if key.contains(':') {
            let _ = catch_all_properties.insert(key, value);
        } else {
            let _ = flat_properties.insert(key, value);
        }
    }
    if options.schema_version == 1 {
        if let Some(bbox) = &bbox {
            let _ = row.insert("bbox".into(), bbox_struct(bbox));
        }
    } else {
        if !flat_properties.is_empty() {
            let _ = row.insert("properties".into(), Value::Object(flat_properties));
        }
        row.extend(namespaces);
    }

    if !catch_all_properties.is_empty() {
        let _ = catch_all.insert("properties".into(), Value::Object(catch_all_properties));
    }
    let additional_fields = if catch_all.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&catch_all)?)
    };
    Ok(Row {
        json: Value::Object(row),
        wkb,
        bbox,
        additional_fields,
    })
}

fn override_reserved_fields(schema: Schema, schema_version: u32) -> Schema {
    let timestamp = DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into()));
    let mut fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| {
            let name = field.name().as_str();
            if DATETIME_COLUMNS.contains(&name) {
                Field::new(name, timestamp.clone(), true)
            } else if name == "stac_extensions" {
                Field::new_list(name, Field::new_list_field(DataType::Utf8, true), true)
            } else {
                Field::clone(field)
            }
        })
        .collect();
    if !fields.iter().any(|field| field.name() == "collection") {
        fields.push(Field::new("collection", DataType::Utf8, true));
    }
    if schema_version == 1 && !fields.iter().any(|field| field.name() == "bbox") {
        let bbox_fields: Vec<Field> = ["xmin", "ymin", "xmax", "ymax"]
            .into_iter()
            .map(|name| Field::new(name, DataType::Float64, true))
            .collect();
        fields.push(Field::new("bbox", DataType::Struct(bbox_fields.into()), true));
    }
    Schema::new(fields)
}

fn geometry_column(rows: &[Row]) -> (Field, ArrayRef) {
    let array = BinaryArray::from_iter(rows.iter().map(|row| row.wkb.as_deref()));
    let field = add_wkb_metadata(Field::new(GEOMETRY_COLUMN, DataType::Binary, true));
    (field, Arc::new(array))
}

fn bbox_column(rows: &[Row]) -> (Field, ArrayRef) {
    let mut widths = rows.iter().filter_map(|row| row.bbox.map(|bbox| bbox.len()));
    let first = widths.next().unwrap_or(4);
    if widths.all(|width| width == first) {
        let width = i32::try_from(first).unwrap_or(4);
        let mut builder = FixedSizeListBuilder::new(Float64Builder::new(), width);
        for row in rows {
            match &row.bbox {
                Some(bbox) => {
                    builder.values().append_slice(bbox.as_slice());
                    builder.append(true);
                }
                None => {
                    builder.values().append_nulls(first);
                    builder.append(false);
                }
            }
        }
        let array = builder.finish();
        let field = Field::new("bbox", array.data_type().clone(), true);
        (field, Arc::new(array))
    } else {
        let mut builder = ListBuilder::new(Float64Builder::new());
        for row in rows {
            match &row.bbox {
                Some(bbox) => {
                    builder.values().append_slice(bbox.as_slice());
                    builder.append(true);
                }
                None => builder.append(false),
            }
        }
        let array = builder.finish();
        let field = Field::new("bbox", array.data_type().clone(), true);
        (field, Arc::new(array))
    }
}

fn bbox_struct(bbox: &Bbox) -> Value {
    let names: &[&str] = if bbox.is_3d() {
        &["xmin", "ymin", "zmin", "xmax", "ymax", "zmax"]
    } else {
        &["xmin", "ymin", "xmax", "ymax"]
    };
    Value::Object(
        names
            .iter()
            .zip(bbox.as_slice())
            .map(|(name, value)| (name.to_string(), Value::from(*value)))
            .collect(),
    )
}

fn to_wkb(geometry: &geojson::Geometry) -> Result<Vec<u8>> {
    let dimensions = if has_z(&geometry.value) {
        CoordDimensions::xyz()
    } else {
        CoordDimensions::xy()
    };
    let geojson = serde_json::to_string(geometry)?;
    GeoJson(&geojson).to_wkb(dimensions).map_err(Error::from)
}

fn has_z(value: &geojson::Value) -> bool {
    use geojson::Value::*;
    match value {
        Point(position) => position.len() > 2,
        MultiPoint(positions) | LineString(positions) => positions.iter().any(|p| p.len() > 2),
        MultiLineString(lines) | Polygon(lines) => lines.iter().flatten().any(|p| p.len() > 2),
        MultiPolygon(polygons) => polygons.iter().flatten().flatten().any(|p| p.len() > 2),
        GeometryCollection(geometries) => geometries.iter().any(|g| has_z(&g.value)),
    }
}

fn format_datetime(datetime: DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(object) => object.is_empty(),
        Value::Array(array) => array.is_empty(),
        _ => false,
    }
}
