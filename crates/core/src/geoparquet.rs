//! Read data from and write data in [stac-geoparquet](https://github.com/stac-utils/stac-geoparquet/blob/main/spec/stac-geoparquet-spec.md).
//!
//! Column types are inferred from every item in the file, so writers buffer
//! their items and encode them all when they're finished.

use crate::{
    Bbox, Catalog, Collection, Error, Item, ItemCollection, Result, Value,
    geoarrow::{self, GEOMETRY_COLUMN, Options, TableBuilder},
};
use bytes::Bytes;
pub use parquet::basic::{BrotliLevel, Compression, GzipLevel, ZstdLevel};
use parquet::{
    arrow::{ArrowWriter, arrow_reader::ParquetRecordBatchReaderBuilder},
    file::{properties::WriterProperties, reader::ChunkReader},
    format::KeyValue,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashMap},
    io::Write,
};

/// Default stac-geoparquet compression.
///
/// Snappy when the compression codecs are compiled in, otherwise none.
pub fn default_compression() -> Option<Compression> {
    if cfg!(feature = "geoparquet-compression") {
        Some(Compression::SNAPPY)
    } else {
        None
    }
}

/// Default stac-geoparquet max row group size
pub const DEFAULT_STAC_MAX_ROW_GROUP_SIZE: usize = 150_000;

/// The stac-geoparquet metadata key.
pub const METADATA_KEY: &str = "stac-geoparquet";

/// The geoparquet metadata key.
pub const GEO_METADATA_KEY: &str = "geo";

/// The stac-geoparquet version.
pub const VERSION: &str = "1.0.0";

/// The geoparquet version written to the `geo` metadata.
pub const GEOPARQUET_VERSION: &str = "1.1.0";

/// Options for writing stac-geoparquet files.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WriterOptions {
    /// Parquet compression codec
    pub compression: Option<Compression>,

    /// Maximum number of rows in a row group
    pub max_row_group_size: usize,
}

impl WriterOptions {
    /// Creates a new WriterOptions with default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::geoparquet::WriterOptions;
    ///
    /// let options = WriterOptions::new();
    /// assert_eq!(options.max_row_group_size, 150_000);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression codec.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::geoparquet::{WriterOptions, Compression};
    ///
    /// let options = WriterOptions::new().with_compression(Compression::SNAPPY);
    /// ```
    pub fn with_compression(mut self, compression: impl Into<Option<Compression>>) -> Self {
        self.compression = compression.into();
        self
    }

    /// Sets the maximum row group size.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::geoparquet::WriterOptions;
    ///
    /// let options = WriterOptions::new().with_max_row_group_size(50000);
    /// ```
    pub fn with_max_row_group_size(mut self, size: usize) -> Self {
        self.max_row_group_size = size;
        self
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            max_row_group_size: DEFAULT_STAC_MAX_ROW_GROUP_SIZE,
        }
    }
}

/// Reads a [ItemCollection] from a [ChunkReader] as
/// [stac-geoparquet](https://github.com/stac-utils/stac-geoparquet).
///
/// The column layout comes from the `stac-geoparquet` file metadata, falling
/// back to the arrow schema metadata, falling back to the flat layout.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use stac::{IntoGeoparquet, Item, geoparquet::WriterOptions};
///
/// let bytes = Item::new("an-id").into_geoparquet_vec(WriterOptions::default()).unwrap();
/// let item_collection = stac::geoparquet::from_reader(Bytes::from(bytes)).unwrap();
/// assert_eq!(item_collection.items[0].id, "an-id");
/// ```
pub fn from_reader<R>(reader: R) -> Result<ItemCollection>
where
    R: ChunkReader + 'static,
{
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let metadata = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .and_then(|key_values| {
            key_values
                .iter()
                .find(|key_value| key_value.key == METADATA_KEY)
        })
        .and_then(|key_value| key_value.value.as_deref())
        .map(serde_json::from_str::<Metadata>)
        .transpose()?;
    let schema_version = match metadata.and_then(|metadata| metadata.schema_version) {
        Some(schema_version) => schema_version,
        None => geoarrow::schema_version(builder.schema())?,
    };
    tracing::debug!("reading stac-geoparquet with schema version {schema_version}");
    let reader = builder.build()?;
    geoarrow::from_record_batch_reader_with_schema_version(reader, schema_version)
}

/// Reads the stac-geoparquet metadata from a [ChunkReader], if there is any.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use stac::{IntoGeoparquet, Item, geoparquet::WriterOptions};
///
/// let bytes = Item::new("an-id").into_geoparquet_vec(WriterOptions::default()).unwrap();
/// let metadata = stac::geoparquet::metadata(Bytes::from(bytes)).unwrap().unwrap();
/// assert_eq!(metadata.version, "1.0.0");
/// assert_eq!(metadata.schema_version, Some(2));
/// ```
pub fn metadata<R>(reader: R) -> Result<Option<Metadata>>
where
    R: ChunkReader + 'static,
{
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .and_then(|key_values| {
            key_values
                .iter()
                .find(|key_value| key_value.key == METADATA_KEY)
        })
        .and_then(|key_value| key_value.value.as_deref())
        .map(|value| serde_json::from_str(value).map_err(Error::from))
        .transpose()
}

/// Writes a [ItemCollection] to a [std::io::Write] as
/// [stac-geoparquet](https://github.com/stac-utils/stac-geoparquet).
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use stac::Item;
///
/// let item: Item = serde_json::from_str(&std::fs::read_to_string("data/simple-item.json").unwrap()).unwrap();
/// let mut cursor = Cursor::new(Vec::new());
/// stac::geoparquet::into_writer(&mut cursor, vec![item]).unwrap();
/// ```
pub fn into_writer<W>(writer: W, item_collection: impl Into<ItemCollection>) -> Result<()>
where
    W: Write + Send,
{
    WriterBuilder::new(writer)
        .build(item_collection.into().items)?
        .finish()
}

/// Writes a [ItemCollection] to a [std::io::Write] as
/// [stac-geoparquet](https://github.com/stac-utils/stac-geoparquet) with the given compression.
pub fn into_writer_with_compression<W>(
    writer: W,
    item_collection: impl Into<ItemCollection>,
    compression: Compression,
) -> Result<()>
where
    W: Write + Send,
{
    WriterBuilder::new(writer)
        .writer_options(WriterOptions::new().with_compression(compression))
        .build(item_collection.into().items)?
        .finish()
}

/// Builder for a stac-geoparquet writer.
#[derive(Debug)]
pub struct WriterBuilder<W: Write + Send> {
    writer: W,
    options: Options,
    writer_options: WriterOptions,
}

/// Write items to stac-geoparquet.
///
/// Items are held in memory until [Writer::finish].
#[derive(Debug)]
pub struct Writer<W: Write + Send> {
    writer: W,
    options: Options,
    writer_options: WriterOptions,
    items: Vec<Item>,
    metadata: Metadata,
}

/// stac-geoparquet metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Metadata {
    /// The stac-geoparquet version.
    pub version: String,

    /// The column layout.
    ///
    /// Files without this were written in the flat layout.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema_version: Option<u32>,

    /// Any STAC collections stored alongside the items.
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub collections: HashMap<String, Collection>,
}

impl<W: Write + Send> WriterBuilder<W> {
    /// Creates a new writer builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use stac::{Item, geoparquet::WriterBuilder};
    ///
    /// let cursor = Cursor::new(Vec::new());
    /// let writer = WriterBuilder::new(cursor).build(vec![Item::new("an-id")]).unwrap();
    /// ```
    pub fn new(writer: W) -> WriterBuilder<W> {
        WriterBuilder {
            writer,
            options: Options::default(),
            writer_options: WriterOptions::default(),
        }
    }

    /// Sets the writer options for parquet writing (compression, row group size, etc).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use stac::{Item, geoparquet::{WriterBuilder, WriterOptions}};
    ///
    /// let cursor = Cursor::new(Vec::new());
    /// let options = WriterOptions::new().with_max_row_group_size(50000);
    /// let writer = WriterBuilder::new(cursor)
    ///     .writer_options(options)
    ///     .build(vec![Item::new("an-id")])
    ///     .unwrap();
    /// ```
    pub fn writer_options(mut self, writer_options: WriterOptions) -> WriterBuilder<W> {
        self.writer_options = writer_options;
        self
    }

    /// Sets the arrow conversion options, e.g. the column layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use stac::{Item, geoarrow::Options, geoparquet::WriterBuilder};
    ///
    /// let cursor = Cursor::new(Vec::new());
    /// let options = Options { schema_version: 1, ..Default::default() };
    /// let writer = WriterBuilder::new(cursor)
    ///     .options(options)
    ///     .build(vec![Item::new("an-id")])
    ///     .unwrap();
    /// ```
    pub fn options(mut self, options: Options) -> WriterBuilder<W> {
        self.options = options;
        self
    }

    /// Builds the writer.
    pub fn build(self, items: Vec<Item>) -> Result<Writer<W>> {
        Ok(Writer {
            writer: self.writer,
            options: self.options,
            writer_options: self.writer_options,
            items,
            metadata: Metadata {
                schema_version: Some(self.options.schema_version),
                ..Default::default()
            },
        })
    }
}

impl<W: Write + Send> Writer<W> {
    /// Adds more items to this writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use stac::{Item, geoparquet::WriterBuilder};
    ///
    /// let cursor = Cursor::new(Vec::new());
    /// let mut writer = WriterBuilder::new(cursor).build(vec![Item::new("a")]).unwrap();
    /// writer.write(vec![Item::new("b")]).unwrap();
    /// writer.finish().unwrap();
    /// ```
    pub fn write(&mut self, items: Vec<Item>) -> Result<()> {
        self.items.extend(items);
        Ok(())
    }

    /// Adds a collection to this writer's metadata.
    ///
    /// Warns and overwrites if there's already a collection with the same id.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Item, Collection, geoparquet::WriterBuilder};
    /// use std::io::Cursor;
    ///
    /// let cursor = Cursor::new(Vec::new());
    /// let writer = WriterBuilder::new(cursor)
    ///     .build(vec![Item::new("an-id")])
    ///     .unwrap()
    ///     .add_collection(Collection::new("an-id", "a description"))
    ///     .unwrap();
    /// writer.finish().unwrap();
    /// ```
    pub fn add_collection(mut self, collection: Collection) -> Result<Writer<W>> {
        if let Some(previous) = self
            .metadata
            .collections
            .insert(collection.id.clone(), collection)
        {
            tracing::warn!(
                "collection with id={} already existed in writer, overwriting",
                previous.id
            );
        }
        Ok(self)
    }

    /// Encodes every item and finishes writing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use stac::{Item, geoparquet::WriterBuilder};
    ///
    /// let cursor = Cursor::new(Vec::new());
    /// let writer = WriterBuilder::new(cursor).build(vec![Item::new("an-id")]).unwrap();
    /// writer.finish().unwrap();
    /// ```
    pub fn finish(self) -> Result<()> {
        let geo = GeoMetadata::new(&self.items);
        let table = TableBuilder {
            item_collection: self.items.into(),
            options: self.options,
        }
        .build()?;
        let (record_batches, schema) = table.into_inner();
        let mut arrow_writer =
            ArrowWriter::try_new(self.writer, schema, Some(self.writer_options.into()))?;
        for record_batch in &record_batches {
            arrow_writer.write(record_batch)?;
        }
        arrow_writer.append_key_value_metadata(KeyValue::new(
            GEO_METADATA_KEY.to_string(),
            serde_json::to_string(&geo)?,
        ));
        arrow_writer.append_key_value_metadata(KeyValue::new(
            METADATA_KEY.to_string(),
            serde_json::to_string(&self.metadata)?,
        ));
        let _ = arrow_writer.finish()?;
        Ok(())
    }
}

/// The geoparquet `geo` file metadata.
#[derive(Debug, Serialize, Deserialize)]
struct GeoMetadata {
    version: String,
    primary_column: String,
    columns: HashMap<String, GeoColumn>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeoColumn {
    encoding: String,
    geometry_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bbox: Option<Vec<f64>>,
}

impl GeoMetadata {
    fn new(items: &[Item]) -> GeoMetadata {
        let mut geometry_types = BTreeSet::new();
        let mut bbox: Option<[f64; 4]> = None;
        for item in items {
            if let Some(geometry) = &item.geometry {
                let _ = geometry_types.insert(geometry_type(&geometry.value));
            }
            if let Some(item_bbox) = item.bbox.as_ref().map(xy) {
                bbox = Some(match bbox {
                    Some(bbox) => [
                        bbox[0].min(item_bbox[0]),
                        bbox[1].min(item_bbox[1]),
                        bbox[2].max(item_bbox[2]),
                        bbox[3].max(item_bbox[3]),
                    ],
                    None => item_bbox,
                });
            }
        }
        let column = GeoColumn {
            encoding: "WKB".to_string(),
            geometry_types: geometry_types.into_iter().collect(),
            bbox: bbox.map(Vec::from),
        };
        GeoMetadata {
            version: GEOPARQUET_VERSION.to_string(),
            primary_column: GEOMETRY_COLUMN.to_string(),
            columns: [(GEOMETRY_COLUMN.to_string(), column)].into_iter().collect(),
        }
    }
}

fn geometry_type(value: &geojson::Value) -> String {
    use geojson::Value::*;
    let (name, has_z) = match value {
        Point(position) => ("Point", position.len() > 2),
        MultiPoint(positions) => ("MultiPoint", positions.iter().any(|p| p.len() > 2)),
        LineString(positions) => ("LineString", positions.iter().any(|p| p.len() > 2)),
        MultiLineString(lines) => ("MultiLineString", lines.iter().flatten().any(|p| p.len() > 2)),
        Polygon(rings) => ("Polygon", rings.iter().flatten().any(|p| p.len() > 2)),
        MultiPolygon(polygons) => (
            "MultiPolygon",
            polygons.iter().flatten().flatten().any(|p| p.len() > 2),
        ),
        GeometryCollection(_) => ("GeometryCollection", false),
    };
    if has_z {
        format!("{name} Z")
    } else {
        name.to_string()
    }
}

fn xy(bbox: &Bbox) -> [f64; 4] {
    match bbox {
        Bbox::TwoDimensional(bbox) => *bbox,
        Bbox::ThreeDimensional([xmin, ymin, _, xmax, ymax, _]) => [*xmin, *ymin, *xmax, *ymax],
    }
}

/// Create a STAC object from geoparquet data.
pub trait FromGeoparquet: Sized {
    /// Creates a STAC object from geoparquet bytes.
    fn from_geoparquet_bytes(bytes: impl Into<Bytes>) -> Result<Self>;
}

/// Write a STAC object to geoparquet.
pub trait IntoGeoparquet: Sized {
    /// Writes a value to a writer as stac-geoparquet.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{IntoGeoparquet, ItemCollection, Item};
    /// use stac::geoparquet::WriterOptions;
    ///
    /// let item_collection: ItemCollection = vec![Item::new("a"), Item::new("b")].into();
    /// let mut buf = Vec::new();
    /// item_collection.into_geoparquet_writer(&mut buf, WriterOptions::default()).unwrap();
    /// ```
    fn into_geoparquet_writer(
        self,
        writer: impl Write + Send,
        writer_options: WriterOptions,
    ) -> Result<()>;

    /// Writes a value as stac-geoparquet to some bytes.
    fn into_geoparquet_vec(self, writer_options: WriterOptions) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.into_geoparquet_writer(&mut buf, writer_options)?;
        Ok(buf)
    }
}

macro_rules! impl_from_geoparquet {
    ($object:ty) => {
        impl FromGeoparquet for $object {
            fn from_geoparquet_bytes(_: impl Into<Bytes>) -> Result<Self> {
                Err(Error::UnsupportedGeoparquetType)
            }
        }
    };
}
macro_rules! impl_into_geoparquet {
    ($object:ty) => {
        impl IntoGeoparquet for $object {
            fn into_geoparquet_writer(self, _: impl Write + Send, _: WriterOptions) -> Result<()> {
                Err(Error::UnsupportedGeoparquetType)
            }
        }
    };
}

impl_from_geoparquet!(Item);
impl_from_geoparquet!(Catalog);
impl_from_geoparquet!(Collection);
impl_into_geoparquet!(Catalog);
impl_into_geoparquet!(Collection);

impl FromGeoparquet for ItemCollection {
    fn from_geoparquet_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        from_reader(bytes.into())
    }
}

impl FromGeoparquet for Value {
    fn from_geoparquet_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        Ok(Value::ItemCollection(
            ItemCollection::from_geoparquet_bytes(bytes)?,
        ))
    }
}

impl IntoGeoparquet for ItemCollection {
    fn into_geoparquet_writer(
        self,
        writer: impl Write + Send,
        writer_options: WriterOptions,
    ) -> Result<()> {
        WriterBuilder::new(writer)
            .writer_options(writer_options)
            .build(self.items)?
            .finish()
    }
}

impl IntoGeoparquet for Item {
    fn into_geoparquet_writer(
        self,
        writer: impl Write + Send,
        writer_options: WriterOptions,
    ) -> Result<()> {
        ItemCollection::from(vec![self]).into_geoparquet_writer(writer, writer_options)
    }
}

impl IntoGeoparquet for Value {
    fn into_geoparquet_writer(
        self,
        writer: impl Write + Send,
        writer_options: WriterOptions,
    ) -> Result<()> {
        ItemCollection::try_from(self)?.into_geoparquet_writer(writer, writer_options)
    }
}

impl IntoGeoparquet for serde_json::Value {
    fn into_geoparquet_writer(
        self,
        writer: impl Write + Send,
        writer_options: WriterOptions,
    ) -> Result<()> {
        Value::try_from(self)?.into_geoparquet_writer(writer, writer_options)
    }
}

impl From<WriterOptions> for WriterProperties {
    fn from(value: WriterOptions) -> Self {
        let mut builder = WriterProperties::builder();
        if let Some(compression) = value.compression {
            builder = builder.set_compression(compression);
        }
        builder = builder.set_max_row_group_size(value.max_row_group_size);
        builder.build()
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            version: VERSION.to_string(),
            schema_version: None,
            collections: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{METADATA_KEY, Metadata, VERSION, WriterBuilder, WriterOptions};
    use crate::{
        Collection, Error, FromGeoparquet, IntoGeoparquet, Item, ItemCollection, SelfHref, Value,
        geoarrow::Options,
    };
    use bytes::Bytes;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use std::io::Cursor;

    fn simple_item() -> Item {
        let mut item: Item = crate::read("data/simple-item.json");
        item.clear_self_href();
        item
    }

    fn key_value(bytes: Bytes, key: &str) -> serde_json::Value {
        let reader = SerializedFileReader::new(bytes).unwrap();
        let value = reader
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .unwrap()
            .iter()
            .find(|key_value| key_value.key == key)
            .unwrap()
            .value
            .clone()
            .unwrap();
        serde_json::from_str(&value).unwrap()
    }

    #[test]
    fn roundtrip() {
        let item = simple_item();
        let mut cursor = Cursor::new(Vec::new());
        super::into_writer(&mut cursor, vec![item.clone()]).unwrap();
        let bytes = Bytes::from(cursor.into_inner());
        let item_collection = super::from_reader(bytes).unwrap();
        assert_eq!(item_collection.items[0], item);
    }

    #[test]
    fn roundtrip_flat_layout() {
        let item = simple_item();
        let mut cursor = Cursor::new(Vec::new());
        WriterBuilder::new(&mut cursor)
            .options(Options {
                schema_version: 1,
                ..Default::default()
            })
            .build(vec![item.clone()])
            .unwrap()
            .finish()
            .unwrap();
        let bytes = Bytes::from(cursor.into_inner());
        let metadata: Metadata =
            serde_json::from_value(key_value(bytes.clone(), METADATA_KEY)).unwrap();
        assert_eq!(metadata.schema_version, Some(1));
        let item_collection = super::from_reader(bytes).unwrap();
        assert_eq!(item_collection.items[0], item);
    }

    #[test]
    fn from_file() {
        let file = tempfile::tempfile().unwrap();
        super::into_writer(file.try_clone().unwrap(), vec![simple_item()]).unwrap();
        let item_collection = super::from_reader(file).unwrap();
        assert_eq!(item_collection.items.len(), 1);
    }

    #[test]
    fn geo_metadata() {
        let item = simple_item();
        let bytes = Bytes::from(item.into_geoparquet_vec(WriterOptions::default()).unwrap());
        let geo = key_value(bytes, "geo");
        assert_eq!(geo["primary_column"], "geometry");
        assert_eq!(geo["columns"]["geometry"]["encoding"], "WKB");
        assert_eq!(
            geo["columns"]["geometry"]["geometry_types"],
            serde_json::json!(["Polygon"])
        );
    }

    #[test]
    fn all_null_geometries() {
        let mut a = simple_item();
        a.geometry = None;
        a.bbox = None;
        let mut b = a.clone();
        b.id = "b".to_string();
        let bytes = Bytes::from(
            ItemCollection::from(vec![a.clone(), b.clone()])
                .into_geoparquet_vec(WriterOptions::default())
                .unwrap(),
        );
        let item_collection = ItemCollection::from_geoparquet_bytes(bytes).unwrap();
        assert_eq!(item_collection.items, vec![a, b]);
    }

    #[test]
    fn no_assets() {
        let mut item = simple_item();
        item.assets = Default::default();
        let bytes = Bytes::from(item.into_geoparquet_vec(WriterOptions::default()).unwrap());
        let item_collection = super::from_reader(bytes).unwrap();
        assert!(item_collection.items[0].assets.is_empty());
    }

    #[test]
    fn custom_max_row_group_size() {
        let item = simple_item();
        let items: Vec<Item> = (0..100)
            .map(|i| {
                let mut item = item.clone();
                item.id = format!("item-{i}");
                item
            })
            .collect();
        let mut cursor = Cursor::new(Vec::new());
        WriterBuilder::new(&mut cursor)
            .writer_options(WriterOptions::new().with_max_row_group_size(25))
            .build(items)
            .unwrap()
            .finish()
            .unwrap();
        let reader = SerializedFileReader::new(Bytes::from(cursor.into_inner())).unwrap();
        assert_eq!(reader.metadata().num_row_groups(), 4);
    }

    #[test]
    fn write_more_items() {
        let a = simple_item();
        let mut b = simple_item();
        b.id = "b".to_string();
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WriterBuilder::new(&mut cursor).build(vec![a]).unwrap();
        writer.write(vec![b]).unwrap();
        writer.finish().unwrap();
        let item_collection = super::from_reader(Bytes::from(cursor.into_inner())).unwrap();
        assert_eq!(item_collection.items.len(), 2);
        assert_eq!(item_collection.items[1].id, "b");
    }

    #[test]
    fn collections_in_metadata() {
        let mut cursor = Cursor::new(Vec::new());
        WriterBuilder::new(&mut cursor)
            .build(vec![simple_item()])
            .unwrap()
            .add_collection(Collection::new("an-id", "a description"))
            .unwrap()
            .finish()
            .unwrap();
        let metadata = super::metadata(Bytes::from(cursor.into_inner()))
            .unwrap()
            .unwrap();
        assert_eq!(metadata.version, VERSION);
        assert_eq!(metadata.schema_version, Some(2));
        assert_eq!(metadata.collections["an-id"].description, "a description");
    }

    #[test]
    fn no_items() {
        let err = ItemCollection::default()
            .into_geoparquet_vec(WriterOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoItems));
    }

    #[test]
    fn catalogs_are_unsupported() {
        let err = crate::Catalog::new("an-id", "a description")
            .into_geoparquet_vec(WriterOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedGeoparquetType));
        assert!(matches!(
            Item::from_geoparquet_bytes(Vec::new()).unwrap_err(),
            Error::UnsupportedGeoparquetType
        ));
    }

    #[test]
    fn value_from_bytes() {
        let bytes = Bytes::from(
            simple_item()
                .into_geoparquet_vec(WriterOptions::default())
                .unwrap(),
        );
        assert!(Value::from_geoparquet_bytes(bytes).unwrap().is_item_collection());
    }
}
