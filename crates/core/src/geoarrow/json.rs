//! Decode arrow record batches into JSON item objects.

use super::{
    ADDITIONAL_FIELDS_COLUMN, DATETIME_COLUMNS, EXTENSION_NAMESPACES, GEOMETRY_COLUMN,
    TOP_LEVEL_KEYS,
};
use crate::{Error, Result};
use arrow_array::{
    Array, ArrayRef, RecordBatch,
    cast::AsArray,
    types::{Float64Type, TimestampNanosecondType},
};
use arrow_json::ArrayWriter;
use arrow_schema::{DataType, TimeUnit};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use geozero::{CoordDimensions, GeozeroGeometry, geojson::GeoJsonWriter, wkb::Wkb};
use serde_json::{Map, Value};

/// Converts a record batch into one JSON object per row.
///
/// Each object has the shape of a STAC item, but hasn't been checked.
pub fn record_batch_to_items(
    record_batch: &RecordBatch,
    schema_version: u32,
) -> Result<Vec<Map<String, Value>>> {
    let schema = record_batch.schema();
    let num_rows = record_batch.num_rows();
    let mut geometries = None;
    let mut bboxes = None;
    let mut datetimes = Vec::new();
    let mut additional_fields = None;
    let mut json_columns = Vec::new();
    for (index, field) in schema.fields().iter().enumerate() {
        let column = record_batch.column(index);
        let name = field.name().as_str();
        if name == GEOMETRY_COLUMN {
            geometries = Some(decode_geometries(column)?);
        } else if name == "bbox" && !matches!(field.data_type(), DataType::Struct(_)) {
            bboxes = Some(decode_bboxes(column)?);
        } else if DATETIME_COLUMNS.contains(&name) {
            datetimes.push((name, decode_datetimes(column)?));
        } else if name == ADDITIONAL_FIELDS_COLUMN {
            additional_fields = Some(decode_additional_fields(column)?);
        } else {
            json_columns.push(index);
        }
    }

    let mut rows = record_batch_to_json_rows(&record_batch.project(&json_columns)?)?;
    rows.resize_with(num_rows, Map::new);
    for (i, row) in rows.iter_mut().enumerate() {
        let mut properties = if schema_version == 1 {
            let keys: Vec<String> = row
                .keys()
                .filter(|key| !TOP_LEVEL_KEYS.contains(&key.as_str()))
                .cloned()
                .collect();
            keys.into_iter()
                .filter_map(|key| row.remove(&key).map(|value| (key, value)))
                .collect()
        } else {
            let mut properties = match row.remove("properties") {
                Some(Value::Object(properties)) => properties,
                _ => Map::new(),
            };
            for namespace in EXTENSION_NAMESPACES {
                if let Some(Value::Object(fields)) = row.remove(namespace) {
                    for (key, value) in fields {
                        let _ = properties.insert(format!("{namespace}:{key}"), value);
                    }
                }
            }
            properties
        };
        if let Some(Value::Object(bbox)) = row.remove("bbox") {
            let _ = row.insert("bbox".into(), bbox_from_struct(&bbox));
        }
        for (name, values) in &datetimes {
            if let Some(datetime) = values[i] {
                let _ = properties.insert(
                    name.to_string(),
                    datetime
                        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
                        .into(),
                );
            }
        }
        if let Some(additional_fields) = additional_fields.as_mut() {
            if let Some(mut fields) = additional_fields[i].take() {
                if let Some(Value::Object(extra)) = fields.remove("properties") {
                    properties.extend(extra);
                }
                row.extend(fields);
            }
        }
        let geometry = geometries
            .as_mut()
            .and_then(|geometries| geometries[i].take())
            .unwrap_or(Value::Null);
        let _ = row.insert(GEOMETRY_COLUMN.into(), geometry);
        if let Some(bbox) = bboxes.as_mut().and_then(|bboxes| bboxes[i].take()) {
            let _ = row.insert("bbox".into(), bbox.into());
        }
        let _ = row.insert("properties".into(), Value::Object(properties));
        let _ = row
            .entry("links")
            .or_insert_with(|| Value::Array(Vec::new()));
        let _ = row
            .entry("assets")
            .or_insert_with(|| Value::Object(Map::new()));
    }
    Ok(rows)
}

/// Writes a record batch with arrow's json writer and reads the rows back.
///
/// Null values are omitted.
pub fn record_batch_to_json_rows(record_batch: &RecordBatch) -> Result<Vec<Map<String, Value>>> {
    if record_batch.num_columns() == 0 || record_batch.num_rows() == 0 {
        return Ok(Vec::new());
    }
    let mut writer = ArrayWriter::new(Vec::new());
    writer.write(record_batch)?;
    writer.finish()?;
    let buf = writer.into_inner();
    if buf.is_empty() {
        Ok(Vec::new())
    } else {
        serde_json::from_slice(&buf).map_err(Error::from)
    }
}

fn decode_geometries(column: &ArrayRef) -> Result<Vec<Option<Value>>> {
    match column.data_type() {
        DataType::Binary => column
            .as_binary::<i32>()
            .iter()
            .map(|wkb| wkb.map(wkb_to_geojson).transpose())
            .collect(),
        DataType::LargeBinary => column
            .as_binary::<i64>()
            .iter()
            .map(|wkb| wkb.map(wkb_to_geojson).transpose())
            .collect(),
        DataType::Null => Ok(vec![None; column.len()]),
        _ => Err(Error::UnsupportedGeoparquetType),
    }
}

fn wkb_to_geojson(wkb: &[u8]) -> Result<Value> {
    let dimensions = if wkb_has_z(wkb) {
        CoordDimensions::xyz()
    } else {
        CoordDimensions::xy()
    };
    let mut buf = Vec::new();
    let mut writer = GeoJsonWriter::with_dims(&mut buf, dimensions);
    Wkb(wkb.to_vec()).process_geom(&mut writer)?;
    serde_json::from_slice(&buf).map_err(Error::from)
}

/// Reads the z flag out of an ISO or extended WKB header.
fn wkb_has_z(wkb: &[u8]) -> bool {
    let Some(header) = wkb.get(1..5).and_then(|bytes| <[u8; 4]>::try_from(bytes).ok()) else {
        return false;
    };
    let geometry_type = match wkb[0] {
        0 => u32::from_be_bytes(header),
        _ => u32::from_le_bytes(header),
    };
    geometry_type & 0x8000_0000 != 0 || matches!((geometry_type & 0xFFFF) / 1000, 1 | 3)
}

fn decode_bboxes(column: &ArrayRef) -> Result<Vec<Option<Vec<f64>>>> {
    let lists: Vec<Option<ArrayRef>> = match column.data_type() {
        DataType::FixedSizeList(_, _) => column.as_fixed_size_list().iter().collect(),
        DataType::List(_) => column.as_list::<i32>().iter().collect(),
        DataType::LargeList(_) => column.as_list::<i64>().iter().collect(),
        DataType::Null => vec![None; column.len()],
        _ => return Err(Error::UnsupportedGeoparquetType),
    };
    lists
        .into_iter()
        .map(|values| {
            values
                .map(|values| {
                    let values = arrow_cast::cast(&values, &DataType::Float64)?;
                    Ok(values.as_primitive::<Float64Type>().values().to_vec())
                })
                .transpose()
        })
        .collect()
}

fn bbox_from_struct(bbox: &Map<String, Value>) -> Value {
    let names: &[&str] = if bbox.get("zmin").is_some_and(|zmin| !zmin.is_null()) {
        &["xmin", "ymin", "zmin", "xmax", "ymax", "zmax"]
    } else {
        &["xmin", "ymin", "xmax", "ymax"]
    };
    Value::Array(
        names
            .iter()
            .map(|name| bbox.get(*name).cloned().unwrap_or(Value::Null))
            .collect(),
    )
}

fn decode_datetimes(column: &ArrayRef) -> Result<Vec<Option<DateTime<Utc>>>> {
    let column = arrow_cast::cast(
        column,
        &DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into())),
    )?;
    Ok(column
        .as_primitive::<TimestampNanosecondType>()
        .iter()
        .map(|nanos| nanos.map(|nanos| Utc.timestamp_nanos(nanos)))
        .collect())
}

fn decode_additional_fields(column: &ArrayRef) -> Result<Vec<Option<Map<String, Value>>>> {
    let column = arrow_cast::cast(column, &DataType::Utf8)?;
    column
        .as_string::<i32>()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            s.map(|s| {
                serde_json::from_str(s).map_err(|err| {
                    Error::codec(format!("row {i}, column {ADDITIONAL_FIELDS_COLUMN}"), err)
                })
            })
            .transpose()
        })
        .collect()
}
