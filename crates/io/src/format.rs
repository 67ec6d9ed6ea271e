use crate::{Error, Readable, Result, Writeable, location::Location};
use bytes::Bytes;
#[cfg(feature = "geoparquet")]
use stac::geoparquet::{Compression, WriterOptions};
use stac::{Href, Item, ItemCollection, SelfHref, Value};
use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    str::FromStr,
};

/// The format of STAC data.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Format {
    /// JSON data (the default).
    ///
    /// If `true`, the data will be pretty-printed on write.
    Json(bool),

    /// Newline-delimited JSON, one item per line.
    NdJson,

    /// [stac-geoparquet](https://github.com/stac-utils/stac-geoparquet)
    #[cfg(feature = "geoparquet")]
    Geoparquet(Option<Compression>),
}

impl Format {
    /// Infers the format from an href's file extension.
    ///
    /// Hrefs without an extension, e.g. STAC API endpoints, are JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_io::Format;
    ///
    /// assert_eq!(Format::infer_from_href("item.json").unwrap(), Format::Json(false));
    /// assert_eq!(Format::infer_from_href("items.jsonl").unwrap(), Format::NdJson);
    /// assert_eq!(Format::infer_from_href("https://stac.test/search").unwrap(), Format::Json(false));
    /// assert!(Format::infer_from_href("image.tif").is_err());
    /// ```
    pub fn infer_from_href(href: &str) -> Result<Format> {
        let path = href.split(['?', '#']).next().unwrap_or(href);
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((_, extension)) => match extension.to_ascii_lowercase().as_str() {
                "json" | "geojson" => Ok(Format::Json(false)),
                "ndjson" | "jsonl" => Ok(Format::NdJson),
                #[cfg(feature = "geoparquet")]
                "parquet" | "geoparquet" => Ok(Format::geoparquet()),
                _ => Err(Error::UnknownFormat(href.to_string())),
            },
            None => Ok(Format::Json(false)),
        }
    }

    /// Returns true if this is a geoparquet href.
    #[cfg(feature = "geoparquet")]
    pub fn is_geoparquet_href(href: &str) -> bool {
        matches!(Format::infer_from_href(href), Ok(Format::Geoparquet(_)))
    }

    /// Reads a STAC object from an href in this format.
    ///
    /// Urls are fetched with a blocking client, so the `reqwest` feature must
    /// be enabled. The value's self href is set to where it was read from.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    /// use stac_io::Format;
    ///
    /// let item: Item = Format::json().read("../core/data/simple-item.json").unwrap();
    /// ```
    pub fn read<T: Readable + SelfHref>(&self, href: impl Into<Href>) -> Result<T> {
        match Location::from(href.into()) {
            Location::Url(url) => {
                #[cfg(feature = "reqwest")]
                {
                    let bytes = crate::read::get_url(&url)?;
                    let mut value: T = self.from_bytes(bytes)?;
                    value.set_self_href(url);
                    Ok(value)
                }
                #[cfg(not(feature = "reqwest"))]
                {
                    let _ = url;
                    Err(Error::FeatureNotEnabled("reqwest"))
                }
            }
            Location::Path(path) => self.from_path(path),
        }
    }

    /// Reads a local file in this format.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    /// use stac_io::Format;
    ///
    /// let item: Item = Format::json().from_path("../core/data/simple-item.json").unwrap();
    /// ```
    pub fn from_path<T: Readable + SelfHref>(&self, path: impl AsRef<Path>) -> Result<T> {
        let path = path.as_ref();
        let from_path = |io| Error::FromPath {
            io,
            path: path.to_string_lossy().into_owned(),
        };
        let path = path.canonicalize().map_err(from_path)?;
        tracing::debug!("reading {} as {self}", path.display());
        let bytes = std::fs::read(&path).map_err(from_path)?;
        let mut value: T = self.from_bytes(bytes)?;
        value.set_self_href(path);
        Ok(value)
    }

    /// Reads a STAC object from some bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    /// use stac_io::Format;
    ///
    /// let bytes = std::fs::read("../core/data/simple-item.json").unwrap();
    /// let item: Item = Format::json().from_bytes(bytes).unwrap();
    /// ```
    pub fn from_bytes<T: Readable>(&self, bytes: impl Into<Bytes>) -> Result<T> {
        let bytes = bytes.into();
        let value = match self {
            Format::Json(_) => T::from_json_slice(&bytes)?,
            Format::NdJson => T::from_ndjson_bytes(bytes)?,
            #[cfg(feature = "geoparquet")]
            Format::Geoparquet(_) => T::from_geoparquet_bytes(bytes)?,
        };
        Ok(value)
    }

    /// Decodes some bytes into a sequence of STAC values.
    ///
    /// A feature collection, in any format, is split into its items. Anything
    /// else is a single value.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_io::Format;
    ///
    /// let bytes = std::fs::read("../core/data/items.ndjson").unwrap();
    /// let values = Format::ndjson().decode(bytes).unwrap();
    /// assert_eq!(values.len(), 2);
    /// ```
    pub fn decode(&self, bytes: impl Into<Bytes>) -> Result<Vec<Value>> {
        let value: Value = self.from_bytes(bytes)?;
        let values = match value {
            Value::ItemCollection(item_collection) => {
                item_collection.items.into_iter().map(Value::Item).collect()
            }
            value => vec![value],
        };
        Ok(values)
    }

    /// Encodes a sequence of STAC values.
    ///
    /// A single value is written as itself. Anything else must be items, and
    /// is written as an item collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Item, Value};
    /// use stac_io::Format;
    ///
    /// let values = vec![Value::from(Item::new("a")), Value::from(Item::new("b"))];
    /// let bytes = Format::json().encode(values).unwrap();
    /// let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    /// assert_eq!(value["type"], "FeatureCollection");
    /// ```
    pub fn encode(&self, mut values: Vec<Value>) -> Result<Vec<u8>> {
        if values.len() == 1 {
            self.into_vec(values.swap_remove(0))
        } else {
            let items = values
                .into_iter()
                .map(Item::try_from)
                .collect::<stac::Result<Vec<_>>>()?;
            self.into_vec(ItemCollection::from(items))
        }
    }

    /// Writes a STAC value to the provided path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stac::Item;
    /// use stac_io::Format;
    ///
    /// Format::json().write("an-id.json", Item::new("an-id")).unwrap();
    /// ```
    pub fn write<T: Writeable>(&self, path: impl AsRef<Path>, value: T) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!("writing {} as {self}", path.display());
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }

    /// Converts a STAC object into some bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    /// use stac_io::Format;
    ///
    /// let item = Item::new("an-id");
    /// let bytes = Format::json().into_vec(item).unwrap();
    /// ```
    pub fn into_vec<T: Writeable>(&self, value: T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.to_writer(&mut buf, value)?;
        Ok(buf)
    }

    fn to_writer<T: Writeable>(&self, writer: impl Write + Send, value: T) -> Result<()> {
        match self {
            Format::Json(pretty) => value.to_json_writer(writer, *pretty)?,
            Format::NdJson => value.to_ndjson_writer(writer)?,
            #[cfg(feature = "geoparquet")]
            Format::Geoparquet(compression) => value.into_geoparquet_writer(
                writer,
                WriterOptions::new().with_compression(*compression),
            )?,
        }
        Ok(())
    }

    /// Returns the default JSON format (compact).
    pub fn json() -> Format {
        Format::Json(false)
    }

    /// Returns the newline-delimited JSON format.
    pub fn ndjson() -> Format {
        Format::NdJson
    }

    /// Returns the default geoparquet format.
    ///
    /// Snappy compression if the compression codecs are compiled in, otherwise
    /// uncompressed.
    #[cfg(feature = "geoparquet")]
    pub fn geoparquet() -> Format {
        Format::Geoparquet(stac::geoparquet::default_compression())
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::Json(false)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(pretty) => {
                if *pretty {
                    f.write_str("json-pretty")
                } else {
                    f.write_str("json")
                }
            }
            Self::NdJson => f.write_str("ndjson"),
            #[cfg(feature = "geoparquet")]
            Self::Geoparquet(compression) => {
                if let Some(compression) = *compression {
                    write!(f, "geoparquet[{}]", compression)
                } else {
                    f.write_str("geoparquet")
                }
            }
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Format> {
        let name = s.to_ascii_lowercase();
        match name.as_str() {
            "json" | "geojson" => Ok(Self::Json(false)),
            "json-pretty" | "geojson-pretty" => Ok(Self::Json(true)),
            "ndjson" | "jsonl" => Ok(Self::NdJson),
            #[cfg(feature = "geoparquet")]
            _ if name.starts_with("parquet") || name.starts_with("geoparquet") => {
                parse_geoparquet(&name).ok_or_else(|| Error::UnknownFormat(s.to_string()))
            }
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Parses `geoparquet` or `geoparquet[<compression>]`.
#[cfg(feature = "geoparquet")]
fn parse_geoparquet(name: &str) -> Option<Format> {
    match name.split_once('[') {
        Some((_, compression)) => {
            let compression = compression.strip_suffix(']')?;
            compression.parse().ok().map(Some).map(Format::Geoparquet)
        }
        None => {
            if name == "parquet" || name == "geoparquet" {
                Some(Format::geoparquet())
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Format;
    use crate::Error;
    use rstest::rstest;
    use stac::{Catalog, Item, Value};

    #[rstest]
    #[case("item.json", Format::Json(false))]
    #[case("item.geojson", Format::Json(false))]
    #[case("ITEM.JSON", Format::Json(false))]
    #[case("items.ndjson", Format::NdJson)]
    #[case("items.jsonl", Format::NdJson)]
    #[case("https://stac.test/api/search", Format::Json(false))]
    #[case("https://stac.test/items.ndjson?token=abc", Format::NdJson)]
    #[case("./some.dir/item", Format::Json(false))]
    fn infer_from_href(#[case] href: &str, #[case] format: Format) {
        assert_eq!(Format::infer_from_href(href).unwrap(), format);
    }

    #[test]
    fn unknown_extension() {
        assert!(matches!(
            Format::infer_from_href("image.tif").unwrap_err(),
            Error::UnknownFormat(_)
        ));
    }

    #[rstest]
    #[case("json", Format::Json(false))]
    #[case("geojson", Format::Json(false))]
    #[case("json-pretty", Format::Json(true))]
    #[case("ndjson", Format::NdJson)]
    #[case("jsonl", Format::NdJson)]
    fn parse(#[case] s: &str, #[case] format: Format) {
        assert_eq!(s.parse::<Format>().unwrap(), format);
    }

    #[test]
    fn display() {
        assert_eq!(Format::Json(true).to_string(), "json-pretty");
        assert_eq!(Format::NdJson.to_string(), "ndjson");
    }

    #[test]
    fn decode_feature_collection() {
        let bytes = std::fs::read("../core/data/item-collection.json").unwrap();
        let values = Format::json().decode(bytes).unwrap();
        assert!(values.len() > 1);
        assert!(values.iter().all(|value| matches!(value, Value::Item(_))));
    }

    #[test]
    fn decode_single() {
        let bytes = std::fs::read("../core/data/catalog.json").unwrap();
        let values = Format::json().decode(bytes).unwrap();
        assert_eq!(values.len(), 1);
        assert!(matches!(values[0], Value::Catalog(_)));
    }

    #[test]
    fn encode_one_item_is_an_object() {
        let bytes = Format::json()
            .encode(vec![Item::new("an-id").into()])
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["id"], "an-id");
    }

    #[test]
    fn encode_non_items_fails() {
        let values = vec![Catalog::new("a", "A").into(), Catalog::new("b", "B").into()];
        let _ = Format::json().encode(values).unwrap_err();
    }

    #[test]
    fn ndjson_keeps_order() {
        let values: Vec<Value> = ["c", "a", "b"]
            .into_iter()
            .map(|id| Item::new(id).into())
            .collect();
        let bytes = Format::ndjson().encode(values).unwrap();
        assert!(bytes.ends_with(b"\n"));
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 3);
        let ids: Vec<_> = Format::ndjson()
            .decode(bytes)
            .unwrap()
            .into_iter()
            .map(|value| match value {
                Value::Item(item) => item.id,
                _ => panic!("expected an item"),
            })
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn ndjson_reports_line() {
        let bytes = b"{\"type\":\"Feature\"\n".to_vec();
        let error = Format::ndjson().decode(bytes).unwrap_err();
        assert!(matches!(
            error,
            Error::Stac(stac::Error::Codec { ref location, .. }) if location == "line 1"
        ));
    }

    #[test]
    #[cfg(not(feature = "geoparquet"))]
    fn parquet_without_geoparquet() {
        assert!(matches!(
            "parquet".parse::<Format>().unwrap_err(),
            Error::UnknownFormat(_),
        ));
        assert!(Format::infer_from_href("items.parquet").is_err());
    }

    #[cfg(feature = "geoparquet")]
    mod geoparquet {
        use super::Format;
        use stac::{Item, Value, geoparquet::Compression};

        #[test]
        fn parse_geoparquet_compression() {
            let format: Format = "geoparquet[snappy]".parse().unwrap();
            assert_eq!(format, Format::Geoparquet(Some(Compression::SNAPPY)));
        }

        #[test]
        fn parse_unclosed_compression() {
            let _ = "geoparquet[snappy".parse::<Format>().unwrap_err();
        }

        #[test]
        fn infer_from_href() {
            assert_eq!(
                Format::infer_from_href("out.parquet").unwrap(),
                Format::geoparquet()
            );
            assert!(Format::is_geoparquet_href("out.geoparquet"));
        }

        #[test]
        #[cfg(not(feature = "geoparquet-compression"))]
        fn uncompressed_by_default() {
            assert_eq!(Format::geoparquet(), Format::Geoparquet(None));
        }

        #[test]
        fn encode_decode() {
            let values = vec![Value::from(Item::new("a")), Value::from(Item::new("b"))];
            let bytes = Format::Geoparquet(None).encode(values).unwrap();
            let values = Format::Geoparquet(None).decode(bytes).unwrap();
            assert_eq!(values.len(), 2);
        }
    }
}
