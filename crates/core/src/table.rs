//! CSV encoding and decoding of product records.
//!
//! The table is the only persisted state. Its header is fixed and ordered:
//!
//! ```text
//! Model,ProductCode,Manufacturer,Price (inc VAT),Rating,ReviewCount,Features,IsEnergyEfficient,Guarantee
//! ```
//!
//! Column order and the `Price (inc VAT)` display name must stay as they are
//! so existing files keep decoding. The multi-valued `Features` column is
//! stored as one comma-joined cell (see [`encode_features`] and
//! [`decode_features`]); every other column uses plain CSV conversion and a
//! malformed cell surfaces as a [`csv::Error`].

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use crate::record::ProductRecord;
use crate::{HeatwatchError, Result};

/// Table header, in column order.
pub const HEADERS: [&str; 9] = [
    "Model",
    "ProductCode",
    "Manufacturer",
    "Price (inc VAT)",
    "Rating",
    "ReviewCount",
    "Features",
    "IsEnergyEfficient",
    "Guarantee",
];

/// How [`write_table`] treats an existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file with a fresh header and the given records.
    #[default]
    Overwrite,
    /// Add the records to the end; the header is only written to an empty file.
    Append,
}

/// Joins features into a single cell with `,`. An empty list encodes to `""`.
pub fn encode_features<S: AsRef<str>>(features: &[S]) -> String {
    features.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

/// Splits a features cell on `,`, trimming each part and dropping empty ones.
pub fn decode_features(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn serialize_features<S: Serializer>(features: &[String], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&encode_features(features))
}

fn deserialize_features<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    let text: Option<String> = Option::deserialize(deserializer)?;
    Ok(text.as_deref().map(decode_features).unwrap_or_default())
}

/// Accepts `true`/`false` in any letter case, as older tables used `True`.
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let text = String::deserialize(deserializer)?;
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(serde::de::Error::custom(format!("invalid boolean `{}`", text))),
    }
}

/// On-disk row layout. Field order matches [`HEADERS`].
#[derive(Debug, Serialize, Deserialize)]
struct TableRow {
    #[serde(rename = "Model")]
    model: String,
    #[serde(rename = "ProductCode")]
    product_code: String,
    #[serde(rename = "Manufacturer")]
    manufacturer: String,
    #[serde(rename = "Price (inc VAT)")]
    price: String,
    #[serde(rename = "Rating")]
    rating: f64,
    #[serde(rename = "ReviewCount")]
    review_count: u32,
    #[serde(
        rename = "Features",
        default,
        serialize_with = "serialize_features",
        deserialize_with = "deserialize_features"
    )]
    features: Vec<String>,
    #[serde(rename = "IsEnergyEfficient", deserialize_with = "deserialize_flag")]
    is_energy_efficient: bool,
    #[serde(rename = "Guarantee")]
    guarantee: String,
}

impl From<&ProductRecord> for TableRow {
    fn from(record: &ProductRecord) -> Self {
        Self {
            model: record.model.clone(),
            product_code: record.product_code.clone(),
            manufacturer: record.manufacturer.clone(),
            price: record.price.clone(),
            rating: record.rating,
            review_count: record.review_count,
            features: record.features.clone(),
            is_energy_efficient: record.is_energy_efficient,
            guarantee: record.guarantee.clone(),
        }
    }
}

impl From<TableRow> for ProductRecord {
    fn from(row: TableRow) -> Self {
        Self {
            model: row.model,
            product_code: row.product_code,
            manufacturer: row.manufacturer,
            price: row.price,
            rating: row.rating,
            review_count: row.review_count,
            features: row.features,
            is_energy_efficient: row.is_energy_efficient,
            guarantee: row.guarantee,
        }
    }
}

/// Encodes records as CSV into `writer`, optionally preceded by the header.
pub fn encode<W: Write>(writer: W, records: &[ProductRecord], include_header: bool) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    if include_header {
        csv_writer.write_record(HEADERS)?;
    }
    for record in records {
        csv_writer.serialize(TableRow::from(record))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Encodes records, header included, into a CSV string.
pub fn encode_to_string(records: &[ProductRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    encode(&mut buffer, records, true)?;
    String::from_utf8(buffer).map_err(|e| HeatwatchError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Decodes records from CSV with a header row.
///
/// A table with a header and no rows, or no content at all, decodes to an
/// empty list.
pub fn decode<R: Read>(reader: R) -> Result<Vec<ProductRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<TableRow>() {
        records.push(row?.into());
    }

    Ok(records)
}

/// Writes records to the table at `path`.
///
/// # Errors
///
/// Filesystem failures (missing directory, permission denied) are returned as
/// [`HeatwatchError::Io`].
pub fn write_table(path: impl AsRef<Path>, records: &[ProductRecord], mode: WriteMode) -> Result<()> {
    let path = path.as_ref();

    let (file, include_header) = match mode {
        WriteMode::Overwrite => (File::create(path)?, true),
        WriteMode::Append => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let empty = file.metadata()?.len() == 0;
            (file, empty)
        }
    };

    encode(file, records, include_header)?;
    info!(path = %path.display(), records = records.len(), ?mode, "wrote listing table");

    Ok(())
}

/// Reads every record from the table at `path`.
///
/// # Errors
///
/// Returns [`HeatwatchError::FileNotFound`] when the table does not exist and
/// [`HeatwatchError::Csv`] when a row cannot be decoded.
pub fn read_table(path: impl AsRef<Path>) -> Result<Vec<ProductRecord>> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HeatwatchError::FileNotFound(path.to_path_buf()),
        _ => HeatwatchError::Io(e),
    })?;

    decode(file)
}
