//! Summary statistics over a collected listing table.
//!
//! [`summarize_records`] never fails for decoded records: empty input yields
//! a zeroed summary, and prices that do not parse are left out of the price
//! average rather than counted as zero.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use crate::fields::clean_price;
use crate::record::ProductRecord;

/// Number of features kept in [`SummaryStatistics::top_features`] by default.
pub const DEFAULT_TOP_FEATURES: usize = 5;

/// Feature counts ordered by descending count.
///
/// Ties keep the order in which each feature was first seen. Serializes as a
/// JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFrequency(Vec<(String, usize)>);

impl FeatureFrequency {
    /// Count for `feature`, if it made the cut.
    pub fn get(&self, feature: &str) -> Option<usize> {
        self.0.iter().find(|(name, _)| name == feature).map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl Serialize for FeatureFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Snapshot statistics for one table, built fresh per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub total_products: usize,
    /// Mean over records whose price parses; zero when none do.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
    pub average_rating: f64,
    pub total_reviews: u64,
    pub energy_efficient_count: usize,
    pub top_features: FeatureFrequency,
    pub manufacturer_count: BTreeMap<String, usize>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub generated_at: OffsetDateTime,
}

fn serialize_timestamp<S: Serializer>(timestamp: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let formatted = timestamp.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

/// Parses stored price text into a decimal.
///
/// Removes `£`, `,` and `Inc Vat` before parsing. Returns `None` for empty or
/// non-numeric text. Only plain decimal notation is accepted: an optional
/// sign, digits and one decimal point, so `1e3` and `1_000` are rejected.
pub fn parse_price(price: &str) -> Option<Decimal> {
    let cleaned = clean_price(price);
    let digits = cleaned.strip_prefix(['-', '+']).unwrap_or(cleaned.as_str());

    let plain = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if !plain {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Mean of all parseable prices, or zero.
///
/// A price that would push the running sum past [`Decimal::MAX`] is left out
/// of both the sum and the count, the same as an unparsable one.
pub fn average_price(records: &[ProductRecord]) -> Decimal {
    let mut sum = Decimal::ZERO;
    let mut count = 0u64;

    for price in records.iter().filter_map(|r| parse_price(&r.price)) {
        match sum.checked_add(price) {
            Some(total) => {
                sum = total;
                count += 1;
            }
            None => warn!(%price, "price overflows the running total; excluded from average"),
        }
    }

    if count == 0 { Decimal::ZERO } else { sum / Decimal::from(count) }
}

/// The `limit` most frequent features across all records.
pub fn top_features(records: &[ProductRecord], limit: usize) -> FeatureFrequency {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for feature in records.iter().flat_map(|r| r.features.iter()) {
        match positions.get(feature.as_str()) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(feature.as_str(), counts.len());
                counts.push((feature.clone(), 1));
            }
        }
    }

    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    FeatureFrequency(counts)
}

/// Record count per manufacturer.
pub fn manufacturer_count(records: &[ProductRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.manufacturer.clone()).or_insert(0) += 1;
    }
    counts
}

/// Computes summary statistics over `records`.
pub fn summarize_records(records: &[ProductRecord], top_feature_limit: usize) -> SummaryStatistics {
    let generated_at = OffsetDateTime::now_utc();

    let average_rating = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.rating).sum::<f64>() / records.len() as f64
    };

    SummaryStatistics {
        total_products: records.len(),
        average_price: average_price(records),
        average_rating,
        total_reviews: records.iter().map(|r| u64::from(r.review_count)).sum(),
        energy_efficient_count: records.iter().filter(|r| r.is_energy_efficient).count(),
        top_features: top_features(records, top_feature_limit),
        manufacturer_count: manufacturer_count(records),
        generated_at,
    }
}
