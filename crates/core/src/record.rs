//! The product record value type.

use serde::{Deserialize, Serialize};

/// Guarantee text used when no feature mentions one.
pub const GUARANTEE_NOT_SPECIFIED: &str = "Not specified";

/// One listed product as observed on a listing page.
///
/// Every field has a deterministic default so extraction can degrade a single
/// field instead of failing the whole record. Text fields are never absent,
/// only empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub model: String,
    pub product_code: String,
    pub manufacturer: String,

    /// Normalized price text with currency symbol, VAT suffix and thousands
    /// separators removed. Kept as text because the page does not always
    /// render a price; parse it with [`crate::stats::parse_price`].
    pub price: String,

    /// Star rating, 0 to 5.
    pub rating: f64,
    pub review_count: u32,

    /// Feature bullets in page order, duplicates kept.
    pub features: Vec<String>,
    pub is_energy_efficient: bool,

    /// The first feature mentioning "Guarantee", else [`GUARANTEE_NOT_SPECIFIED`].
    pub guarantee: String,
}

impl Default for ProductRecord {
    fn default() -> Self {
        Self {
            model: String::new(),
            product_code: String::new(),
            manufacturer: String::new(),
            price: String::new(),
            rating: 0.0,
            review_count: 0,
            features: Vec::new(),
            is_energy_efficient: false,
            guarantee: GUARANTEE_NOT_SPECIFIED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let record = ProductRecord::default();

        assert!(record.model.is_empty());
        assert!(record.price.is_empty());
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.review_count, 0);
        assert!(record.features.is_empty());
        assert!(!record.is_energy_efficient);
        assert_eq!(record.guarantee, "Not specified");
    }

    #[test]
    fn test_json_field_names() {
        let record = ProductRecord { product_code: "ABC123".to_string(), ..Default::default() };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["productCode"], "ABC123");
        assert_eq!(json["isEnergyEfficient"], false);
        assert!(json["features"].as_array().unwrap().is_empty());
    }
}
