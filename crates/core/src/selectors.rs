//! CSS selectors describing the listing page markup.
//!
//! The monitored site owns this contract and changes its generated class
//! names without notice, so every selector lives here as plain data. Update
//! the defaults (or ship a config file overriding them) when the site's markup
//! moves; nothing else in the crate hard-codes markup.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::parse::compile;

/// Selector strings for one listing page family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One match per listed product.
    pub product_container: String,
    /// Model name, first match only.
    pub model: String,
    /// Product code, rendered in parentheses on the page.
    pub product_code: String,
    /// Price text including currency and VAT suffix.
    pub price: String,
    /// Feature bullet items.
    pub features: String,
    /// Node whose `rating_attribute` reads like "... 4 stars out of 5".
    pub rating: String,
    pub rating_attribute: String,
    /// Review count, rendered as "(15)".
    pub review_count: String,
    /// Presence-only marker for energy efficient products.
    pub energy_marker: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            product_container: r#"div[class*="x1__pJ"]"#.to_string(),
            model: "h3 span:first-of-type".to_string(),
            product_code: r#"span[class*="I7_YA7"]"#.to_string(),
            price: r#"span[class*="_2_gOH8"]"#.to_string(),
            features: r#"ul[class*="z_Eq10"] li"#.to_string(),
            rating: r#"div[class*="vQBT0O"]"#.to_string(),
            rating_attribute: "title".to_string(),
            review_count: r#"span[aria-hidden*="true"]"#.to_string(),
            energy_marker: r#"div[class*="BPu2wi"]"#.to_string(),
        }
    }
}

impl ListingSelectors {
    /// Compiles every selector, failing on the first invalid one.
    pub fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            product_container: compile(&self.product_container, "product_container")?,
            model: compile(&self.model, "model")?,
            product_code: compile(&self.product_code, "product_code")?,
            price: compile(&self.price, "price")?,
            features: compile(&self.features, "features")?,
            rating: compile(&self.rating, "rating")?,
            rating_attribute: self.rating_attribute.clone(),
            review_count: compile(&self.review_count, "review_count")?,
            energy_marker: compile(&self.energy_marker, "energy_marker")?,
        })
    }
}

/// [`ListingSelectors`] after compilation.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub product_container: Selector,
    pub model: Selector,
    pub product_code: Selector,
    pub price: Selector,
    pub features: Selector,
    pub rating: Selector,
    pub rating_attribute: String,
    pub review_count: Selector,
    pub energy_marker: Selector,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, HeatwatchError};

    #[test]
    fn test_default_selectors_compile() {
        assert!(ListingSelectors::default().compile().is_ok());
    }

    #[test]
    fn test_invalid_selector_names_field() {
        let selectors = ListingSelectors { price: "span[[".to_string(), ..Default::default() };
        let err = selectors.compile().unwrap_err();

        assert!(matches!(err, HeatwatchError::InvalidSelector { field: "price", .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_partial_override_from_json() {
        let selectors: ListingSelectors = serde_json::from_str(r#"{"price": "span.cost"}"#).unwrap();

        assert_eq!(selectors.price, "span.cost");
        assert_eq!(selectors.model, ListingSelectors::default().model);
    }
}
