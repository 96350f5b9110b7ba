//! Per-field extraction from a single product fragment.
//!
//! Every function here takes a fragment and a selector and returns the field
//! value after that field's cleanup rule. None of them fail: a selector that
//! matches nothing, or text that does not survive cleanup, yields the field's
//! default instead.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use crate::parse::Element;
use crate::record::GUARANTEE_NOT_SPECIFIED;

static FIRST_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Trimmed text of the first match, or `""`.
pub fn text(fragment: &Element<'_>, selector: &Selector) -> String {
    fragment
        .select_first(selector)
        .map(|el| el.text().trim().to_string())
        .unwrap_or_default()
}

/// Product code with one surrounding pair of parentheses removed.
pub fn product_code(fragment: &Element<'_>, selector: &Selector) -> String {
    strip_parens(&text(fragment, selector)).to_string()
}

/// Price text with `£`, `Inc Vat` and `,` removed, then trimmed.
///
/// The result stays text; an unpriced listing yields `""`.
pub fn price(fragment: &Element<'_>, selector: &Selector) -> String {
    clean_price(&text(fragment, selector))
}

/// Feature bullets in document order, trimmed, empty entries dropped.
pub fn features(fragment: &Element<'_>, selector: &Selector) -> Vec<String> {
    fragment
        .select_all(selector)
        .iter()
        .map(|el| el.text().trim().to_string())
        .filter(|feature| !feature.is_empty())
        .collect()
}

/// First integer found in the rating node's descriptive attribute, or `0`.
pub fn rating(fragment: &Element<'_>, selector: &Selector, attribute: &str) -> f64 {
    fragment
        .select_first(selector)
        .and_then(|el| el.attr(attribute))
        .and_then(|description| FIRST_INTEGER.find(description))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .map(f64::from)
        .unwrap_or(0.0)
}

/// Review count rendered as `(N)`, or `0` when absent or unparsable.
pub fn review_count(fragment: &Element<'_>, selector: &Selector) -> u32 {
    let raw = text(fragment, selector);
    strip_parens(&raw).trim().parse().unwrap_or(0)
}

/// True iff the marker node is present anywhere in the fragment.
pub fn is_energy_efficient(fragment: &Element<'_>, selector: &Selector) -> bool {
    fragment.contains(selector)
}

/// The first feature mentioning "Guarantee", else "Not specified".
pub fn guarantee(features: &[String]) -> String {
    features
        .iter()
        .find(|feature| feature.contains("Guarantee"))
        .cloned()
        .unwrap_or_else(|| GUARANTEE_NOT_SPECIFIED.to_string())
}

/// Removes `£`, the `Inc Vat` suffix and thousands separators.
pub fn clean_price(raw: &str) -> String {
    raw.replace('£', "").replace("Inc Vat", "").replace(',', "").trim().to_string()
}

fn strip_parens(raw: &str) -> &str {
    let raw = raw.strip_prefix('(').unwrap_or(raw);
    raw.strip_suffix(')').unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;
    use crate::selectors::{CompiledSelectors, ListingSelectors};
    use rstest::rstest;

    const FRAGMENT: &str = r#"
        <div class="x1__pJ">
            <h3><a><span>Model XYZ123</span><span>ignored</span></a></h3>
            <span class="I7_YA7">(ABC123)</span>
            <span class="_2_gOH8">£2,999.99 Inc Vat</span>
            <div title="Product rating 4 stars out of 5" class="vQBT0O"></div>
            <span aria-hidden="true">(15)</span>
            <ul class="z_Eq10">
                <li> Feature 1 </li>
                <li>   </li>
                <li>Feature 2</li>
                <li>10 Year Guarantee</li>
            </ul>
            <div class="BPu2wi"></div>
        </div>
    "#;

    fn selectors() -> CompiledSelectors {
        ListingSelectors::default().compile().unwrap()
    }

    fn with_fragment<T>(html: &str, f: impl FnOnce(&Element<'_>, &CompiledSelectors) -> T) -> T {
        let doc = Document::parse(html);
        let sel = selectors();
        let fragments = doc.select_all(&sel.product_container);
        f(&fragments[0], &sel)
    }

    #[test]
    fn test_full_fragment() {
        with_fragment(FRAGMENT, |fragment, sel| {
            assert_eq!(text(fragment, &sel.model), "Model XYZ123");
            assert_eq!(product_code(fragment, &sel.product_code), "ABC123");
            assert_eq!(price(fragment, &sel.price), "2999.99");
            assert_eq!(rating(fragment, &sel.rating, &sel.rating_attribute), 4.0);
            assert_eq!(review_count(fragment, &sel.review_count), 15);
            assert!(is_energy_efficient(fragment, &sel.energy_marker));

            let features = features(fragment, &sel.features);
            assert_eq!(features, vec!["Feature 1", "Feature 2", "10 Year Guarantee"]);
            assert_eq!(guarantee(&features), "10 Year Guarantee");
        });
    }

    #[test]
    fn test_empty_fragment_defaults() {
        with_fragment(r#"<div class="x1__pJ"></div>"#, |fragment, sel| {
            assert_eq!(text(fragment, &sel.model), "");
            assert_eq!(product_code(fragment, &sel.product_code), "");
            assert_eq!(price(fragment, &sel.price), "");
            assert_eq!(rating(fragment, &sel.rating, &sel.rating_attribute), 0.0);
            assert_eq!(review_count(fragment, &sel.review_count), 0);
            assert!(!is_energy_efficient(fragment, &sel.energy_marker));
            assert!(features(fragment, &sel.features).is_empty());
        });
    }

    #[rstest]
    #[case(r#"<div class="vQBT0O" title="Product rating 3 stars out of 5"></div>"#, 3.0)]
    #[case(r#"<div class="vQBT0O" title="no stars yet"></div>"#, 0.0)]
    #[case(r#"<div class="vQBT0O"></div>"#, 0.0)]
    #[case(r#"<div class="vQBT0O" title="99999999999999 stars"></div>"#, 0.0)]
    fn test_rating_attribute(#[case] node: &str, #[case] expected: f64) {
        let html = format!(r#"<div class="x1__pJ">{}</div>"#, node);
        with_fragment(&html, |fragment, sel| {
            assert_eq!(rating(fragment, &sel.rating, &sel.rating_attribute), expected);
        });
    }

    #[rstest]
    #[case("(15)", 15)]
    #[case("15", 15)]
    #[case("( 7 )", 7)]
    #[case("(1,204)", 0)]
    #[case("(n/a)", 0)]
    #[case("", 0)]
    fn test_review_count(#[case] raw: &str, #[case] expected: u32) {
        let html = format!(r#"<div class="x1__pJ"><span aria-hidden="true">{}</span></div>"#, raw);
        with_fragment(&html, |fragment, sel| {
            assert_eq!(review_count(fragment, &sel.review_count), expected);
        });
    }

    #[rstest]
    #[case("£2999.99 Inc Vat", "2999.99")]
    #[case("£3,999.99", "3999.99")]
    #[case("  £12,345.00  Inc Vat ", "12345.00")]
    #[case("", "")]
    #[case("Call for price", "Call for price")]
    fn test_clean_price(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(clean_price(raw), expected);
    }

    #[test]
    fn test_product_code_strips_one_pair() {
        let html = r#"<div class="x1__pJ"><span class="I7_YA7">((X1))</span></div>"#;
        with_fragment(html, |fragment, sel| {
            assert_eq!(product_code(fragment, &sel.product_code), "(X1)");
        });
    }

    #[test]
    fn test_guarantee_default() {
        let features = vec!["Quiet".to_string(), "guarantee lower case".to_string()];
        assert_eq!(guarantee(&features), "Not specified");
        assert_eq!(guarantee(&[]), "Not specified");
    }

    #[test]
    fn test_features_keep_duplicates() {
        let html = r#"<div class="x1__pJ"><ul class="z_Eq10"><li>A</li><li>A</li><li>B</li></ul></div>"#;
        with_fragment(html, |fragment, sel| {
            assert_eq!(features(fragment, &sel.features), vec!["A", "A", "B"]);
        });
    }
}
