//! Library API integration tests
use heatwatch_core::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::TempDir;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

#[test]
fn test_extract_listing_page() {
    let records = extract_listings(&read_fixture("listing_page.html"), &ListingConfig::default()).expect("should parse");

    assert_eq!(records.len(), 3);

    let first = &records[0];
    assert_eq!(first.model, "Samsung EHS Mono Air Source Heat Pump 8kW");
    assert_eq!(first.product_code, "123AB");
    assert_eq!(first.manufacturer, "Samsung");
    assert_eq!(first.price, "3499.99");
    assert_eq!(first.rating, 5.0);
    assert_eq!(first.review_count, 42);
    assert_eq!(first.features, vec!["Heating & hot water", "Wi-Fi Control", "7 Year Guarantee"]);
    assert!(first.is_energy_efficient);
    assert_eq!(first.guarantee, "7 Year Guarantee");

    assert_eq!(records[1].product_code, "456CD");
    assert_eq!(records[1].guarantee, "Not specified");
    assert!(!records[1].is_energy_efficient);
}

#[test]
fn test_partially_missing_fields_use_defaults() {
    let records = extract_listings(&read_fixture("listing_page.html"), &ListingConfig::default()).unwrap();
    let split = &records[2];

    assert_eq!(split.model, "Samsung EHS Split Heat Pump 5kW");
    assert_eq!(split.price, "Price on request");
    assert_eq!(split.rating, 0.0);
    assert_eq!(split.review_count, 0);
    assert_eq!(split.features, vec!["Heating & hot water"]);
    assert!(!split.is_energy_efficient);
}

#[test]
fn test_malformed_page_skips_only_broken_fragment() {
    let report = assemble_page(&read_fixture("malformed_listing.html"), &ListingConfig::default()).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 0);
    assert!(matches!(report.skipped[0].error, FragmentError::NestedFragment { .. }));

    assert_eq!(report.records.len(), 2);
    let gen6 = &report.records[0];
    assert_eq!(gen6.model, "Samsung Gen 6 Heat Pump 6kW");
    assert_eq!(gen6.product_code, "GEN6");
    assert_eq!(gen6.price, "2850.00");
    assert_eq!(gen6.rating, 3.0);
    assert_eq!(gen6.review_count, 0);
    assert_eq!(gen6.guarantee, "5 Year Guarantee");

    let gen9 = &report.records[1];
    assert_eq!(gen9.product_code, "GEN9");
    assert!(gen9.model.starts_with("Samsung Gen 6 Heat Pump 9kW"));
    assert_eq!(gen9.price, "");
}

#[test]
fn test_empty_listing_page() {
    let records = extract_listings(&read_fixture("empty_listing.html"), &ListingConfig::default()).unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_fetch_store_summarize_round_trip() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("heat_pumps.csv");
    let monitor = Monitor::with_config(MonitorConfig::builder().table_path(&table).build());

    let source = FileSource::new(get_fixture_path("listing_page.html"));
    let records = monitor.fetch_from(&source).await.unwrap();
    monitor.store(&records).unwrap();

    assert_eq!(read_table(&table).unwrap(), records);

    let summary = monitor.summarize().unwrap();
    assert_eq!(summary.total_products, 3);
    assert_eq!(summary.average_price, Decimal::from_str("3849.495").unwrap());
    assert_eq!(summary.average_rating, 3.0);
    assert_eq!(summary.total_reviews, 59);
    assert_eq!(summary.energy_efficient_count, 1);

    let top: Vec<_> = summary.top_features.iter().collect();
    assert_eq!(
        top,
        vec![("Heating & hot water", 3), ("Wi-Fi Control", 2), ("7 Year Guarantee", 1)]
    );
    assert_eq!(summary.manufacturer_count.len(), 1);
}

#[tokio::test]
async fn test_missing_page_file_is_persistence_error() {
    let source = FileSource::new(get_fixture_path("does_not_exist.html"));
    let err = fetch_current_listings(&source, &ListingConfig::default()).await.unwrap_err();

    assert!(matches!(err, HeatwatchError::FileNotFound(_)));
}

#[test]
fn test_summarize_history_fixture() {
    let summary = summarize(get_fixture_path("history.csv"), 5).unwrap();

    assert_eq!(summary.total_products, 3);
    assert_eq!(summary.average_price, Decimal::from_str("2999.99").unwrap());
    assert_eq!((summary.average_rating * 100.0).round() / 100.0, 4.43);
    assert_eq!(summary.total_reviews, 30);
    assert_eq!(summary.energy_efficient_count, 2);
    assert_eq!(summary.manufacturer_count["Samsung"], 2);
    assert_eq!(summary.manufacturer_count["LG"], 1);
    assert_eq!(summary.top_features.get("Feature1"), Some(2));
    assert_eq!(summary.top_features.get("Feature2"), Some(2));
    assert_eq!(summary.top_features.get("Feature3"), Some(2));
}

#[test]
fn test_summarize_respects_feature_limit() {
    let summary = summarize(get_fixture_path("history.csv"), 1).unwrap();

    assert_eq!(summary.top_features.len(), 1);
    assert_eq!(summary.top_features.get("Feature1"), Some(2));
}

#[test]
fn test_summarize_corrupt_table() {
    let err = summarize(get_fixture_path("corrupt_history.csv"), 5).unwrap_err();

    assert!(matches!(err, HeatwatchError::Csv(_)));
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn test_summarize_missing_table() {
    let err = summarize("invalid/path/file.csv", 5).unwrap_err();

    assert!(matches!(err, HeatwatchError::FileNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::Persistence);
}

#[test]
fn test_append_accumulates_history() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("heat_pumps.csv");
    let records = extract_listings(&read_fixture("listing_page.html"), &ListingConfig::default()).unwrap();

    write_table(&table, &records, WriteMode::Append).unwrap();
    write_table(&table, &records, WriteMode::Append).unwrap();

    let summary = summarize(&table, 5).unwrap();
    assert_eq!(summary.total_products, 6);
    assert_eq!(summary.top_features.get("Heating & hot water"), Some(6));
}

#[test]
fn test_custom_selectors() {
    let html = r#"<article class="tile"><h2>Alpha</h2><b class="cost">£1,250</b></article>"#;
    let selectors = ListingSelectors {
        product_container: "article.tile".to_string(),
        model: "h2".to_string(),
        price: "b.cost".to_string(),
        ..Default::default()
    };
    let config = ListingConfig { manufacturer: "Vaillant".to_string(), selectors };

    let records = extract_listings(html, &config).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].model, "Alpha");
    assert_eq!(records[0].price, "1250");
    assert_eq!(records[0].manufacturer, "Vaillant");
}
