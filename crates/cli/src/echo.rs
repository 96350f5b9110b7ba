use heatwatch_core::{PageReport, ProductRecord, SummaryStatistics};
use owo_colors::OwoColorize;
use time::format_description::well_known::Rfc3339;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Heatwatch".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Heat pump listing monitor\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Print assembly counts; skipped fragments are reported by the log
pub fn print_page_report(report: &PageReport) {
    eprintln!(
        "  {} {}",
        "Fragments:".dimmed(),
        report.fragment_count().to_string().bright_white()
    );
    eprintln!(
        "  {} {}",
        "Records:".dimmed(),
        report.records.len().to_string().bright_white()
    );
    eprintln!(
        "  {} {}",
        "Skipped:".dimmed(),
        report.skipped.len().to_string().bright_white()
    );
    eprintln!();
}

/// Render records as an aligned plain-text listing
pub fn render_records(records: &[ProductRecord]) -> String {
    let mut out = String::new();

    for record in records {
        let price = if record.price.is_empty() { "-" } else { record.price.as_str() };
        out.push_str(&format!(
            "{:<10} {:>10}  {:.0}/5 ({:>4})  {}{}\n",
            record.product_code,
            price,
            record.rating,
            record.review_count,
            record.model,
            if record.is_energy_efficient { " [energy efficient]" } else { "" }
        ));
    }

    out
}

/// Render a summary as a plain-text report
pub fn render_summary(summary: &SummaryStatistics) -> String {
    let mut out = String::new();
    let generated = summary
        .generated_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| summary.generated_at.to_string());

    out.push_str(&format!("Generated:        {}\n", generated));
    out.push_str(&format!("Products:         {}\n", summary.total_products));
    out.push_str(&format!("Average price:    £{:.2}\n", summary.average_price));
    out.push_str(&format!("Average rating:   {:.2}\n", summary.average_rating));
    out.push_str(&format!("Total reviews:    {}\n", summary.total_reviews));
    out.push_str(&format!("Energy efficient: {}\n", summary.energy_efficient_count));

    out.push_str("\nTop features:\n");
    for (feature, count) in summary.top_features.iter() {
        out.push_str(&format!("  {:>4}  {}\n", count, feature));
    }

    out.push_str("\nManufacturers:\n");
    for (manufacturer, count) in &summary.manufacturer_count {
        out.push_str(&format!("  {:>4}  {}\n", count, manufacturer));
    }

    out
}
