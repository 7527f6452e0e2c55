//! Server-side HTML for the dashboard.

use crate::domain::dashboard::{format_currency, DashboardSummary};
use std::fmt::Write;

const DASHBOARD_TEMPLATE: &str = include_str!("../../../templates/dashboard.html");

pub fn render_dashboard(summary: &DashboardSummary) -> String {
    let mut rows = String::new();
    if summary.top_products.is_empty() {
        rows.push_str("                    <tr><td colspan=\"3\">No products in inventory</td></tr>\n");
    }
    for product in &summary.top_products {
        let _ = writeln!(
            rows,
            "                    <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&product.name),
            format_currency(product.price),
            product.stock
        );
    }

    DASHBOARD_TEMPLATE
        .replace("{{total_value}}", &escape_html(&summary.formatted_total()))
        .replace("{{top_rows}}\n", &rows)
        .replace("{{chart_labels}}", &script_json(&summary.chart_labels))
        .replace("{{chart_values}}", &script_json(&summary.chart_values))
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON literal safe to embed inside a `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}
