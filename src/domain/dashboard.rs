//! Inventory aggregation behind the dashboard view.

use crate::domain::product::Product;
use serde::Serialize;

/// Number of products shown in the price ranking.
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Sum of price × stock. Display precision only.
    pub total_value: f64,
    /// Most expensive products first; at most [`TOP_N`] entries.
    pub top_products: Vec<Product>,
    /// Chart labels, index-aligned with `chart_values` and in store order.
    pub chart_labels: Vec<String>,
    pub chart_values: Vec<i64>,
}

impl DashboardSummary {
    pub fn from_products(products: &[Product]) -> Self {
        let mut total_value = 0.0;
        let mut chart_labels = Vec::with_capacity(products.len());
        let mut chart_values = Vec::with_capacity(products.len());

        for product in products {
            total_value += product.inventory_value();
            chart_labels.push(product.name.clone());
            chart_values.push(product.stock);
        }

        Self {
            total_value,
            top_products: top_by_price(products, TOP_N),
            chart_labels,
            chart_values,
        }
    }

    /// Total value as shown on the dashboard, e.g. `$120.00`.
    pub fn formatted_total(&self) -> String {
        format_currency(self.total_value)
    }
}

/// Stable descending sort by price; equal prices keep their store order.
pub fn top_by_price(products: &[Product], n: usize) -> Vec<Product> {
    let mut ranked = products.to_vec();
    ranked.sort_by(|a, b| b.price.total_cmp(&a.price));
    ranked.truncate(n);
    ranked
}

pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}
