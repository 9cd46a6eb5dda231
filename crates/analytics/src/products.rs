//! Category → subcategory → product roll-up.

use bizdash_data::ProductSalesRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// One node of the product hierarchy.
///
/// `sales` is the sum over the node's leaves; `profit_margin` is their
/// sales-weighted mean (plain mean when the node has no sales).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductNode {
    pub label: String,
    pub sales: f64,
    pub profit_margin: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProductNode>,
}

#[derive(Default)]
struct MarginAccumulator {
    sales: f64,
    weighted_margin: f64,
    margin_sum: f64,
    count: usize,
}

impl MarginAccumulator {
    fn add(&mut self, sales: f64, margin: f64) {
        self.sales += sales;
        self.weighted_margin += sales * margin;
        self.margin_sum += margin;
        self.count += 1;
    }

    fn margin(&self) -> f64 {
        if self.sales != 0.0 {
            self.weighted_margin / self.sales
        } else if self.count > 0 {
            self.margin_sum / self.count as f64
        } else {
            0.0
        }
    }
}

type Tree<'a> = BTreeMap<&'a str, BTreeMap<&'a str, BTreeMap<&'a str, MarginAccumulator>>>;

/// Builds the product tree, categories and children in name order.
///
/// Repeated (category, subcategory, product) rows are merged into one leaf.
#[must_use]
pub fn product_hierarchy(rows: &[ProductSalesRecord]) -> Vec<ProductNode> {
    let mut tree: Tree<'_> = BTreeMap::new();
    for row in rows {
        tree.entry(row.category.as_str())
            .or_default()
            .entry(row.subcategory.as_str())
            .or_default()
            .entry(row.product.as_str())
            .or_default()
            .add(row.sales, row.profit_margin);
    }

    tree.into_iter()
        .map(|(category, subcategories)| {
            let children = subcategories
                .into_iter()
                .map(|(subcategory, products)| {
                    let leaves = products
                        .into_iter()
                        .map(|(product, acc)| ProductNode {
                            label: product.to_string(),
                            sales: acc.sales,
                            profit_margin: acc.margin(),
                            children: Vec::new(),
                        })
                        .collect();
                    parent(subcategory, leaves)
                })
                .collect();
            parent(category, children)
        })
        .collect()
}

fn parent(label: &str, children: Vec<ProductNode>) -> ProductNode {
    let mut acc = MarginAccumulator::default();
    for child in &children {
        acc.add(child.sales, child.profit_margin);
    }
    ProductNode {
        label: label.to_string(),
        sales: acc.sales,
        profit_margin: acc.margin(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        category: &str,
        subcategory: &str,
        product: &str,
        sales: f64,
        margin: f64,
    ) -> ProductSalesRecord {
        ProductSalesRecord {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            product: product.to_string(),
            sales,
            profit_margin: margin,
        }
    }

    #[test]
    fn test_hierarchy_sums_and_weights() {
        let rows = vec![
            row("Electronics", "Audio", "Headphones", 300.0, 0.2),
            row("Electronics", "Audio", "Speaker", 100.0, 0.4),
            row("Electronics", "Phones", "Case", 100.0, 0.5),
            row("Apparel", "Shoes", "Runner", 50.0, 0.3),
        ];
        let tree = product_hierarchy(&rows);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].label, "Apparel");

        let electronics = &tree[1];
        assert_eq!(electronics.sales, 500.0);
        // (300*0.2 + 100*0.4 + 100*0.5) / 500
        assert!((electronics.profit_margin - 0.3).abs() < 1e-12);

        let audio = &electronics.children[0];
        assert_eq!(audio.label, "Audio");
        assert_eq!(audio.sales, 400.0);
        assert!((audio.profit_margin - 0.25).abs() < 1e-12);
        assert_eq!(audio.children.len(), 2);
        assert!(audio.children.iter().all(|leaf| leaf.children.is_empty()));
    }

    #[test]
    fn test_duplicate_leaves_merge() {
        let rows = vec![
            row("Home", "Kitchen", "Kettle", 10.0, 0.1),
            row("Home", "Kitchen", "Kettle", 30.0, 0.5),
        ];
        let tree = product_hierarchy(&rows);
        let kettle = &tree[0].children[0].children[0];
        assert_eq!(kettle.sales, 40.0);
        assert!((kettle.profit_margin - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_zero_sales_falls_back_to_plain_mean() {
        let rows = vec![
            row("Home", "Garden", "Hose", 0.0, 0.2),
            row("Home", "Garden", "Rake", 0.0, 0.4),
        ];
        let tree = product_hierarchy(&rows);
        assert!((tree[0].children[0].profit_margin - 0.3).abs() < 1e-12);
    }
}
