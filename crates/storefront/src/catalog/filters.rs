//! Pure filter and sort functions over the catalog.
//!
//! Listing pages narrow the in-memory product list by price range and color
//! and order the result; nothing here touches state or the network.

use serde::Deserialize;

use super::Product;

/// How a listing is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Most recently added first (highest id).
    #[default]
    Newest,
}

impl SortOption {
    /// Parse a sort query value. Unknown values fall back to `Newest`.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price-low") => Self::PriceLow,
            Some("price-high") => Self::PriceHigh,
            _ => Self::Newest,
        }
    }

    /// The query value for this sort.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
        }
    }
}

/// Listing query parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub category: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Comma-separated color slugs, e.g. `navy,maroon`.
    pub colors: Option<String>,
    pub sort: Option<String>,
}

/// A resolved filter ready to apply.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub colors: Vec<String>,
    pub sort: SortOption,
}

impl ProductFilter {
    /// Resolve the wire query into a filter.
    #[must_use]
    pub fn from_query(query: &ListingQuery) -> Self {
        let colors = query
            .colors
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            min_price: query.min_price,
            max_price: query.max_price,
            colors,
            sort: SortOption::parse(query.sort.as_deref()),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        let rupees = product.price.rupees();
        if self.min_price.is_some_and(|min| rupees < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| rupees > max) {
            return false;
        }
        if !self.colors.is_empty() {
            let Some(color) = product.color else {
                return false;
            };
            if !self.colors.iter().any(|c| c == color) {
                return false;
            }
        }
        true
    }
}

/// Narrow and order a product list.
#[must_use]
pub fn apply<'a>(products: &[&'a Product], filter: &ProductFilter) -> Vec<&'a Product> {
    let mut filtered: Vec<&Product> = products
        .iter()
        .copied()
        .filter(|p| filter.matches(p))
        .collect();

    match filter.sort {
        SortOption::PriceLow => filtered.sort_by_key(|p| p.price),
        SortOption::PriceHigh => filtered.sort_by_key(|p| std::cmp::Reverse(p.price)),
        SortOption::Newest => filtered.sort_by_key(|p| std::cmp::Reverse(p.id.as_u32())),
    }

    filtered
}

/// Count products per color for the filter sidebar.
#[must_use]
pub fn color_counts(products: &[&Product]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for product in products {
        let Some(color) = product.color else { continue };
        match counts.iter_mut().find(|(c, _)| c == color) {
            Some((_, count)) => *count += 1,
            None => counts.push((color.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| a.0.cmp(&b.0));
    counts
}
