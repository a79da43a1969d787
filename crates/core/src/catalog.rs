//! Catalog filter specification.
//!
//! A `ProductFilter` describes what a caller wants from the catalog; the
//! storefront's product repository translates it into SQL. Keeping the
//! specification here, separate from the query builder, lets routes and
//! tests construct filters without touching the database layer.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::CategoryId;

/// Sort order for catalog results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Creation time descending.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name-asc" => Ok(Self::NameAsc),
            _ => Err(format!("invalid sort key: {s}")),
        }
    }
}

/// Category selector: by ID or by URL slug (resolved to an ID before the
/// query runs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRef {
    Id(CategoryId),
    Slug(String),
}

/// Composable catalog filter. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on product name.
    pub search: Option<String>,
    pub category: Option<CategoryRef>,
    pub featured_only: bool,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    pub sort: SortKey,
    /// Admin contexts may see inactive products; customer-facing queries
    /// never set this.
    pub include_inactive: bool,
}

impl ProductFilter {
    /// Filter matching every active product, newest first.
    #[must_use]
    pub fn all_active() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        if !term.trim().is_empty() {
            self.search = Some(term);
        }
        self
    }

    #[must_use]
    pub fn category(mut self, category: CategoryRef) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub const fn featured_only(mut self) -> Self {
        self.featured_only = true;
        self
    }

    #[must_use]
    pub const fn price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn include_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_active_only_newest_first() {
        let f = ProductFilter::all_active();
        assert!(!f.include_inactive);
        assert!(!f.featured_only);
        assert_eq!(f.sort, SortKey::Newest);
        assert!(f.search.is_none());
    }

    #[test]
    fn blank_search_terms_are_dropped() {
        let f = ProductFilter::all_active().search("   ");
        assert!(f.search.is_none());
    }

    #[test]
    fn sort_keys_parse_from_query_values() {
        assert_eq!("price-asc".parse::<SortKey>(), Ok(SortKey::PriceAsc));
        assert_eq!("newest".parse::<SortKey>(), Ok(SortKey::Newest));
        assert!("cheapest".parse::<SortKey>().is_err());
    }
}
