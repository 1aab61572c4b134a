//! Product predicates and sorting
//!
//! Pure functions over a product slice; [`derive_view`] is the single place
//! that turns a source list plus filters and sort into the ordered rows of the
//! product table.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::ProductRecord;
use shared::money;

/// Table filters as typed by the user.
///
/// Every field defaults to empty, which disables that predicate. The price
/// bounds go through the shared price normalization; a bound that does not
/// parse is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilters {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub article: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub price_min: String,
    #[serde(default)]
    pub price_max: String,
}

impl ProductFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when `product` passes every active predicate
    pub fn matches(&self, product: &ProductRecord) -> bool {
        Predicates::compile(self).matches(product)
    }
}

/// Filters with needles lowercased and bounds parsed once per derivation
struct Predicates {
    name: Option<String>,
    article: Option<String>,
    manufacturer: Option<String>,
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl Predicates {
    fn compile(filters: &ProductFilters) -> Self {
        let needle = |s: &str| (!s.is_empty()).then(|| s.to_lowercase());
        Self {
            name: needle(&filters.name),
            article: needle(&filters.article),
            manufacturer: needle(&filters.manufacturer),
            min: money::normalize_price(&filters.price_min),
            max: money::normalize_price(&filters.price_max),
        }
    }

    fn matches(&self, product: &ProductRecord) -> bool {
        contains(Some(product.name.as_str()), self.name.as_deref())
            && contains(product.article.as_deref(), self.article.as_deref())
            && contains(product.manufacturer.as_deref(), self.manufacturer.as_deref())
            && self.within_bounds(product)
    }

    fn within_bounds(&self, product: &ProductRecord) -> bool {
        if self.min.is_none() && self.max.is_none() {
            return true;
        }
        let Some(price) = product.amount() else {
            return false;
        };
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

/// Case-insensitive substring test; an absent or empty field fails an active needle
fn contains(field: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => field
            .filter(|f| !f.is_empty())
            .is_some_and(|f| f.to_lowercase().contains(needle)),
    }
}

/// Sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep the filtered (source) order
    #[default]
    #[serde(rename = "none")]
    Unsorted,
    Name,
    Article,
    Manufacturer,
    Price,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "default" => Ok(Self::Unsorted),
            "name" => Ok(Self::Name),
            "article" => Ok(Self::Article),
            "manufacturer" => Ok(Self::Manufacturer),
            "price" => Ok(Self::Price),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

type Comparator = fn(&ProductRecord, &ProductRecord) -> Ordering;

fn comparator(key: SortKey) -> Option<Comparator> {
    let compare: Comparator = match key {
        SortKey::Unsorted => return None,
        SortKey::Name => by_name,
        SortKey::Article => by_article,
        SortKey::Manufacturer => by_manufacturer,
        SortKey::Price => by_price,
    };
    Some(compare)
}

fn by_name(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    text_cmp(Some(a.name.as_str()), Some(b.name.as_str()))
}

fn by_article(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    text_cmp(a.article.as_deref(), b.article.as_deref())
}

fn by_manufacturer(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    text_cmp(a.manufacturer.as_deref(), b.manufacturer.as_deref())
}

/// Unpriced rows order before priced ones
fn by_price(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    a.amount().cmp(&b.amount())
}

/// Missing text sorts as the empty string
fn text_cmp(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or_default().to_lowercase();
    let b = b.unwrap_or_default().to_lowercase();
    a.cmp(&b)
}

/// Stable in-place sort; equal keys keep their input order in both directions
pub fn sort_products(products: &mut [ProductRecord], sort: SortSpec) {
    let Some(compare) = comparator(sort.key) else {
        return;
    };
    products.sort_by(|a, b| match sort.direction {
        SortDirection::Asc => compare(a, b),
        SortDirection::Desc => compare(a, b).reverse(),
    });
}

/// Filter then sort `source` into the rows of the product table
pub fn derive_view(
    source: &[ProductRecord],
    filters: &ProductFilters,
    sort: SortSpec,
) -> Vec<ProductRecord> {
    let predicates = Predicates::compile(filters);
    let mut rows: Vec<ProductRecord> = source
        .iter()
        .filter(|p| predicates.matches(p))
        .cloned()
        .collect();
    sort_products(&mut rows, sort);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Vec<ProductRecord> {
        serde_json::from_value(json!([
            {"code": 1, "name": "Hammer drill", "article": "HD-10", "manufacturer": "Bosch", "price": "1 000,50", "group_code": "T"},
            {"code": 2, "name": "saw", "article": "S-2", "manufacturer": "Makita", "price": "200", "group_code": "T"},
            {"code": 3, "name": "Drill bit", "manufacturer": "bosch", "price": 15.5, "group_code": "T"},
            {"code": 4, "name": "Glue", "article": "G-1", "price": "n/a", "group_code": "C"},
            {"code": 5, "name": "Saw blade", "article": "S-3", "manufacturer": "Makita", "price": 200, "group_code": "T"}
        ]))
        .unwrap()
    }

    fn codes(rows: &[ProductRecord]) -> Vec<&str> {
        rows.iter().map(|p| p.code.as_str()).collect()
    }

    #[test]
    fn test_no_filters_keeps_everything_in_order() {
        let rows = derive_view(&catalog(), &ProductFilters::default(), SortSpec::default());
        assert_eq!(codes(&rows), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_text_filters_are_case_insensitive() {
        let filters = ProductFilters {
            name: "DRILL".to_string(),
            ..Default::default()
        };
        let rows = derive_view(&catalog(), &filters, SortSpec::default());
        assert_eq!(codes(&rows), vec!["1", "3"]);
    }

    #[test]
    fn test_optional_field_filter_excludes_missing_values() {
        let filters = ProductFilters {
            article: "s-".to_string(),
            ..Default::default()
        };
        assert_eq!(
            codes(&derive_view(&catalog(), &filters, SortSpec::default())),
            vec!["2", "5"]
        );

        let filters = ProductFilters {
            manufacturer: "bosch".to_string(),
            ..Default::default()
        };
        assert_eq!(
            codes(&derive_view(&catalog(), &filters, SortSpec::default())),
            vec!["1", "3"]
        );
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let filters = ProductFilters {
            name: "saw".to_string(),
            manufacturer: "makita".to_string(),
            price_max: "199".to_string(),
            ..Default::default()
        };
        assert!(derive_view(&catalog(), &filters, SortSpec::default()).is_empty());
    }

    #[test]
    fn test_price_bounds_use_normalized_prices() {
        let filters = ProductFilters {
            price_min: "300".to_string(),
            ..Default::default()
        };
        assert_eq!(
            codes(&derive_view(&catalog(), &filters, SortSpec::default())),
            vec!["1"]
        );

        let filters = ProductFilters {
            price_min: "15,5".to_string(),
            price_max: "200".to_string(),
            ..Default::default()
        };
        assert_eq!(
            codes(&derive_view(&catalog(), &filters, SortSpec::default())),
            vec!["2", "3", "5"]
        );
    }

    #[test]
    fn test_unparsable_bound_is_ignored() {
        let filters = ProductFilters {
            price_min: "cheap".to_string(),
            ..Default::default()
        };
        assert_eq!(derive_view(&catalog(), &filters, SortSpec::default()).len(), 5);
        assert!(filters.matches(&catalog()[3]));
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let rows = derive_view(
            &catalog(),
            &ProductFilters::default(),
            SortSpec::new(SortKey::Name, SortDirection::Asc),
        );
        assert_eq!(codes(&rows), vec!["3", "4", "1", "2", "5"]);
    }

    #[test]
    fn test_sort_by_price_is_numeric_and_stable() {
        let asc = derive_view(
            &catalog(),
            &ProductFilters::default(),
            SortSpec::new(SortKey::Price, SortDirection::Asc),
        );
        // 4 has no price; 2 and 5 tie at 200 and keep input order
        assert_eq!(codes(&asc), vec!["4", "3", "2", "5", "1"]);

        let desc = derive_view(
            &catalog(),
            &ProductFilters::default(),
            SortSpec::new(SortKey::Price, SortDirection::Desc),
        );
        assert_eq!(codes(&desc), vec!["1", "2", "5", "3", "4"]);
    }

    #[test]
    fn test_sort_missing_text_as_empty() {
        let rows = derive_view(
            &catalog(),
            &ProductFilters::default(),
            SortSpec::new(SortKey::Manufacturer, SortDirection::Asc),
        );
        // 4 has no manufacturer; "Bosch"/"bosch" tie and keep input order
        assert_eq!(codes(&rows), vec!["4", "1", "3", "2", "5"]);
    }

    #[test]
    fn test_parse_sort_inputs() {
        assert_eq!("Price".parse::<SortKey>(), Ok(SortKey::Price));
        assert_eq!("none".parse::<SortKey>(), Ok(SortKey::Unsorted));
        assert!("weight".parse::<SortKey>().is_err());
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!(SortDirection::Asc.flip(), SortDirection::Desc);
    }
}
