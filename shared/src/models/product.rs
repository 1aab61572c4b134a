//! Product Model

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::ids::{key_string, opt_text};
use crate::money;

/// Price exactly as delivered by the catalog source.
///
/// Kept verbatim for display and export (an integer `200` stays `200`);
/// [`PriceValue::amount`] gives the normalized numeric value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(Number),
    Text(String),
    #[default]
    Missing,
}

impl PriceValue {
    /// Normalized numeric price, `None` when it does not parse
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(money::from_f64)),
            Self::Text(s) => money::normalize_price(s),
            Self::Missing => None,
        }
    }
}

impl std::fmt::Display for PriceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Missing => Ok(()),
        }
    }
}

impl From<i64> for PriceValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

/// Whole values become integers; NaN and infinities are [`PriceValue::Missing`]
impl From<f64> for PriceValue {
    fn from(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            return Self::from(value as i64);
        }
        Number::from_f64(value).map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for PriceValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Product entity (`items.json`), immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unique across the whole catalog
    #[serde(deserialize_with = "key_string")]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub price: PriceValue,
    /// Category group reference (matches `CategoryNode::code`)
    #[serde(default, deserialize_with = "key_string")]
    pub group_code: String,
}

impl ProductRecord {
    /// Normalized price
    pub fn amount(&self) -> Option<Decimal> {
        self.price.amount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_shapes() {
        let items: Vec<ProductRecord> = serde_json::from_str(
            r#"[
                {"code": 1, "name": "Drill", "article": "D-1", "price": "1 000,50", "group_code": "A1"},
                {"code": "2", "name": "Saw", "manufacturer": null, "price": 200, "group_code": 7}
            ]"#,
        )
        .unwrap();

        assert_eq!(items[0].code, "1");
        assert_eq!(items[0].article.as_deref(), Some("D-1"));
        assert_eq!(items[0].amount(), Some(Decimal::from_str("1000.50").unwrap()));
        assert_eq!(items[1].manufacturer, None);
        assert_eq!(items[1].group_code, "7");
        assert_eq!(items[1].amount(), Some(Decimal::from(200)));
    }

    #[test]
    fn test_missing_price_has_no_amount() {
        let item: ProductRecord =
            serde_json::from_str(r#"{"code": 9, "name": "Box", "group_code": "B"}"#).unwrap();
        assert_eq!(item.price, PriceValue::Missing);
        assert_eq!(item.amount(), None);

        let null: ProductRecord =
            serde_json::from_str(r#"{"code": 9, "price": null, "group_code": "B"}"#).unwrap();
        assert_eq!(null.amount(), None);
    }

    #[test]
    fn test_price_round_trips_verbatim() {
        let item: ProductRecord =
            serde_json::from_str(r#"{"code": 1, "price": "1 000,50", "group_code": "A"}"#).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["price"], "1 000,50");
        assert!(json.get("article").is_none());
    }

    #[test]
    fn test_numeric_price_keeps_its_json_form() {
        let items: Vec<ProductRecord> = serde_json::from_str(
            r#"[
                {"code": 1, "price": 200, "group_code": "A"},
                {"code": 2, "price": 15.5, "group_code": "A"}
            ]"#,
        )
        .unwrap();

        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(serde_json::to_string(&json[0]["price"]).unwrap(), "200");
        assert_eq!(serde_json::to_string(&json[1]["price"]).unwrap(), "15.5");
        assert_eq!(items[0].price.to_string(), "200");
        assert_eq!(items[1].amount(), Some(Decimal::from_str("15.5").unwrap()));
    }

    #[test]
    fn test_price_from_f64() {
        assert_eq!(PriceValue::from(200.0), PriceValue::from(200));
        assert_eq!(PriceValue::from(12.5).to_string(), "12.5");
        assert_eq!(PriceValue::from(f64::NAN), PriceValue::Missing);
    }
}
