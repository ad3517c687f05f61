use serde::{Deserialize, Serialize};

use super::EstimatorError;

/// Raw user input for a rating estimate, kept as typed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    #[serde(default = "default_min_price")]
    pub min_price: String,
    #[serde(default = "default_max_price")]
    pub max_price: String,
    #[serde(default = "default_sold")]
    pub sold: String,
    #[serde(default = "default_shipping")]
    pub shipping: String,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            min_price: default_min_price(),
            max_price: default_max_price(),
            sold: default_sold(),
            shipping: default_shipping(),
        }
    }
}

impl UserQuery {
    pub fn new(
        min_price: impl Into<String>,
        max_price: impl Into<String>,
        sold: impl Into<String>,
        shipping: impl Into<String>,
    ) -> Self {
        Self {
            min_price: min_price.into(),
            max_price: max_price.into(),
            sold: sold.into(),
            shipping: shipping.into(),
        }
    }

    /// Parse into `[min_price, max_price, sold, shipping]`.
    pub fn parse(&self) -> Result<[f64; 4], EstimatorError> {
        Ok([
            parse_field("min_price", &self.min_price)?,
            parse_field("max_price", &self.max_price)?,
            parse_field("sold", &self.sold)?,
            parse_field("shipping", &self.shipping)?,
        ])
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, EstimatorError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| EstimatorError::InvalidInput {
            field,
            value: value.to_string(),
        })
}

fn default_min_price() -> String {
    "10".to_string()
}

fn default_max_price() -> String {
    "50".to_string()
}

fn default_sold() -> String {
    "100".to_string()
}

fn default_shipping() -> String {
    "1".to_string()
}
