use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Excise (IEPS) rate for one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IepsProductRate {
    pub product_key: String,
    pub display_name: String,
    pub rate_percent: Decimal,
    pub description: String,
}

impl IepsProductRate {
    pub fn new(
        product_key: &str,
        display_name: &str,
        rate_percent: Decimal,
        description: &str,
    ) -> Self {
        Self {
            product_key: product_key.to_string(),
            display_name: display_name.to_string(),
            rate_percent,
            description: description.to_string(),
        }
    }
}
