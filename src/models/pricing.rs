use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// One hand-entered pricing row. Fields are free-form strings exactly as
/// typed; cleared fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingRow {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub margin: String,
    #[serde(default)]
    pub price: String,
}

/// Which field the caller just edited; decides the solve direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingField {
    Cost,
    Margin,
    Quantity,
    Price,
}

/// Aggregate figures over a pricing list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTotals {
    pub total_cost: BigDecimal,
    pub total_value: BigDecimal,
    pub average_margin: BigDecimal,
}
