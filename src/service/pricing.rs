use crate::models::{PricingField, PricingRow, PricingTotals};
use crate::numeric;
use bigdecimal::{BigDecimal, Zero};

/// Bidirectional cost/margin/price solver for one hand-entered row.
///
/// Editing cost, margin or quantity recomputes the price from the margin;
/// editing the price back-solves the margin. Rows without a positive cost
/// get their derived fields cleared instead of carrying stale values.
pub fn resolve_row(row: &PricingRow, changed: PricingField) -> PricingRow {
    let mut out = row.clone();
    let cost = numeric::parse_or_zero(&row.cost);

    match changed {
        PricingField::Cost | PricingField::Margin | PricingField::Quantity => {
            if cost > BigDecimal::zero() {
                let margin = numeric::parse_or_zero(&row.margin);
                let price = &cost * (BigDecimal::from(1) + margin / BigDecimal::from(100));
                out.price = price.round(2).to_string();
            } else {
                out.margin = String::new();
                out.price = String::new();
            }
        }
        PricingField::Price => {
            let price = numeric::parse_or_zero(&row.price);
            if price > BigDecimal::zero() && cost > BigDecimal::zero() {
                let margin = (&price / &cost - BigDecimal::from(1)) * BigDecimal::from(100);
                out.margin = margin.round(2).to_string();
            } else {
                out.margin = String::new();
            }
        }
    }
    out
}

/// Applies one margin to every row that has a positive cost, recomputing
/// each affected price. Rows without cost pass through untouched.
pub fn apply_global_margin(rows: &[PricingRow], margin: &str) -> Vec<PricingRow> {
    rows.iter()
        .map(|row| {
            let cost = numeric::parse_or_zero(&row.cost);
            if cost > BigDecimal::zero() {
                let mut row = row.clone();
                row.margin = margin.trim().to_string();
                resolve_row(&row, PricingField::Margin)
            } else {
                row.clone()
            }
        })
        .collect()
}

/// List totals: Σ quantity×cost, Σ quantity×price and the average margin
/// implied by the two sums (0 when there is no cost basis).
pub fn totals(rows: &[PricingRow]) -> PricingTotals {
    let mut total_cost = BigDecimal::zero();
    let mut total_value = BigDecimal::zero();
    for row in rows {
        let quantity = numeric::parse_or_zero(&row.quantity);
        total_cost += &quantity * numeric::parse_or_zero(&row.cost);
        total_value += &quantity * numeric::parse_or_zero(&row.price);
    }

    let average_margin = if total_cost > BigDecimal::zero() {
        (&total_value - &total_cost) / &total_cost * BigDecimal::from(100)
    } else {
        BigDecimal::zero()
    };

    PricingTotals {
        total_cost,
        total_value,
        average_margin,
    }
}
