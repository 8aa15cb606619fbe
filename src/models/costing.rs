use crate::models::LineItem;
use crate::numeric;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// Tax regime of the purchasing company. Under Lucro Real, PIS/COFINS are
/// recoverable credits and are subtracted from the landed cost; under
/// Simples Nacional they stay in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    LucroReal,
    SimplesNacional,
}

/// One line's share of the invoice-level charges (rateio).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedCharges {
    pub freight: BigDecimal,
    pub insurance: BigDecimal,
    pub discount: BigDecimal,
    pub other: BigDecimal,
}

/// LineItem plus allocated charges and the derived landed-cost figures.
/// The source fields are retained untouched, so regime and factor changes
/// rederive the figures instead of mutating them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedLineItem {
    pub item: LineItem,
    pub freight: BigDecimal,
    pub insurance: BigDecimal,
    pub discount: BigDecimal,
    pub other: BigDecimal,
    pub final_unit_cost: BigDecimal,
    pub final_total_cost: BigDecimal,
    pub conversion_factor: String,
    pub converted_unit_cost: BigDecimal,
}

impl AllocatedLineItem {
    pub fn new(item: LineItem, charges: AllocatedCharges, regime: TaxRegime) -> Self {
        let mut out = Self {
            item,
            freight: charges.freight,
            insurance: charges.insurance,
            discount: charges.discount,
            other: charges.other,
            final_unit_cost: BigDecimal::zero(),
            final_total_cost: BigDecimal::zero(),
            conversion_factor: "1".to_string(),
            converted_unit_cost: BigDecimal::zero(),
        };
        out.recompute(regime);
        out
    }

    /// Rederives the landed figures from the stored base fields.
    /// Pure over its inputs: repeated calls with the same regime yield the
    /// same figures, and a regime round-trip restores the originals exactly.
    pub fn recompute(&mut self, regime: TaxRegime) {
        let base = &self.item.gross_total
            + &self.item.ipi
            + &self.item.icms_st
            + &self.freight
            + &self.insurance
            + &self.other
            - &self.discount;

        self.final_total_cost = match regime {
            TaxRegime::LucroReal => &base - &self.item.pis - &self.item.cofins,
            TaxRegime::SimplesNacional => base,
        };

        self.final_unit_cost = if self.item.quantity > BigDecimal::zero() {
            &self.final_total_cost / &self.item.quantity
        } else {
            BigDecimal::zero()
        };

        self.converted_unit_cost = convert_unit(&self.final_unit_cost, &self.conversion_factor);
    }

    /// Same line under another regime.
    pub fn with_regime(&self, regime: TaxRegime) -> Self {
        let mut out = self.clone();
        out.recompute(regime);
        out
    }

    /// Only the converted unit cost reacts to the factor; landed figures
    /// never do.
    pub fn with_conversion_factor(&self, factor: &str) -> Self {
        let mut out = self.clone();
        out.conversion_factor = factor.trim().to_string();
        out.converted_unit_cost = convert_unit(&out.final_unit_cost, &out.conversion_factor);
        out
    }
}

/// Unit cost divided by the conversion factor; non-positive factors yield 0.
fn convert_unit(unit_cost: &BigDecimal, factor: &str) -> BigDecimal {
    let factor = numeric::parse_or_one(factor);
    if factor > BigDecimal::zero() {
        unit_cost / &factor
    } else {
        BigDecimal::zero()
    }
}

/// AllocatedLineItem under a hypothetical purchase quantity. A derived,
/// discardable view: the original quantity and totals stay untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedLineItem {
    pub item: AllocatedLineItem,
    pub simulated_quantity: String,
    pub original_total_cost: BigDecimal,
    pub simulated_total_cost: BigDecimal,
}

/// Totals over a simulation set. Savings may be negative when simulated
/// quantities exceed the recorded ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub original_total: BigDecimal,
    pub simulated_total: BigDecimal,
    pub savings: BigDecimal,
}
