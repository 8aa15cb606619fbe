use crate::models::{AllocatedLineItem, SimulatedLineItem, SimulationSummary};
use crate::numeric;
use bigdecimal::{BigDecimal, Zero};

/// Builds the simulation view for a set of costed lines. Quantities pair by
/// index; a missing entry keeps the line at its recorded quantity. Original
/// figures are never touched, and each line is derived independently, so
/// dropping a line from the set cannot perturb the others.
pub fn simulate(
    items: &[AllocatedLineItem],
    quantities: &[Option<String>],
) -> Vec<SimulatedLineItem> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let simulated_quantity = quantities
                .get(idx)
                .and_then(|q| q.clone())
                .unwrap_or_else(|| item.item.quantity.to_string());
            simulate_item(item, &simulated_quantity)
        })
        .collect()
}

/// One line under a hypothetical quantity (free-form string, parse-or-zero).
pub fn simulate_item(item: &AllocatedLineItem, simulated_quantity: &str) -> SimulatedLineItem {
    let quantity = numeric::parse_or_zero(simulated_quantity);
    SimulatedLineItem {
        original_total_cost: &item.final_unit_cost * &item.item.quantity,
        simulated_total_cost: &item.final_unit_cost * &quantity,
        simulated_quantity: simulated_quantity.to_string(),
        item: item.clone(),
    }
}

/// Savings = Σ original − Σ simulated; negative when the simulated
/// quantities exceed the recorded ones.
pub fn summarize(items: &[SimulatedLineItem]) -> SimulationSummary {
    let original_total = items
        .iter()
        .fold(BigDecimal::zero(), |acc, i| acc + &i.original_total_cost);
    let simulated_total = items
        .iter()
        .fold(BigDecimal::zero(), |acc, i| acc + &i.simulated_total_cost);
    let savings = &original_total - &simulated_total;
    SimulationSummary {
        original_total,
        simulated_total,
        savings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocatedCharges, LineItem, TaxRegime};
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn costed(code: &str, qty: &str, gross: &str) -> AllocatedLineItem {
        let item = LineItem {
            product_code: code.to_string(),
            description: code.to_string(),
            quantity: dec(qty),
            unit_cost: BigDecimal::zero(),
            gross_total: dec(gross),
            ipi: BigDecimal::zero(),
            icms: BigDecimal::zero(),
            icms_st: BigDecimal::zero(),
            pis: BigDecimal::zero(),
            cofins: BigDecimal::zero(),
            ncm: String::new(),
            cst: String::new(),
            cfop: String::new(),
            explicit_freight: BigDecimal::zero(),
            explicit_insurance: BigDecimal::zero(),
            explicit_discount: BigDecimal::zero(),
            explicit_other: BigDecimal::zero(),
        };
        let charges = AllocatedCharges {
            freight: BigDecimal::zero(),
            insurance: BigDecimal::zero(),
            discount: BigDecimal::zero(),
            other: BigDecimal::zero(),
        };
        AllocatedLineItem::new(item, charges, TaxRegime::LucroReal)
    }

    #[test]
    fn simulated_total_uses_final_unit_cost() {
        // 600 over 2 units -> 300/unit; 5 simulated units -> 1500.
        let line = costed("A", "2", "600");
        let sim = simulate_item(&line, "5");
        assert_eq!(sim.original_total_cost, dec("600"));
        assert_eq!(sim.simulated_total_cost, dec("1500"));
        // Original line untouched.
        assert_eq!(sim.item.item.quantity, dec("2"));
        assert_eq!(sim.item.final_total_cost, dec("600"));
    }

    #[test]
    fn invalid_quantity_parses_to_zero() {
        let sim = simulate_item(&costed("A", "2", "600"), "lots");
        assert_eq!(sim.simulated_total_cost, BigDecimal::zero());
        assert_eq!(sim.simulated_quantity, "lots");
    }

    #[test]
    fn missing_quantity_defaults_to_recorded_one() {
        let lines = [costed("A", "2", "600"), costed("B", "4", "400")];
        let sims = simulate(&lines, &[Some("3".to_string())]);
        assert_eq!(sims[0].simulated_total_cost, dec("900"));
        assert_eq!(sims[1].simulated_total_cost, dec("400"));
    }

    #[test]
    fn savings_may_go_negative_and_subsets_are_independent() {
        let lines = [costed("A", "2", "600"), costed("B", "1", "100")];
        let sims = simulate(
            &lines,
            &[Some("1".to_string()), Some("4".to_string())],
        );
        let summary = summarize(&sims);
        assert_eq!(summary.original_total, dec("700"));
        assert_eq!(summary.simulated_total, dec("700")); // 300 + 400
        assert_eq!(summary.savings, BigDecimal::zero());

        // Removing B from the set leaves A's figures identical.
        let only_a = simulate(&lines[..1], &[Some("1".to_string())]);
        assert_eq!(only_a[0], sims[0]);
        let summary_a = summarize(&only_a);
        assert_eq!(summary_a.savings, dec("300"));

        let over = simulate(&lines, &[Some("2".to_string()), Some("8".to_string())]);
        assert!(summarize(&over).savings < BigDecimal::zero());
    }
}
