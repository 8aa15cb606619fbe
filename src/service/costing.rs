use crate::models::{AllocatedCharges, AllocatedLineItem, InvoiceTotals, LineItem, TaxRegime};
use bigdecimal::{BigDecimal, Zero};

/// Proportional share of the invoice-level charges for one line (rateio).
///
/// Weight = line gross / invoice goods total, 0 when the invoice total is 0.
/// An item-explicit charge is authoritative and bypasses the split for that
/// charge type only; the remaining proportional weights are NOT renormalized
/// when explicit and proportional lines mix, so the per-type sum only
/// approximates the invoice total in that case.
pub fn allocate(totals: &InvoiceTotals, item: &LineItem) -> AllocatedCharges {
    let weight = if totals.gross_goods.is_zero() {
        BigDecimal::zero()
    } else {
        &item.gross_total / &totals.gross_goods
    };

    let share = |explicit: &BigDecimal, invoice_total: &BigDecimal| {
        if !explicit.is_zero() {
            explicit.clone()
        } else {
            invoice_total * &weight
        }
    };

    AllocatedCharges {
        freight: share(&item.explicit_freight, &totals.freight),
        insurance: share(&item.explicit_insurance, &totals.insurance),
        discount: share(&item.explicit_discount, &totals.discount),
        other: share(&item.explicit_other, &totals.other),
    }
}

/// Allocates charges and derives the landed cost for every line of one
/// document under the given regime. Pure and re-entrant: a regime switch is
/// just another call (or `with_regime` per line) over the same stored
/// fields.
pub fn allocate_and_cost(
    totals: &InvoiceTotals,
    items: &[LineItem],
    regime: TaxRegime,
) -> Vec<AllocatedLineItem> {
    items
        .iter()
        .map(|item| AllocatedLineItem::new(item.clone(), allocate(totals, item), regime))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn item(code: &str, qty: &str, gross: &str) -> LineItem {
        LineItem {
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
        }
    }

    fn totals(gross_goods: &str, freight: &str) -> InvoiceTotals {
        InvoiceTotals {
            gross_goods: dec(gross_goods),
            freight: dec(freight),
            insurance: BigDecimal::zero(),
            discount: BigDecimal::zero(),
            other: BigDecimal::zero(),
            icms_st: BigDecimal::zero(),
            ipi: BigDecimal::zero(),
            pis: BigDecimal::zero(),
            cofins: BigDecimal::zero(),
            icms: BigDecimal::zero(),
            net_total: BigDecimal::zero(),
        }
    }

    #[test]
    fn freight_splits_by_gross_share() {
        // 1000 of goods, 100 of freight, lines at 600/400 -> 60/40.
        let t = totals("1000", "100");
        let a = allocate(&t, &item("A", "2", "600"));
        let b = allocate(&t, &item("B", "1", "400"));
        assert_eq!(a.freight, dec("60"));
        assert_eq!(b.freight, dec("40"));
    }

    #[test]
    fn explicit_item_charge_wins_over_split() {
        let t = totals("1000", "100");
        let mut i = item("A", "2", "600");
        i.explicit_freight = dec("7.77");
        let charges = allocate(&t, &i);
        assert_eq!(charges.freight, dec("7.77"));
        // Other charge types still go through the split.
        assert_eq!(charges.insurance, BigDecimal::zero());
    }

    #[test]
    fn zero_goods_total_means_zero_weight() {
        let t = totals("0", "100");
        let charges = allocate(&t, &item("A", "1", "50"));
        assert_eq!(charges.freight, BigDecimal::zero());
    }

    #[test]
    fn allocation_conserves_invoice_totals_without_overrides() {
        let mut t = totals("900", "90");
        t.insurance = dec("30");
        t.discount = dec("15");
        t.other = dec("9");
        let items = [
            item("A", "1", "300"),
            item("B", "1", "300"),
            item("C", "1", "300"),
        ];

        let sum = |pick: fn(&AllocatedCharges) -> &BigDecimal| {
            items
                .iter()
                .map(|i| allocate(&t, i))
                .fold(BigDecimal::zero(), |acc, c| acc + pick(&c))
        };

        let tolerance = dec("0.000001");
        assert!((sum(|c| &c.freight) - &t.freight).abs() < tolerance);
        assert!((sum(|c| &c.insurance) - &t.insurance).abs() < tolerance);
        assert!((sum(|c| &c.discount) - &t.discount).abs() < tolerance);
        assert!((sum(|c| &c.other) - &t.other).abs() < tolerance);
    }

    #[test]
    fn landed_cost_scenario_lucro_real() {
        // Worked scenario: goods 1000, freight 100, A=600 (qty 2, PIS 10,
        // COFINS 5), B=400. Allocated freight 60/40; A lands at
        // 600+60-15 = 645 total, 322.5 per unit.
        let t = totals("1000", "100");
        let mut a = item("A", "2", "600");
        a.pis = dec("10");
        a.cofins = dec("5");
        let b = item("B", "1", "400");

        let costed = allocate_and_cost(&t, &[a, b], TaxRegime::LucroReal);
        assert_eq!(costed[0].freight, dec("60"));
        assert_eq!(costed[0].final_total_cost, dec("645"));
        assert_eq!(costed[0].final_unit_cost, dec("322.5"));
        assert_eq!(costed[1].freight, dec("40"));
        assert_eq!(costed[1].final_total_cost, dec("440"));
    }

    #[test]
    fn simples_nacional_keeps_pis_cofins_in_cost() {
        let t = totals("1000", "100");
        let mut a = item("A", "2", "600");
        a.pis = dec("10");
        a.cofins = dec("5");

        let costed = allocate_and_cost(&t, &[a], TaxRegime::SimplesNacional);
        assert_eq!(costed[0].final_total_cost, dec("660"));
        assert_eq!(costed[0].final_unit_cost, dec("330"));
    }

    #[test]
    fn regime_round_trip_is_exact() {
        let t = totals("1000", "100");
        let mut a = item("A", "3", "600");
        a.pis = dec("10.37");
        a.cofins = dec("47.81");
        a.ipi = dec("12.11");
        a.icms_st = dec("5.03");

        let original = allocate_and_cost(&t, &[a], TaxRegime::LucroReal).remove(0);
        let round_trip = original
            .with_regime(TaxRegime::SimplesNacional)
            .with_regime(TaxRegime::LucroReal);
        assert_eq!(round_trip.final_total_cost, original.final_total_cost);
        assert_eq!(round_trip.final_unit_cost, original.final_unit_cost);
        assert_eq!(round_trip.converted_unit_cost, original.converted_unit_cost);
    }

    #[test]
    fn zero_quantity_never_divides() {
        let t = totals("1000", "100");
        let costed = allocate_and_cost(&t, &[item("A", "0", "600")], TaxRegime::LucroReal);
        assert_eq!(costed[0].final_unit_cost, BigDecimal::zero());
        assert_eq!(costed[0].converted_unit_cost, BigDecimal::zero());
        // The total is still the landed sum, unit-independent.
        assert_eq!(costed[0].final_total_cost, dec("660"));
    }

    #[test]
    fn conversion_factor_guards_and_isolation() {
        let t = totals("1000", "0");
        let base = allocate_and_cost(&t, &[item("A", "2", "600")], TaxRegime::LucroReal).remove(0);
        assert_eq!(base.converted_unit_cost, dec("300")); // default factor "1"

        let halved = base.with_conversion_factor("2");
        assert_eq!(halved.converted_unit_cost, dec("150"));
        assert_eq!(halved.final_unit_cost, base.final_unit_cost);
        assert_eq!(halved.final_total_cost, base.final_total_cost);

        assert_eq!(base.with_conversion_factor("0").converted_unit_cost, BigDecimal::zero());
        assert_eq!(base.with_conversion_factor("-1").converted_unit_cost, BigDecimal::zero());
        // Unparseable factor falls back to 1, not 0.
        assert_eq!(base.with_conversion_factor("x").converted_unit_cost, dec("300"));
    }
}
