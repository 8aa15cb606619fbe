use crate::error::StructureError;
use crate::models::{DocumentIdentity, InvoiceTotals, LineItem, ResolvedDocument};
use crate::numeric;
use crate::resolver::paths::{self, first_present, lookup, NodeShape};
use bigdecimal::{BigDecimal, Zero};
use chrono::DateTime;
use serde_json::Value;

/// Resolves one parsed document tree into totals, normalized line items and
/// the document identity. Pure over its inputs; the only failure mode is a
/// missing structural block (StructureError). Numeric leaves always default
/// to zero.
pub fn resolve_document(
    source_name: &str,
    tree: &Value,
) -> Result<ResolvedDocument, StructureError> {
    let inf_nfe = first_present(tree, paths::INVOICE_ROOT).ok_or_else(|| {
        StructureError::MissingInvoiceRoot {
            source_name: source_name.to_string(),
        }
    })?;

    let identity = resolve_identity(source_name, tree, inf_nfe)?;
    let totals = resolve_totals(source_name, inf_nfe)?;

    let det = inf_nfe
        .get("det")
        .ok_or_else(|| StructureError::MissingItems {
            source_name: source_name.to_string(),
        })?;
    let items = NodeShape::of(Some(det))
        .into_vec()
        .into_iter()
        .map(resolve_item)
        .collect();

    Ok(ResolvedDocument {
        identity,
        totals,
        items,
    })
}

fn resolve_identity(
    source_name: &str,
    tree: &Value,
    inf_nfe: &Value,
) -> Result<DocumentIdentity, StructureError> {
    // Processed documents carry the key in the protocol block; bare ones
    // only in the infNFe Id attribute ("NFe" + 44 digits).
    let access_key = first_present(tree, paths::ACCESS_KEY)
        .and_then(Value::as_str)
        .map(|k| k.trim().to_string())
        .or_else(|| {
            inf_nfe
                .get("@Id")
                .or_else(|| inf_nfe.get("Id"))
                .and_then(Value::as_str)
                .map(|id| id.trim().trim_start_matches("NFe").to_string())
        })
        .filter(|k| !k.is_empty())
        .ok_or_else(|| StructureError::MissingAccessKey {
            source_name: source_name.to_string(),
        })?;

    Ok(DocumentIdentity {
        access_key,
        invoice_number: numeric::string_or_empty(lookup(inf_nfe, &["ide", "nNF"])),
        emitter: numeric::string_or_empty(lookup(inf_nfe, &["emit", "xNome"])),
        issued_at: lookup(inf_nfe, &["ide", "dhEmi"])
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok()),
    })
}

fn resolve_totals(source_name: &str, inf_nfe: &Value) -> Result<InvoiceTotals, StructureError> {
    let tot = first_present(inf_nfe, paths::TOTALS).ok_or_else(|| StructureError::MissingTotals {
        source_name: source_name.to_string(),
    })?;
    let field = |key: &str| numeric::value_or_zero(tot.get(key));

    Ok(InvoiceTotals {
        gross_goods: field("vProd"),
        freight: field("vFrete"),
        insurance: field("vSeg"),
        discount: field("vDesc"),
        other: field("vOutro"),
        icms_st: field("vST"),
        ipi: field("vIPI"),
        pis: field("vPIS"),
        cofins: field("vCOFINS"),
        icms: field("vICMS"),
        net_total: field("vNF"),
    })
}

fn resolve_item(det: &Value) -> LineItem {
    let prod = det.get("prod");
    let money = |key: &str| numeric::value_or_zero(prod.and_then(|p| p.get(key)));
    let text = |key: &str| numeric::string_or_empty(prod.and_then(|p| p.get(key)));

    let (icms, icms_st, cst) = resolve_icms(det);

    LineItem {
        product_code: text("cProd"),
        description: text("xProd"),
        quantity: money("qCom"),
        unit_cost: money("vUnCom"),
        gross_total: money("vProd"),
        ipi: numeric::value_or_zero(first_present(det, paths::ITEM_IPI)),
        icms,
        icms_st,
        pis: numeric::value_or_zero(first_present(det, paths::ITEM_PIS)),
        cofins: numeric::value_or_zero(first_present(det, paths::ITEM_COFINS)),
        ncm: text("NCM"),
        cst,
        cfop: text("CFOP"),
        explicit_freight: money("vFrete"),
        explicit_insurance: money("vSeg"),
        explicit_discount: money("vDesc"),
        explicit_other: money("vOutro"),
    }
}

/// The ICMS group nests its value under one numbered variant key (ICMS00,
/// ICMS10, ICMSSN101, …). Iterate the group's own keys and read from
/// whichever variant is present; the situation code sits in CST for the
/// regular variants and CSOSN for the Simples ones.
fn resolve_icms(det: &Value) -> (BigDecimal, BigDecimal, String) {
    if let Some(group) = lookup(det, paths::ITEM_ICMS_GROUP).and_then(Value::as_object) {
        for variant in group.values() {
            if let Some(fields) = variant.as_object() {
                let code = fields.get("CST").or_else(|| fields.get("CSOSN"));
                return (
                    numeric::value_or_zero(fields.get("vICMS")),
                    numeric::value_or_zero(fields.get("vICMSST")),
                    numeric::string_or_empty(code),
                );
            }
        }
    }
    (BigDecimal::zero(), BigDecimal::zero(), String::new())
}
