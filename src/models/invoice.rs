use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Invoice-level monetary totals (total/ICMSTot block).
/// Extracted once per document and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub gross_goods: BigDecimal, // vProd
    pub freight: BigDecimal,     // vFrete
    pub insurance: BigDecimal,   // vSeg
    pub discount: BigDecimal,    // vDesc
    pub other: BigDecimal,       // vOutro
    pub icms_st: BigDecimal,     // vST
    pub ipi: BigDecimal,         // vIPI
    pub pis: BigDecimal,         // vPIS
    pub cofins: BigDecimal,      // vCOFINS
    pub icms: BigDecimal,        // vICMS
    pub net_total: BigDecimal,   // vNF
}

/// Per-product invoice line (det block).
/// Tax fields default to zero when the source omits them; the explicit
/// charge fields are per-item overrides that bypass proportional allocation
/// when non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_code: String,    // cProd
    pub description: String,     // xProd
    pub quantity: BigDecimal,    // qCom
    pub unit_cost: BigDecimal,   // vUnCom
    pub gross_total: BigDecimal, // vProd
    pub ipi: BigDecimal,
    pub icms: BigDecimal,
    pub icms_st: BigDecimal,
    pub pis: BigDecimal,
    pub cofins: BigDecimal,
    pub ncm: String,
    pub cst: String, // CST or CSOSN, whichever the ICMS variant carries
    pub cfop: String,
    pub explicit_freight: BigDecimal,
    pub explicit_insurance: BigDecimal,
    pub explicit_discount: BigDecimal,
    pub explicit_other: BigDecimal,
}

/// Stable identity of a loaded document, keyed by the 44-digit access key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentIdentity {
    pub access_key: String,
    pub invoice_number: String,
    pub emitter: String,
    pub issued_at: Option<DateTime<FixedOffset>>,
}

/// One fully resolved invoice: identity + totals + normalized line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub identity: DocumentIdentity,
    pub totals: InvoiceTotals,
    pub items: Vec<LineItem>,
}
