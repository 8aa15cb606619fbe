pub mod aggregate;
pub mod costing;
pub mod invoice;
pub mod pricing;

pub use aggregate::{AggregatedProduct, DocumentFile, IngestFailure, IngestReport, ProductOccurrence};
pub use costing::{
    AllocatedCharges, AllocatedLineItem, SimulatedLineItem, SimulationSummary, TaxRegime,
};
pub use invoice::{DocumentIdentity, InvoiceTotals, LineItem, ResolvedDocument};
pub use pricing::{PricingField, PricingRow, PricingTotals};
