pub mod aggregator;
pub mod costing;
pub mod pricing;
pub mod simulator;

pub use aggregator::DocumentStore;
pub use costing::{allocate, allocate_and_cost};
pub use simulator::{simulate, simulate_item, summarize};
