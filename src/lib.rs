pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod numeric;
pub mod resolver;
pub mod service;

pub use config::AppConfig;
pub use error::StructureError;
pub use resolver::resolve_document;
pub use service::DocumentStore;
