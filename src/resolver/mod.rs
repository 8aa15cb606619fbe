pub mod document;
pub mod paths;

pub use document::resolve_document;
