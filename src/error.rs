use thiserror::Error;

/// The document tree lacks a recognizable invoice structure. Unrecoverable
/// for that document; a batch keeps going for its siblings. Missing or
/// malformed numeric leaves are not errors, they default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("{source_name}: invoice root not found (expected nfeProc.NFe.infNFe or NFe.infNFe)")]
    MissingInvoiceRoot { source_name: String },

    #[error("{source_name}: totals block not found (expected total.ICMSTot)")]
    MissingTotals { source_name: String },

    #[error("{source_name}: line item block not found (expected det)")]
    MissingItems { source_name: String },

    #[error("{source_name}: access key not found (expected protNFe.infProt.chNFe or infNFe Id)")]
    MissingAccessKey { source_name: String },
}

impl StructureError {
    /// Source file/identifier the error belongs to.
    pub fn source_name(&self) -> &str {
        match self {
            StructureError::MissingInvoiceRoot { source_name }
            | StructureError::MissingTotals { source_name }
            | StructureError::MissingItems { source_name }
            | StructureError::MissingAccessKey { source_name } => source_name,
        }
    }
}
