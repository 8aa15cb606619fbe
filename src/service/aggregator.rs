use crate::models::{
    AggregatedProduct, DocumentFile, DocumentIdentity, IngestFailure, IngestReport, LineItem,
    ProductOccurrence, ResolvedDocument,
};
use crate::resolver::resolve_document;
use bigdecimal::{BigDecimal, Zero};
use futures::future::join_all;
use indexmap::{IndexMap, IndexSet};
use tokio::sync::RwLock;

/// The set of currently loaded documents, keyed by access key in load order.
/// Aggregation and search rebuild their results from this set on every call;
/// nothing derived is cached.
pub struct DocumentStore {
    documents: RwLock<IndexMap<String, ResolvedDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(IndexMap::new()),
        }
    }

    /// Adds one resolved document. Returns false (and leaves the set
    /// untouched) when its access key is already loaded.
    pub async fn ingest(&self, doc: ResolvedDocument) -> bool {
        let mut docs = self.documents.write().await;
        if docs.contains_key(&doc.identity.access_key) {
            return false;
        }
        docs.insert(doc.identity.access_key.clone(), doc);
        true
    }

    /// Resolves a batch of parsed trees, one task per file, and merges the
    /// survivors under a single write lock. All-settled: a malformed file
    /// fails alone and is reported alongside the successes; a duplicate
    /// access key is a silent skip counted apart from failures.
    pub async fn ingest_batch(&self, files: Vec<DocumentFile>) -> IngestReport {
        let tasks: Vec<_> = files
            .into_iter()
            .map(|file| {
                tokio::spawn(async move {
                    let resolved = resolve_document(&file.source, &file.tree);
                    (file.source, resolved)
                })
            })
            .collect();
        let settled = join_all(tasks).await;

        let mut report = IngestReport {
            loaded: 0,
            skipped_duplicates: 0,
            failures: Vec::new(),
        };

        let mut docs = self.documents.write().await;
        for joined in settled {
            match joined {
                Ok((_, Ok(doc))) => {
                    if docs.contains_key(&doc.identity.access_key) {
                        report.skipped_duplicates += 1;
                    } else {
                        docs.insert(doc.identity.access_key.clone(), doc);
                        report.loaded += 1;
                    }
                }
                Ok((source, Err(err))) => {
                    tracing::warn!("Document {} failed resolution: {}", source, err);
                    report.failures.push(IngestFailure {
                        source,
                        error: err.to_string(),
                    });
                }
                Err(err) => {
                    tracing::error!("Resolution task panicked: {}", err);
                    report.failures.push(IngestFailure {
                        source: String::new(),
                        error: err.to_string(),
                    });
                }
            }
        }
        drop(docs);

        tracing::info!(
            "Batch ingested: {} loaded, {} duplicates skipped, {} failed",
            report.loaded,
            report.skipped_duplicates,
            report.failures.len()
        );
        report
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Identities of the loaded documents, in load order.
    pub async fn identities(&self) -> Vec<DocumentIdentity> {
        self.documents
            .read()
            .await
            .values()
            .map(|d| d.identity.clone())
            .collect()
    }

    /// Products occurring in at least two distinct documents, grouped by
    /// product code. Sorted by descending document count, ties by ascending
    /// case-insensitive description.
    pub async fn duplicates(&self) -> Vec<AggregatedProduct> {
        let docs = self.documents.read().await;

        let mut groups: IndexMap<String, GroupAccumulator> = IndexMap::new();
        for doc in docs.values() {
            for item in &doc.items {
                groups
                    .entry(item.product_code.clone())
                    .or_insert_with(|| GroupAccumulator::new(&item.description))
                    .push(&doc.identity, item);
            }
        }

        let mut out: Vec<AggregatedProduct> = groups
            .into_iter()
            .filter(|(_, group)| group.documents.len() >= 2)
            .map(|(code, group)| group.into_product(code))
            .collect();
        out.sort_by(|a, b| {
            b.document_count.cmp(&a.document_count).then_with(|| {
                a.description
                    .to_lowercase()
                    .cmp(&b.description.to_lowercase())
            })
        });
        out
    }

    /// Free-text search over the loaded set. The query is comma-separated;
    /// an item matches when its code or description contains ANY term
    /// (case-insensitive). Matches group by (code, description) and sort by
    /// ascending case-insensitive description. No minimum document count.
    pub async fn search(&self, query: &str) -> Vec<AggregatedProduct> {
        let terms: Vec<String> = query
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let docs = self.documents.read().await;

        let mut groups: IndexMap<(String, String), GroupAccumulator> = IndexMap::new();
        for doc in docs.values() {
            for item in &doc.items {
                let code = item.product_code.to_lowercase();
                let description = item.description.to_lowercase();
                let matched = terms
                    .iter()
                    .any(|t| code.contains(t.as_str()) || description.contains(t.as_str()));
                if !matched {
                    continue;
                }
                groups
                    .entry((item.product_code.clone(), item.description.clone()))
                    .or_insert_with(|| GroupAccumulator::new(&item.description))
                    .push(&doc.identity, item);
            }
        }

        let mut out: Vec<AggregatedProduct> = groups
            .into_iter()
            .map(|((code, _), group)| group.into_product(code))
            .collect();
        out.sort_by(|a, b| {
            a.description
                .to_lowercase()
                .cmp(&b.description.to_lowercase())
                .then_with(|| a.product_code.cmp(&b.product_code))
        });
        out
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Running totals for one product group while scanning the document set.
struct GroupAccumulator {
    description: String,
    total_quantity: BigDecimal,
    total_value: BigDecimal,
    documents: IndexSet<String>,
    occurrences: Vec<ProductOccurrence>,
}

impl GroupAccumulator {
    fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            total_quantity: BigDecimal::zero(),
            total_value: BigDecimal::zero(),
            documents: IndexSet::new(),
            occurrences: Vec::new(),
        }
    }

    fn push(&mut self, identity: &DocumentIdentity, item: &LineItem) {
        self.total_quantity += &item.quantity;
        self.total_value += &item.quantity * &item.unit_cost;
        self.documents.insert(identity.access_key.clone());
        self.occurrences.push(ProductOccurrence {
            access_key: identity.access_key.clone(),
            invoice_number: identity.invoice_number.clone(),
            emitter: identity.emitter.clone(),
            quantity: item.quantity.clone(),
            unit_cost: item.unit_cost.clone(),
        });
    }

    fn into_product(self, product_code: String) -> AggregatedProduct {
        AggregatedProduct {
            product_code,
            description: self.description,
            total_quantity: self.total_quantity,
            total_value: self.total_value,
            document_count: self.documents.len(),
            occurrences: self.occurrences,
        }
    }
}
