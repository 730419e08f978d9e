//! Import Service - Idempotent Load Pipeline for NFC-e Documents
//!
//! Maps a parsed [`Document`] onto the relational schema and persists it inside one
//! unit of work. A batch driver runs documents one after the other and turns every
//! failure into a per-document outcome, so one bad document never stops the batch.
//!
//! Per document: `Parsed → existence check → Skipped | Inserting → Committed | RolledBack`.

use serde::Serialize;

use crate::{
    document::{parse_document, Document},
    error::{FailureKind, ImportError, ImportResult},
    models::nfce::{NewEmitente, NewImpostoDetalhado, NewNfce, NewPagamento, NewProduto},
    services::source::DocumentSource,
    store::{InvoiceStore, UnitOfWork},
};

/// Result of loading one document that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Inserted { header_id: i32 },
    /// A header with the same access key already exists. Not an error.
    Skipped,
}

/// Runs the insert sequence for one document against an open transaction.
///
/// Issuer insertion is check-then-insert, so two concurrent loaders seeing the same
/// CNPJ for the first time can still collide on the unique constraint.
pub fn load_document(store: &mut dyn InvoiceStore, document: &Document) -> ImportResult<LoadOutcome> {
    let access_key = document.access_key.as_str();
    if store.header_exists(access_key)? {
        log::info!("NFC-e {} already loaded, skipping", access_key);
        return Ok(LoadOutcome::Skipped);
    }

    let header_id = store.insert_header(&NewNfce::from_document(document))?;
    log::debug!("Inserted nfce {} for {}", header_id, access_key);

    if !store.issuer_exists(&document.issuer.tax_id)? {
        store.insert_issuer(&NewEmitente::from(&document.issuer))?;
        log::debug!("Inserted emitente {}", document.issuer.tax_id);
    }

    for item in &document.line_items {
        let item_id = store.insert_line_item(&NewProduto::for_item(header_id, item))?;
        for tax in &item.taxes {
            store.insert_tax_detail(&NewImpostoDetalhado::for_tax(item_id, tax))?;
        }
    }

    for payment in &document.payments {
        store.insert_payment(&NewPagamento::for_payment(header_id, payment))?;
    }

    Ok(LoadOutcome::Inserted { header_id })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Inserted { header_id: i32 },
    Skipped,
    Failed { kind: FailureKind, reason: String },
}

impl From<LoadOutcome> for DocumentStatus {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Inserted { header_id } => DocumentStatus::Inserted { header_id },
            LoadOutcome::Skipped => DocumentStatus::Skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    pub source: String,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

impl DocumentOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, DocumentStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        self.outcomes
            .iter()
            .fold(BatchSummary::default(), |mut summary, outcome| {
                summary.total += 1;
                match outcome.status {
                    DocumentStatus::Inserted { .. } => summary.inserted += 1,
                    DocumentStatus::Skipped => summary.skipped += 1,
                    DocumentStatus::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }

    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }
}

/// Sequential batch driver over a [`UnitOfWork`].
pub struct Importer<U> {
    unit_of_work: U,
}

impl<U: UnitOfWork> Importer<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    pub fn unit_of_work(&self) -> &U {
        &self.unit_of_work
    }

    pub fn into_inner(self) -> U {
        self.unit_of_work
    }

    /// Loads an already parsed document in its own unit of work.
    pub fn load(&mut self, document: &Document) -> ImportResult<LoadOutcome> {
        self.unit_of_work
            .run_atomic(|store| load_document(store, document))
    }

    /// Parses and loads one source. Never fails: errors become a `Failed` status.
    pub fn import_document(&mut self, source: &DocumentSource) -> DocumentOutcome {
        let span = tracing::info_span!("document", source = %source.name);
        let _guard = span.enter();

        let result = parse_document(&source.bytes).and_then(|document| self.load(&document));
        let status = match result {
            Ok(outcome) => {
                match outcome {
                    LoadOutcome::Inserted { header_id } => {
                        log::info!("Imported {} as nfce {}", source.name, header_id)
                    }
                    LoadOutcome::Skipped => log::info!("Skipped {} (already loaded)", source.name),
                }
                DocumentStatus::from(outcome)
            }
            Err(err) => {
                log::error!("Failed to import {}: {}", source.name, err);
                DocumentStatus::Failed {
                    kind: err.kind(),
                    reason: err.to_string(),
                }
            }
        };

        DocumentOutcome {
            source: source.name.clone(),
            status,
        }
    }

    /// Imports every source in order and collects the outcomes.
    pub fn import_batch<I>(&mut self, sources: I) -> BatchReport
    where
        I: IntoIterator<Item = ImportResult<DocumentSource>>,
    {
        let outcomes = sources
            .into_iter()
            .map(|source| match source {
                Ok(source) => self.import_document(&source),
                Err(err) => {
                    log::error!("Failed to read document source: {}", err);
                    DocumentOutcome {
                        source: source_name(&err),
                        status: DocumentStatus::Failed {
                            kind: err.kind(),
                            reason: err.to_string(),
                        },
                    }
                }
            })
            .collect();

        let report = BatchReport { outcomes };
        let summary = report.summary();
        log::info!(
            "Batch finished: {} document(s), {} inserted, {} skipped, {} failed",
            summary.total,
            summary.inserted,
            summary.skipped,
            summary.failed
        );
        report
    }
}

fn source_name(err: &ImportError) -> String {
    match err {
        ImportError::Unreadable { path, .. } => path.clone(),
        _ => "<unknown>".to_string(),
    }
}
