//! Idempotent loader for NFC-e fiscal documents
//!
//! Parses `nfeProc` XML documents into a typed [`document::Document`], derives the
//! 44-digit access key and loads header, issuer, line items, itemized taxes and
//! payments into Postgres, one transaction per document.

pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod schema;
pub mod services;
pub mod store;
pub mod utils;

pub use document::{derive_access_key, parse_document, AccessKey, Document};
pub use error::{ImportError, ImportResult};
pub use services::import_service::{
    load_document, BatchReport, BatchSummary, DocumentOutcome, DocumentStatus, Importer,
    LoadOutcome,
};
pub use services::source::{discover_sources, DocumentSource};
pub use store::{InvoiceStore, MemoryStore, UnitOfWork};
