//! Storage seams of the load pipeline
//!
//! [`InvoiceStore`] is the set of statements the pipeline issues for one document.
//! [`UnitOfWork`] scopes them in a single atomic transaction. Keeping the two apart
//! lets the pipeline run unchanged on a dedicated connection, a pooled connection
//! or the in-memory store.

use crate::{
    error::ImportResult,
    models::nfce::{NewEmitente, NewImpostoDetalhado, NewNfce, NewPagamento, NewProduto},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;

pub trait InvoiceStore {
    fn header_exists(&mut self, access_key: &str) -> ImportResult<bool>;

    /// Returns the generated header id.
    fn insert_header(&mut self, header: &NewNfce) -> ImportResult<i32>;

    fn issuer_exists(&mut self, tax_id: &str) -> ImportResult<bool>;

    fn insert_issuer(&mut self, issuer: &NewEmitente) -> ImportResult<()>;

    /// Returns the generated line item id.
    fn insert_line_item(&mut self, item: &NewProduto) -> ImportResult<i32>;

    fn insert_tax_detail(&mut self, tax: &NewImpostoDetalhado) -> ImportResult<()>;

    fn insert_payment(&mut self, payment: &NewPagamento) -> ImportResult<()>;
}

pub trait UnitOfWork {
    /// Runs `work` inside one transaction: committed when it returns `Ok`,
    /// rolled back entirely when it returns `Err`.
    fn run_atomic<T, F>(&mut self, work: F) -> ImportResult<T>
    where
        F: FnOnce(&mut dyn InvoiceStore) -> ImportResult<T>;
}
