//! Postgres adapters built on diesel

use diesel::Connection as _;

use crate::{
    config::db::{Connection, Pool},
    error::ImportResult,
    models::nfce::{
        operations as nfce_ops, NewEmitente, NewImpostoDetalhado, NewNfce, NewPagamento, NewProduto,
    },
    store::{InvoiceStore, UnitOfWork},
};

impl InvoiceStore for Connection {
    fn header_exists(&mut self, access_key: &str) -> ImportResult<bool> {
        nfce_ops::nfce_exists(access_key, self)
    }

    fn insert_header(&mut self, header: &NewNfce) -> ImportResult<i32> {
        nfce_ops::create_nfce(header, self)
    }

    fn issuer_exists(&mut self, tax_id: &str) -> ImportResult<bool> {
        nfce_ops::emitente_exists(tax_id, self)
    }

    fn insert_issuer(&mut self, issuer: &NewEmitente) -> ImportResult<()> {
        nfce_ops::create_emitente(issuer, self)
    }

    fn insert_line_item(&mut self, item: &NewProduto) -> ImportResult<i32> {
        nfce_ops::create_produto(item, self)
    }

    fn insert_tax_detail(&mut self, tax: &NewImpostoDetalhado) -> ImportResult<()> {
        nfce_ops::create_imposto_detalhado(tax, self)
    }

    fn insert_payment(&mut self, payment: &NewPagamento) -> ImportResult<()> {
        nfce_ops::create_pagamento(payment, self)
    }
}

/// One transaction per unit of work on a dedicated connection.
impl UnitOfWork for Connection {
    fn run_atomic<T, F>(&mut self, work: F) -> ImportResult<T>
    where
        F: FnOnce(&mut dyn InvoiceStore) -> ImportResult<T>,
    {
        self.transaction(|conn| {
            work(conn).map_err(|e| {
                log::error!("Transaction operation failed, rolling back: {}", e);
                e
            })
        })
    }
}

/// Number of stored headers, or `None` when the count cannot be taken.
///
/// Failures are logged and swallowed so a report for an already committed batch
/// is never lost to a late connection problem.
pub fn stored_document_count(pool: &Pool) -> Option<i64> {
    let mut conn = match pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            log::warn!("Could not check out a connection to count stored documents: {}", e);
            return None;
        }
    };
    match nfce_ops::count_nfce(&mut conn) {
        Ok(count) => Some(count),
        Err(e) => {
            log::warn!("Could not count stored documents: {}", e);
            None
        }
    }
}

/// Checks out a fresh pooled connection for every unit of work.
impl UnitOfWork for Pool {
    fn run_atomic<T, F>(&mut self, work: F) -> ImportResult<T>
    where
        F: FnOnce(&mut dyn InvoiceStore) -> ImportResult<T>,
    {
        let mut pooled = self.get()?;
        let conn: &mut Connection = &mut pooled;
        conn.run_atomic(work)
    }
}
