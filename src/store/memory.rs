//! In-memory store
//!
//! Mirrors the Postgres tables closely enough to exercise the pipeline without a
//! database: serial ids, the unique keys on `nfce.chave_acesso` and
//! `emitente.cnpj`, and the foreign keys from child rows. A failed unit of work
//! restores the snapshot taken when it started.

use crate::{
    error::{ImportError, ImportResult},
    models::nfce::{NewEmitente, NewImpostoDetalhado, NewNfce, NewPagamento, NewProduto},
    store::{InvoiceStore, UnitOfWork},
};

/// A stored row with its generated id.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    pub id: i32,
    pub row: T,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTables {
    pub nfce: Vec<Row<NewNfce>>,
    pub emitente: Vec<Row<NewEmitente>>,
    pub produto: Vec<Row<NewProduto>>,
    pub impostos_detalhados: Vec<Row<NewImpostoDetalhado>>,
    pub pagamento: Vec<Row<NewPagamento>>,
    next_id: i32,
}

impl MemoryTables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: MemoryTables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &MemoryTables {
        &self.tables
    }

    pub fn snapshot(&self) -> MemoryTables {
        self.tables.clone()
    }

    pub fn restore(&mut self, snapshot: MemoryTables) {
        self.tables = snapshot;
    }
}

fn violation(table: &'static str, constraint: &str, reason: String) -> ImportError {
    ImportError::persistence(reason)
        .with_context(|ctx| ctx.with_table(table).with_constraint(constraint))
}

impl InvoiceStore for MemoryStore {
    fn header_exists(&mut self, access_key: &str) -> ImportResult<bool> {
        Ok(self
            .tables
            .nfce
            .iter()
            .any(|r| r.row.chave_acesso == access_key))
    }

    fn insert_header(&mut self, header: &NewNfce) -> ImportResult<i32> {
        if self.header_exists(&header.chave_acesso)? {
            return Err(violation(
                "nfce",
                "nfce_chave_acesso_key",
                format!(
                    "unique constraint violated: duplicate chave_acesso {}",
                    header.chave_acesso
                ),
            ));
        }
        let id = self.tables.next_id();
        self.tables.nfce.push(Row {
            id,
            row: header.clone(),
        });
        Ok(id)
    }

    fn issuer_exists(&mut self, tax_id: &str) -> ImportResult<bool> {
        Ok(self.tables.emitente.iter().any(|r| r.row.cnpj == tax_id))
    }

    fn insert_issuer(&mut self, issuer: &NewEmitente) -> ImportResult<()> {
        if self.issuer_exists(&issuer.cnpj)? {
            return Err(violation(
                "emitente",
                "emitente_cnpj_key",
                format!("unique constraint violated: duplicate cnpj {}", issuer.cnpj),
            ));
        }
        let id = self.tables.next_id();
        self.tables.emitente.push(Row {
            id,
            row: issuer.clone(),
        });
        Ok(())
    }

    fn insert_line_item(&mut self, item: &NewProduto) -> ImportResult<i32> {
        if !self.tables.nfce.iter().any(|r| r.id == item.id_nfce) {
            return Err(violation(
                "produto",
                "produto_id_nfce_fkey",
                format!("foreign key violated: nfce {} does not exist", item.id_nfce),
            ));
        }
        let id = self.tables.next_id();
        self.tables.produto.push(Row {
            id,
            row: item.clone(),
        });
        Ok(id)
    }

    fn insert_tax_detail(&mut self, tax: &NewImpostoDetalhado) -> ImportResult<()> {
        if !self.tables.produto.iter().any(|r| r.id == tax.id_produto) {
            return Err(violation(
                "impostos_detalhados",
                "impostos_detalhados_id_produto_fkey",
                format!(
                    "foreign key violated: produto {} does not exist",
                    tax.id_produto
                ),
            ));
        }
        let id = self.tables.next_id();
        self.tables.impostos_detalhados.push(Row {
            id,
            row: tax.clone(),
        });
        Ok(())
    }

    fn insert_payment(&mut self, payment: &NewPagamento) -> ImportResult<()> {
        if !self.tables.nfce.iter().any(|r| r.id == payment.id_nfce) {
            return Err(violation(
                "pagamento",
                "pagamento_id_nfce_fkey",
                format!(
                    "foreign key violated: nfce {} does not exist",
                    payment.id_nfce
                ),
            ));
        }
        let id = self.tables.next_id();
        self.tables.pagamento.push(Row {
            id,
            row: payment.clone(),
        });
        Ok(())
    }
}

impl UnitOfWork for MemoryStore {
    fn run_atomic<T, F>(&mut self, work: F) -> ImportResult<T>
    where
        F: FnOnce(&mut dyn InvoiceStore) -> ImportResult<T>,
    {
        let snapshot = self.snapshot();
        let result = work(self);
        if let Err(e) = &result {
            log::debug!("Rolling back in-memory unit of work: {}", e);
            self.restore(snapshot);
        }
        result
    }
}
