//! Database operations for the NFC-e tables
//!
//! Each function runs exactly one statement on the supplied connection. None of
//! them opens a transaction; callers scope them inside a unit of work.

use diesel::{dsl::exists, prelude::*};

use crate::{
    config::db::Connection,
    error::{ImportError, ImportResult},
    models::nfce::{NewEmitente, NewImpostoDetalhado, NewNfce, NewPagamento, NewProduto},
    schema::{emitente, impostos_detalhados, nfce, pagamento, produto},
};

fn persistence_error(table: &'static str, action: &str, err: diesel::result::Error) -> ImportError {
    log::error!("Failed to {} {}: {}", action, table, err);
    ImportError::from(err).with_context(|ctx| ctx.with_table(table))
}

/// Checks whether a document with the given access key was already loaded.
pub fn nfce_exists(chave: &str, conn: &mut Connection) -> ImportResult<bool> {
    diesel::select(exists(nfce::table.filter(nfce::chave_acesso.eq(chave))))
        .get_result::<bool>(conn)
        .map_err(|err| persistence_error("nfce", "query", err))
}

/// Inserts a document header.
///
/// # Returns
///
/// `Ok(i32)` with the generated `nfce.id` on success.
/// `Err(ImportError::PersistenceFailure)` on any database error, including a
/// duplicate `chave_acesso`.
pub fn create_nfce(new_nfce: &NewNfce, conn: &mut Connection) -> ImportResult<i32> {
    diesel::insert_into(nfce::table)
        .values(new_nfce)
        .returning(nfce::id)
        .get_result::<i32>(conn)
        .map_err(|err| persistence_error("nfce", "insert into", err))
}

/// Checks whether an issuer with the given CNPJ exists.
pub fn emitente_exists(cnpj: &str, conn: &mut Connection) -> ImportResult<bool> {
    diesel::select(exists(emitente::table.filter(emitente::cnpj.eq(cnpj))))
        .get_result::<bool>(conn)
        .map_err(|err| persistence_error("emitente", "query", err))
}

/// Inserts an issuer row. This is a plain insert, not an upsert.
pub fn create_emitente(new_emitente: &NewEmitente, conn: &mut Connection) -> ImportResult<()> {
    diesel::insert_into(emitente::table)
        .values(new_emitente)
        .execute(conn)
        .map(|_| ())
        .map_err(|err| persistence_error("emitente", "insert into", err))
}

/// Inserts a line item and returns its generated id.
pub fn create_produto(new_produto: &NewProduto, conn: &mut Connection) -> ImportResult<i32> {
    diesel::insert_into(produto::table)
        .values(new_produto)
        .returning(produto::id)
        .get_result::<i32>(conn)
        .map_err(|err| persistence_error("produto", "insert into", err))
}

pub fn create_imposto_detalhado(
    new_imposto: &NewImpostoDetalhado,
    conn: &mut Connection,
) -> ImportResult<()> {
    diesel::insert_into(impostos_detalhados::table)
        .values(new_imposto)
        .execute(conn)
        .map(|_| ())
        .map_err(|err| persistence_error("impostos_detalhados", "insert into", err))
}

pub fn create_pagamento(new_pagamento: &NewPagamento, conn: &mut Connection) -> ImportResult<()> {
    diesel::insert_into(pagamento::table)
        .values(new_pagamento)
        .execute(conn)
        .map(|_| ())
        .map_err(|err| persistence_error("pagamento", "insert into", err))
}

/// Counts loaded document headers.
pub fn count_nfce(conn: &mut Connection) -> ImportResult<i64> {
    nfce::table
        .count()
        .get_result(conn)
        .map_err(|err| persistence_error("nfce", "count", err))
}
