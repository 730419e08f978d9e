//! Postgres connection setup

use diesel::{
    pg::PgConnection,
    r2d2::{self, ConnectionManager},
    Connection as _,
};

use crate::error::{ImportError, ImportResult};

pub type Connection = PgConnection;
pub type Pool = r2d2::Pool<ConnectionManager<Connection>>;

/// Builds the connection pool used by the importer.
///
/// Connections are checked out one document at a time, so a small pool is enough.
pub fn init_db_pool(url: &str, max_size: u32) -> ImportResult<Pool> {
    log::info!("Configuring database pool (max_size = {})", max_size);
    let manager = ConnectionManager::<Connection>::new(url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| ImportError::configuration(format!("failed to create pool: {}", e)))
}

/// Opens a single dedicated connection.
pub fn establish_connection(url: &str) -> ImportResult<Connection> {
    Connection::establish(url).map_err(|e| {
        ImportError::configuration(format!("failed to connect to the database: {}", e))
    })
}
