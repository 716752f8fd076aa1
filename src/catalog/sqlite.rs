use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use super::embedded::seed_catalog;
use super::{CatalogError, DiseaseCatalog};
use crate::db::{self, DatabaseError};
use crate::models::Disease;

/// Catalog backed by the `diseases` table.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Wrap an already-migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (and migrate) the database at `path`, seeding an empty catalog.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = db::open_database(path)?;
        seed_if_empty(&conn)?;
        Ok(Self::new(conn))
    }

    /// Seeded in-memory catalog (for testing)
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let conn = db::open_memory_database()?;
        seed_if_empty(&conn)?;
        Ok(Self::new(conn))
    }

    /// Run `f` against the underlying connection.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, CatalogError> {
        let conn = self.conn.lock().map_err(|_| CatalogError::LockPoisoned)?;
        Ok(f(&conn)?)
    }
}

impl DiseaseCatalog for SqliteCatalog {
    fn fetch_all(&self) -> Result<Vec<Disease>, CatalogError> {
        let diseases = self.with_connection(db::list_diseases)?;
        tracing::debug!(count = diseases.len(), "Fetched disease catalog");
        Ok(diseases)
    }
}

/// Insert the seed rows when the table is empty. Returns rows inserted.
pub fn seed_if_empty(conn: &Connection) -> Result<usize, DatabaseError> {
    if db::count_diseases(conn)? > 0 {
        return Ok(0);
    }

    let seed = seed_catalog();
    let tx = conn.unchecked_transaction()?;
    for disease in &seed {
        db::insert_disease(&tx, disease)?;
    }
    tx.commit()?;

    tracing::info!(count = seed.len(), "Seeded disease catalog");
    Ok(seed.len())
}
