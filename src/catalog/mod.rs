//! Disease catalog access.
//!
//! Scorers never cache catalog rows: every scoring call fetches the full
//! catalog again through [`DiseaseCatalog::fetch_all`]. The rule-based path
//! tolerates an unreachable store by switching to the embedded catalog;
//! the LLM fallback stage does not.

pub mod embedded;
pub mod sqlite;

pub use embedded::*;
pub use sqlite::*;

use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::Disease;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Internal lock error")]
    LockPoisoned,
}

/// Read-only source of disease rows.
pub trait DiseaseCatalog: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<Disease>, CatalogError>;
}

impl<C: DiseaseCatalog + ?Sized> DiseaseCatalog for std::sync::Arc<C> {
    fn fetch_all(&self) -> Result<Vec<Disease>, CatalogError> {
        (**self).fetch_all()
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    diseases: Vec<Disease>,
}

impl StaticCatalog {
    pub fn new(diseases: Vec<Disease>) -> Self {
        Self { diseases }
    }

    /// The 8 embedded entries.
    pub fn embedded() -> Self {
        Self::new(embedded_catalog())
    }
}

impl DiseaseCatalog for StaticCatalog {
    fn fetch_all(&self) -> Result<Vec<Disease>, CatalogError> {
        Ok(self.diseases.clone())
    }
}

/// Fetch the catalog, failing over to the embedded entries when the store
/// cannot be read.
pub fn fetch_or_embedded<C: DiseaseCatalog + ?Sized>(catalog: &C) -> Vec<Disease> {
    match catalog.fetch_all() {
        Ok(diseases) => diseases,
        Err(e) => {
            tracing::warn!(error = %e, "Disease catalog unavailable, using embedded catalog");
            embedded_catalog()
        }
    }
}

/// Exact-name lookup over a fetched catalog.
pub fn find_by_name<'a>(diseases: &'a [Disease], name: &str) -> Option<&'a Disease> {
    diseases.iter().find(|d| d.name == name)
}
