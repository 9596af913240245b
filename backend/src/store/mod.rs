//! Donor record store
//!
//! A single collection of donor documents behind the [`DonorStore`] trait.
//! The server uses [`PgDonorStore`]; [`MemoryDonorStore`] keeps the same
//! semantics in process memory.

mod memory;
mod postgres;

pub use memory::MemoryDonorStore;
pub use postgres::PgDonorStore;

use async_trait::async_trait;
use shared::{DeleteResult, Donor, DonorId, DonorPatch, DonorQuery, NewDonor, UpdateResult};
use thiserror::Error;

/// Store failures. None of them are retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("store is closed")]
    Closed,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations over the donor collection
#[async_trait]
pub trait DonorStore: Send + Sync {
    /// Insert a donor and return its new identifier
    async fn create(&self, donor: NewDonor) -> StoreResult<DonorId>;

    /// Donors matching `query`, in insertion order
    async fn list(&self, query: &DonorQuery) -> StoreResult<Vec<Donor>>;

    async fn get(&self, id: DonorId) -> StoreResult<Option<Donor>>;

    /// Merge `patch` into the stored document
    async fn update(&self, id: DonorId, patch: &DonorPatch) -> StoreResult<UpdateResult>;

    /// Hard delete; an absent id yields a count of 0
    async fn delete(&self, id: DonorId) -> StoreResult<DeleteResult>;

    /// Connectivity probe
    async fn ping(&self) -> StoreResult<()>;

    /// Release connections; later calls fail
    async fn close(&self);
}
