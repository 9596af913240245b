//! In-process donor store

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use shared::{DeleteResult, Donor, DonorId, DonorPatch, DonorQuery, NewDonor, UpdateResult};
use tokio::sync::RwLock;

use super::{DonorStore, StoreError, StoreResult};

/// Donor store kept in a vector, in insertion order
#[derive(Debug, Default)]
pub struct MemoryDonorStore {
    donors: RwLock<Vec<Donor>>,
    closed: AtomicBool,
}

impl MemoryDonorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl DonorStore for MemoryDonorStore {
    async fn create(&self, donor: NewDonor) -> StoreResult<DonorId> {
        self.ensure_open()?;
        let id = DonorId::new();
        let details = donor.into_details(Utc::now());
        self.donors.write().await.push(Donor::new(id, details));
        Ok(id)
    }

    async fn list(&self, query: &DonorQuery) -> StoreResult<Vec<Donor>> {
        self.ensure_open()?;
        let donors = self.donors.read().await;
        Ok(donors
            .iter()
            .filter(|donor| query.matches(&donor.details))
            .cloned()
            .collect())
    }

    async fn get(&self, id: DonorId) -> StoreResult<Option<Donor>> {
        self.ensure_open()?;
        let donors = self.donors.read().await;
        Ok(donors.iter().find(|donor| donor.id == id).cloned())
    }

    async fn update(&self, id: DonorId, patch: &DonorPatch) -> StoreResult<UpdateResult> {
        self.ensure_open()?;
        let mut donors = self.donors.write().await;
        let result = match donors.iter_mut().find(|donor| donor.id == id) {
            Some(donor) => UpdateResult {
                matched_count: 1,
                modified_count: u64::from(donor.details.apply(patch)),
            },
            None => UpdateResult::default(),
        };
        Ok(result)
    }

    async fn delete(&self, id: DonorId) -> StoreResult<DeleteResult> {
        self.ensure_open()?;
        let mut donors = self.donors.write().await;
        let before = donors.len();
        donors.retain(|donor| donor.id != id);
        Ok(DeleteResult {
            deleted_count: (before - donors.len()) as u64,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
