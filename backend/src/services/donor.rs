//! Donor service: identifier decoding, payload validation, store access

use std::sync::Arc;

use shared::{
    DeleteResult, Donor, DonorId, DonorPatch, DonorQuery, HealthStatus, InsertResult, NewDonor,
    UpdateResult,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::DonorStore;

/// Donor service for managing donor records
#[derive(Clone)]
pub struct DonorService {
    store: Arc<dyn DonorStore>,
}

impl DonorService {
    /// Create a new DonorService instance
    pub fn new(store: Arc<dyn DonorStore>) -> Self {
        Self { store }
    }

    /// Decode a wire identifier. A malformed id cannot name a stored
    /// donor, so it is reported the same way as an absent one.
    fn decode_id(raw: &str) -> AppResult<DonorId> {
        DonorId::parse(raw).map_err(|_| AppError::NotFound("Donor".to_string()))
    }

    /// List donors, all of them by default
    pub async fn list_donors(&self, query: &DonorQuery) -> AppResult<Vec<Donor>> {
        Ok(self.store.list(query).await?)
    }

    /// Create a donor
    pub async fn create_donor(&self, input: NewDonor) -> AppResult<InsertResult> {
        input.validate()?;

        let id = self.store.create(input).await?;
        tracing::info!(donor_id = %id, "Donor created");

        Ok(InsertResult { inserted_id: id })
    }

    /// Get a donor by wire identifier
    pub async fn get_donor(&self, raw_id: &str) -> AppResult<Donor> {
        let id = Self::decode_id(raw_id)?;
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Donor".to_string()))
    }

    /// Apply a partial update
    pub async fn update_donor(&self, raw_id: &str, patch: DonorPatch) -> AppResult<UpdateResult> {
        let id = Self::decode_id(raw_id)?;
        patch.validate()?;

        let result = self.store.update(id, &patch).await?;
        tracing::info!(
            donor_id = %id,
            matched = result.matched_count,
            modified = result.modified_count,
            "Donor updated"
        );

        Ok(result)
    }

    /// Delete a donor
    pub async fn delete_donor(&self, raw_id: &str) -> AppResult<DeleteResult> {
        let id = Self::decode_id(raw_id)?;

        let result = self.store.delete(id).await?;
        tracing::info!(donor_id = %id, deleted = result.deleted_count, "Donor deleted");

        Ok(result)
    }

    /// Service health, including store connectivity
    pub async fn health(&self) -> HealthStatus {
        let database = match self.store.ping().await {
            Ok(()) => "connected",
            Err(err) => {
                tracing::warn!("Health check could not reach the store: {}", err);
                "disconnected"
            }
        };

        HealthStatus {
            ok: true,
            database: database.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDonorStore;
    use shared::BloodGroup;

    fn service() -> DonorService {
        DonorService::new(Arc::new(MemoryDonorStore::new()))
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get_donor("123").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_donor("xyz").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let service = service();
        let result = service
            .create_donor(NewDonor::new(" ", BloodGroup::APositive, "555"))
            .await;
        assert!(matches!(
            result,
            Err(AppError::Validation { ref field, .. }) if field == "name"
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_phone() {
        let service = service();
        let created = service
            .create_donor(NewDonor::new("Jane", BloodGroup::APositive, "555"))
            .await
            .unwrap();
        let patch = DonorPatch {
            contact_phone: Some("".to_string()),
            ..Default::default()
        };

        let result = service
            .update_donor(&created.inserted_id.to_string(), patch)
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_health_reports_store_state() {
        let store = Arc::new(MemoryDonorStore::new());
        let service = DonorService::new(store.clone());

        assert_eq!(service.health().await.database, "connected");
        store.close().await;

        let health = service.health().await;
        assert!(health.ok);
        assert_eq!(health.database, "disconnected");
    }
}
