//! HTTP client for the donor API

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use shared::{
    DeleteResult, Donor, DonorId, DonorPatch, ErrorBody, InsertResult, NewDonor, UpdateResult,
};
use thiserror::Error;

/// Client-side API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, carrying the server's `error` message
    #[error("{message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// Remote donor collection as seen by the client
#[allow(async_fn_in_trait)]
pub trait DonorApi {
    async fn list_donors(&self) -> Result<Vec<Donor>, ApiError>;
    async fn create_donor(&self, input: &NewDonor) -> Result<InsertResult, ApiError>;
    async fn update_donor(&self, id: DonorId, patch: &DonorPatch)
        -> Result<UpdateResult, ApiError>;
    async fn delete_donor(&self, id: DonorId) -> Result<DeleteResult, ApiError>;
}

/// `DonorApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpDonorApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDonorApi {
    /// `base_url` is the server root, e.g. `http://localhost:4000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn donors_url(&self) -> String {
        format!("{}/api/donors", self.base_url)
    }

    fn donor_url(&self, id: DonorId) -> String {
        format!("{}/api/donors/{}", self.base_url, id)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => fallback_message(status),
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn fallback_message(status: StatusCode) -> String {
    format!("Request failed with status {}", status.as_u16())
}

impl DonorApi for HttpDonorApi {
    async fn list_donors(&self) -> Result<Vec<Donor>, ApiError> {
        let response = self.client.get(self.donors_url()).send().await?;
        Self::read(response).await
    }

    async fn create_donor(&self, input: &NewDonor) -> Result<InsertResult, ApiError> {
        let response = self
            .client
            .post(self.donors_url())
            .json(input)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn update_donor(
        &self,
        id: DonorId,
        patch: &DonorPatch,
    ) -> Result<UpdateResult, ApiError> {
        let response = self
            .client
            .put(self.donor_url(id))
            .json(patch)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn delete_donor(&self, id: DonorId) -> Result<DeleteResult, ApiError> {
        let response = self.client.delete(self.donor_url(id)).send().await?;
        Self::read(response).await
    }
}
