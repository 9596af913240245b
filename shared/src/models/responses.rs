//! Response bodies of the donor API

use serde::{Deserialize, Serialize};

use crate::types::DonorId;

/// Result of creating a donor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub inserted_id: DonorId,
}

/// Result of a partial update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Result of a delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Health probe response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub database: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_use_camel_case() {
        let update = UpdateResult {
            matched_count: 1,
            modified_count: 0,
        };
        assert_eq!(
            serde_json::to_value(update).unwrap(),
            json!({ "matchedCount": 1, "modifiedCount": 0 })
        );
        assert_eq!(
            serde_json::to_value(DeleteResult { deleted_count: 1 }).unwrap(),
            json!({ "deletedCount": 1 })
        );
    }

    #[test]
    fn test_inserted_id_is_a_string() {
        let id = DonorId::new();
        let value = serde_json::to_value(InsertResult { inserted_id: id }).unwrap();
        assert_eq!(value, json!({ "insertedId": id.to_string() }));
    }

    #[test]
    fn test_error_body_omits_missing_field() {
        let body = ErrorBody {
            error: "Not found".to_string(),
            field: None,
        };
        assert_eq!(serde_json::to_value(body).unwrap(), json!({ "error": "Not found" }));
    }
}
