//! WebAssembly module for the Blood Donor Registry
//!
//! Provides the client side of the registry:
//! - Donor list filtering and sorting
//! - Donor form validation and payload building
//! - The dashboard controller over the HTTP API

pub mod api;
pub mod dashboard;

use wasm_bindgen::prelude::*;

pub use api::{ApiError, DonorApi, HttpDonorApi};
pub use dashboard::{Dashboard, Notice, NoticeLevel};

// Re-export shared types for Rust callers
pub use shared::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str("Blood Donor Registry client loaded"));
}

/// Warning for the browser console; native builds go through `tracing`
pub(crate) fn log_warning(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));

    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{}", message);
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

/// Filter and sort a JSON donor array.
/// `blood_group` is "All" or a group such as "O-"; `sort_by` is
/// "recent", "name" or "city".
#[wasm_bindgen]
pub fn filter_donors(donors_json: &str, blood_group: &str, sort_by: &str) -> Result<String, JsValue> {
    let donors: Vec<Donor> =
        serde_json::from_str(donors_json).map_err(|e| js_error("Invalid donors JSON", e))?;
    let blood_group: BloodGroupFilter = blood_group
        .parse()
        .map_err(|e| js_error("Invalid blood group", e))?;
    let sort_by: SortKey = sort_by.parse().map_err(|e| js_error("Invalid sort key", e))?;

    let view = filter_and_sort(&donors, blood_group, sort_by);
    serde_json::to_string(&view).map_err(|e| js_error("Failed to encode donors", e))
}

/// Validate raw form values, returning a JSON array of `{field, message}`
#[wasm_bindgen]
pub fn validate_donor_form(values_json: &str) -> Result<String, JsValue> {
    let values: DonorFormValues =
        serde_json::from_str(values_json).map_err(|e| js_error("Invalid form JSON", e))?;

    let errors = values.validate().err().unwrap_or_default();
    serde_json::to_string(&errors).map_err(|e| js_error("Failed to encode errors", e))
}

/// Build the create payload from raw form values
#[wasm_bindgen]
pub fn donor_form_payload(values_json: &str) -> Result<String, JsValue> {
    let values: DonorFormValues =
        serde_json::from_str(values_json).map_err(|e| js_error("Invalid form JSON", e))?;

    let input = values
        .to_new_donor()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&input).map_err(|e| js_error("Failed to encode donor", e))
}

/// Blood group options in display order
#[wasm_bindgen]
pub fn blood_groups() -> js_sys::Array {
    BloodGroup::ALL
        .iter()
        .map(|group| JsValue::from_str(group.as_str()))
        .collect()
}
