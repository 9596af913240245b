//! Validation utilities for the Blood Donor Registry
//!
//! Plain checks return `&'static str` messages for the form; the
//! `ValidationError` adapters plug the same checks into `validator` derives
//! on the API payloads.

use std::borrow::Cow;

use validator::ValidationError;

// ============================================================================
// Field Validations
// ============================================================================

/// Validate that a required text field has visible content
pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("This field is required");
    }
    Ok(())
}

/// Validate email format with the same rules as `#[validate(email)]`
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !validator::validate_email(email) {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate latitude in decimal degrees
pub fn validate_latitude(latitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate longitude in decimal degrees
pub fn validate_longitude(longitude: f64) -> Result<(), &'static str> {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

// ============================================================================
// validator Adapters
// ============================================================================

fn to_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// `validator` custom check for required text
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    validate_required(value).map_err(|msg| to_validation_error("required", msg))
}

/// `validator` schema check for an optional coordinate pair.
/// Latitude and longitude are independent; each is checked when present.
pub fn validate_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(latitude) = latitude {
        validate_latitude(latitude).map_err(|msg| to_validation_error("latitude", msg))?;
    }
    if let Some(longitude) = longitude {
        validate_longitude(longitude).map_err(|msg| to_validation_error("longitude", msg))?;
    }
    Ok(())
}
