//! Donor form state machine
//!
//! The form works on raw input strings, the way an HTML form holds them,
//! and only turns them into typed payloads on submit.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Donor, DonorPatch, NewDonor};
use crate::types::{Availability, BloodGroup, DonorId};
use crate::validation::{
    validate_email, validate_latitude, validate_longitude, validate_required,
};

/// Whether the form creates a new donor or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(DonorId),
}

/// Raw input values of the donor form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonorFormValues {
    pub name: String,
    pub blood_group: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub location_city: String,
    pub location_address: String,
    pub latitude: String,
    pub longitude: String,
    pub availability: String,
    pub last_donation: String,
    pub notes: String,
}

impl Default for DonorFormValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            blood_group: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            location_city: String::new(),
            location_address: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            availability: Availability::default().as_str().to_string(),
            last_donation: String::new(),
            notes: String::new(),
        }
    }
}

impl From<&Donor> for DonorFormValues {
    fn from(donor: &Donor) -> Self {
        let d = &donor.details;
        Self {
            name: d.name.clone(),
            blood_group: d.blood_group.to_string(),
            contact_phone: d.contact_phone.clone(),
            contact_email: d.contact_email.clone().unwrap_or_default(),
            location_city: d.location_city.clone().unwrap_or_default(),
            location_address: d.location_address.clone().unwrap_or_default(),
            latitude: d.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: d.longitude.map(|v| v.to_string()).unwrap_or_default(),
            availability: d.availability.to_string(),
            last_donation: d
                .last_donation
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            notes: d.notes.clone().unwrap_or_default(),
        }
    }
}

/// A single field problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fix the highlighted fields ({})", join(.0))]
    Invalid(Vec<FieldError>),

    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Request the form produces on submit
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    Create(NewDonor),
    Update(DonorId, DonorPatch),
}

/// Field values after parsing
struct Parsed {
    name: String,
    blood_group: BloodGroup,
    contact_phone: String,
    contact_email: Option<String>,
    location_city: Option<String>,
    location_address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    availability: Availability,
    last_donation: Option<NaiveDate>,
    notes: Option<String>,
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl DonorFormValues {
    /// Check every field, collecting all problems
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        self.parse().map(|_| ())
    }

    fn parse(&self) -> Result<Parsed, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut check = |field: &'static str, result: Result<(), &'static str>| {
            if let Err(message) = result {
                errors.push(FieldError { field, message });
            }
        };

        check("name", validate_required(&self.name));

        let blood_group = match self.blood_group.trim() {
            "" => {
                check("bloodGroup", Err("Select a blood group"));
                None
            }
            raw => match raw.parse::<BloodGroup>() {
                Ok(group) => Some(group),
                Err(_) => {
                    check("bloodGroup", Err("Unknown blood group"));
                    None
                }
            },
        };

        check("contactPhone", validate_required(&self.contact_phone));

        let contact_email = optional_text(&self.contact_email);
        if let Some(email) = &contact_email {
            check("contactEmail", validate_email(email));
        }

        let mut coordinate = |field: &'static str,
                              raw: &str,
                              range: fn(f64) -> Result<(), &'static str>| {
            match raw.trim() {
                "" => None,
                text => match text.parse::<f64>() {
                    Ok(value) => {
                        check(field, range(value));
                        Some(value)
                    }
                    Err(_) => {
                        check(field, Err("Must be a number"));
                        None
                    }
                },
            }
        };
        let latitude = coordinate("latitude", &self.latitude, validate_latitude);
        let longitude = coordinate("longitude", &self.longitude, validate_longitude);

        let availability = match self.availability.trim() {
            "" => Availability::default(),
            raw => raw.parse().unwrap_or_else(|_| {
                check("availability", Err("Unknown availability"));
                Availability::default()
            }),
        };

        let last_donation = match self.last_donation.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    check("lastDonation", Err("Use the YYYY-MM-DD format"));
                    None
                }
            },
        };

        match blood_group {
            Some(blood_group) if errors.is_empty() => Ok(Parsed {
                name: self.name.trim().to_string(),
                blood_group,
                contact_phone: self.contact_phone.trim().to_string(),
                contact_email,
                location_city: optional_text(&self.location_city),
                location_address: optional_text(&self.location_address),
                latitude,
                longitude,
                availability,
                last_donation,
                notes: optional_text(&self.notes),
            }),
            _ => Err(errors),
        }
    }

    /// Payload for creating a donor. Empty optional inputs become null.
    pub fn to_new_donor(&self) -> Result<NewDonor, FormError> {
        let p = self.parse().map_err(FormError::Invalid)?;
        Ok(NewDonor {
            name: p.name,
            blood_group: p.blood_group,
            contact_phone: p.contact_phone,
            contact_email: p.contact_email,
            location_city: p.location_city,
            location_address: p.location_address,
            latitude: p.latitude,
            longitude: p.longitude,
            availability: p.availability,
            last_donation: p.last_donation,
            notes: p.notes,
            created_at: None,
        })
    }

    /// Patch carrying every form field; cleared inputs become explicit nulls
    pub fn to_patch(&self) -> Result<DonorPatch, FormError> {
        let p = self.parse().map_err(FormError::Invalid)?;
        Ok(DonorPatch {
            name: Some(p.name),
            blood_group: Some(p.blood_group),
            contact_phone: Some(p.contact_phone),
            contact_email: Some(p.contact_email),
            location_city: Some(p.location_city),
            location_address: Some(p.location_address),
            latitude: Some(p.latitude),
            longitude: Some(p.longitude),
            availability: Some(p.availability),
            last_donation: Some(p.last_donation),
            notes: Some(p.notes),
        })
    }
}

/// The donor form: mode, input values and submit state
#[derive(Debug, Clone, PartialEq)]
pub struct DonorForm {
    mode: FormMode,
    pub values: DonorFormValues,
    submitting: bool,
    error: Option<String>,
}

impl DonorForm {
    /// Blank form for a new donor
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            values: DonorFormValues::default(),
            submitting: false,
            error: None,
        }
    }

    /// Form pre-populated from an existing donor
    pub fn edit(donor: &Donor) -> Self {
        Self {
            mode: FormMode::Edit(donor.id),
            values: DonorFormValues::from(donor),
            submitting: false,
            error: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Donor",
            FormMode::Edit(_) => "Edit Donor",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.submitting, self.mode) {
            (true, _) => "Saving...",
            (false, FormMode::Create) => "Add Donor",
            (false, FormMode::Edit(_)) => "Update Donor",
        }
    }

    /// Build the request without changing state
    pub fn submission(&self) -> Result<FormSubmission, FormError> {
        match self.mode {
            FormMode::Create => self.values.to_new_donor().map(FormSubmission::Create),
            FormMode::Edit(id) => self
                .values
                .to_patch()
                .map(|patch| FormSubmission::Update(id, patch)),
        }
    }

    /// Start submitting: validates and marks the form busy.
    /// On validation failure the form stays editable with the error shown.
    pub fn begin_submit(&mut self) -> Result<FormSubmission, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        match self.submission() {
            Ok(submission) => {
                self.submitting = true;
                self.error = None;
                Ok(submission)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// The request failed; keep the form open for correction
    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    /// The request succeeded
    pub fn finish(&mut self) {
        self.submitting = false;
        self.error = None;
    }
}
