//! Donor models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::types::{Availability, BloodGroup, DonorId};
use crate::validation::{validate_coordinates, validate_not_blank};

/// Stored document of a donor: every field except the identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorDetails {
    pub name: String,
    pub blood_group: BloodGroup,
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub location_city: Option<String>,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub last_donation: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A potential blood donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: DonorId,
    #[serde(flatten)]
    pub details: DonorDetails,
}

impl Donor {
    pub fn new(id: DonorId, details: DonorDetails) -> Self {
        Self { id, details }
    }
}

/// Payload for creating a donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "new_donor_coordinates"))]
pub struct NewDonor {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    pub blood_group: BloodGroup,
    #[validate(custom = "validate_not_blank")]
    pub contact_phone: String,
    #[serde(default)]
    #[validate(email)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub location_city: Option<String>,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub last_donation: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Kept when supplied, otherwise stamped by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewDonor {
    /// Minimal donor with only the required fields set
    pub fn new(
        name: impl Into<String>,
        blood_group: BloodGroup,
        contact_phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            blood_group,
            contact_phone: contact_phone.into(),
            contact_email: None,
            location_city: None,
            location_address: None,
            latitude: None,
            longitude: None,
            availability: Availability::default(),
            last_donation: None,
            notes: None,
            created_at: None,
        }
    }

    /// Turn the payload into a stored document
    pub fn into_details(self, now: DateTime<Utc>) -> DonorDetails {
        DonorDetails {
            name: self.name,
            blood_group: self.blood_group,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            location_city: self.location_city,
            location_address: self.location_address,
            latitude: self.latitude,
            longitude: self.longitude,
            availability: self.availability,
            last_donation: self.last_donation,
            notes: self.notes,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

/// Partial update of a donor.
///
/// Absent keys keep the stored value. For optional fields an explicit
/// `null` clears the stored value, which is why those are `Option<Option<_>>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "patch_coordinates"))]
pub struct DonorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_not_blank")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_not_blank")]
    pub contact_phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(email)]
    pub contact_email: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub location_city: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub location_address: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_donation: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

fn new_donor_coordinates(donor: &NewDonor) -> Result<(), ValidationError> {
    validate_coordinates(donor.latitude, donor.longitude)
}

fn patch_coordinates(patch: &DonorPatch) -> Result<(), ValidationError> {
    validate_coordinates(patch.latitude.flatten(), patch.longitude.flatten())
}

/// Maps a present key to `Some`, so `null` becomes `Some(None)`
fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl DonorPatch {
    pub fn is_empty(&self) -> bool {
        self == &DonorPatch::default()
    }
}

impl DonorDetails {
    /// Apply a partial update, returning whether any stored value changed
    pub fn apply(&mut self, patch: &DonorPatch) -> bool {
        fn set<T: PartialEq + Clone>(slot: &mut T, value: &Option<T>) -> bool {
            match value {
                Some(v) if *slot != *v => {
                    *slot = v.clone();
                    true
                }
                _ => false,
            }
        }

        let mut changed = false;
        changed |= set(&mut self.name, &patch.name);
        changed |= set(&mut self.blood_group, &patch.blood_group);
        changed |= set(&mut self.contact_phone, &patch.contact_phone);
        changed |= set(&mut self.contact_email, &patch.contact_email);
        changed |= set(&mut self.location_city, &patch.location_city);
        changed |= set(&mut self.location_address, &patch.location_address);
        changed |= set(&mut self.latitude, &patch.latitude);
        changed |= set(&mut self.longitude, &patch.longitude);
        changed |= set(&mut self.availability, &patch.availability);
        changed |= set(&mut self.last_donation, &patch.last_donation);
        changed |= set(&mut self.notes, &patch.notes);
        changed
    }
}

/// Store-side filter for listing donors; the default matches everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorQuery {
    pub blood_group: Option<BloodGroup>,
    pub availability: Option<Availability>,
    pub city: Option<String>,
}

impl DonorQuery {
    pub fn matches(&self, details: &DonorDetails) -> bool {
        self.blood_group.map_or(true, |g| details.blood_group == g)
            && self.availability.map_or(true, |a| details.availability == a)
            && self
                .city
                .as_deref()
                .map_or(true, |city| details.location_city.as_deref() == Some(city))
    }
}
