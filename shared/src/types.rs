//! Common types used across the registry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when decoding wire strings into registry types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid donor id: {0}")]
    InvalidDonorId(String),

    #[error("unknown blood group: {0}")]
    UnknownBloodGroup(String),

    #[error("unknown availability: {0}")]
    UnknownAvailability(String),

    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
}

/// Identifier of a donor record.
///
/// The store assigns it on creation. On the wire it is always the
/// hyphenated lowercase string produced by [`fmt::Display`]; [`DonorId::parse`]
/// is the inverse and is the only place a wire string becomes an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonorId(Uuid);

impl DonorId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Decode a wire identifier
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| ParseError::InvalidDonorId(raw.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DonorId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DonorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for DonorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DonorId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// ABO/Rh blood groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// All groups in the order the UI lists them
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s.trim())
            .ok_or_else(|| ParseError::UnknownBloodGroup(s.to_string()))
    }
}

/// Donor's current willingness or ability to donate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Available,
    Unavailable,
    EmergencyOnly,
}

impl Availability {
    pub const ALL: [Availability; 3] = [
        Availability::Available,
        Availability::Unavailable,
        Availability::EmergencyOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
            Availability::EmergencyOnly => "emergency_only",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Unavailable => "Unavailable",
            Availability::EmergencyOnly => "Emergency Only",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Availability::ALL
            .into_iter()
            .find(|a| a.as_str() == s.trim())
            .ok_or_else(|| ParseError::UnknownAvailability(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donor_id_wire_encoding() {
        let id = DonorId::new();
        let wire = id.to_string();

        assert_eq!(wire.len(), 36);
        assert_eq!(DonorId::parse(&wire), Ok(id));
        assert_eq!(
            serde_json::to_value(id).unwrap(),
            serde_json::Value::String(wire)
        );
    }

    #[test]
    fn test_donor_id_rejects_garbage() {
        assert!(matches!(
            DonorId::parse("not-an-id"),
            Err(ParseError::InvalidDonorId(_))
        ));
        assert!(DonorId::parse("").is_err());
    }

    #[test]
    fn test_blood_group_strings() {
        for group in BloodGroup::ALL {
            assert_eq!(group.as_str().parse::<BloodGroup>(), Ok(group));
            assert_eq!(
                serde_json::to_value(group).unwrap(),
                serde_json::Value::String(group.as_str().to_string())
            );
        }
        assert!("C+".parse::<BloodGroup>().is_err());
        assert!("a+".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn test_availability_default_and_wire() {
        assert_eq!(Availability::default(), Availability::Available);
        let parsed: Availability = serde_json::from_str("\"emergency_only\"").unwrap();
        assert_eq!(parsed, Availability::EmergencyOnly);
        assert_eq!(Availability::EmergencyOnly.label(), "Emergency Only");
        assert!(serde_json::from_str::<Availability>("\"busy\"").is_err());
    }
}
