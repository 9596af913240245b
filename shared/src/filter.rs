//! Client-side filtering and sorting of donor lists
//!
//! The listing view is recomputed from the full donor list every time the
//! list, the selected blood group, or the sort key changes. Nothing here
//! mutates the source list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Donor;
use crate::types::{BloodGroup, ParseError};

/// Blood group selection of the listing view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BloodGroupFilter {
    #[default]
    All,
    Only(BloodGroup),
}

impl BloodGroupFilter {
    pub fn matches(&self, donor: &Donor) -> bool {
        match self {
            BloodGroupFilter::All => true,
            BloodGroupFilter::Only(group) => donor.details.blood_group == *group,
        }
    }

    /// Options offered by the filter dropdown, "All" first
    pub fn options() -> impl Iterator<Item = BloodGroupFilter> {
        std::iter::once(BloodGroupFilter::All)
            .chain(BloodGroup::ALL.into_iter().map(BloodGroupFilter::Only))
    }
}

impl fmt::Display for BloodGroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BloodGroupFilter::All => f.write_str("All"),
            BloodGroupFilter::Only(group) => write!(f, "{}", group),
        }
    }
}

impl FromStr for BloodGroupFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "All" => Ok(BloodGroupFilter::All),
            other => other.parse().map(BloodGroupFilter::Only),
        }
    }
}

/// Sort order of the listing view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first by creation time
    #[default]
    Recent,
    /// Name A-Z
    Name,
    /// City A-Z
    City,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Recent, SortKey::Name, SortKey::City];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recent => "recent",
            SortKey::Name => "name",
            SortKey::City => "city",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Recent => "Most Recent",
            SortKey::Name => "Name (A-Z)",
            SortKey::City => "City (A-Z)",
        }
    }

    /// Ordering of two donors under this key
    pub fn compare(&self, a: &Donor, b: &Donor) -> Ordering {
        match self {
            SortKey::Recent => b.details.created_at.cmp(&a.details.created_at),
            SortKey::Name => a.details.name.cmp(&b.details.name),
            SortKey::City => {
                match (
                    a.details.location_city.as_deref(),
                    b.details.location_city.as_deref(),
                ) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| ParseError::UnknownSortKey(s.to_string()))
    }
}

/// Filter and sort selection of the listing view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DonorFilter {
    pub blood_group: BloodGroupFilter,
    pub sort_by: SortKey,
}

impl DonorFilter {
    pub fn new(blood_group: BloodGroupFilter, sort_by: SortKey) -> Self {
        Self {
            blood_group,
            sort_by,
        }
    }

    /// Derive the view: keep matching donors, then stable-sort them
    pub fn apply(&self, donors: &[Donor]) -> Vec<Donor> {
        let mut view: Vec<Donor> = donors
            .iter()
            .filter(|donor| self.blood_group.matches(donor))
            .cloned()
            .collect();
        view.sort_by(|a, b| self.sort_by.compare(a, b));
        view
    }
}

/// Convenience wrapper over [`DonorFilter::apply`]
pub fn filter_and_sort(
    donors: &[Donor],
    blood_group: BloodGroupFilter,
    sort_by: SortKey,
) -> Vec<Donor> {
    DonorFilter::new(blood_group, sort_by).apply(donors)
}
