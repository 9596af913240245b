//! Business logic services for the Blood Donor Registry

pub mod donor;

pub use donor::DonorService;
