//! HTTP handlers for the Blood Donor Registry

mod donor;
mod health;

pub use donor::*;
pub use health::*;
