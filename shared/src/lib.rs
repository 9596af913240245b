//! Shared types and models for the Blood Donor Registry
//!
//! This crate contains the donor model and the client-side logic shared
//! between the backend, the browser (via WASM), and tests: filtering and
//! sorting of donor lists, and the donor form state machine.

pub mod filter;
pub mod form;
pub mod models;
pub mod types;
pub mod validation;

pub use filter::*;
pub use form::*;
pub use models::*;
pub use types::*;
pub use validation::*;
