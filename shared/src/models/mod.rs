//! Domain models for the donor registry

mod donor;
mod responses;

pub use donor::*;
pub use responses::*;
