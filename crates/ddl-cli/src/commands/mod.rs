//! Command implementations

pub mod profile;
pub mod status;
pub mod sync;
