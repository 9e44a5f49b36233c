//! Profile configuration for ddlrepo
//!
//! Named warehouse connection profiles stored in a single TOML file, with
//! one active profile. Profiles are explicit values passed into the sync
//! pipeline; there is no ambient configuration state.

pub mod config;
pub mod error;

pub use config::{DEFAULT_CONFIG_FILE, KNOWN_PLATFORMS, Profile, ProfileStore};
pub use error::{Error, Result};
