//! Shared command context: config location and profile resolution

use std::path::PathBuf;

use ddl_meta::{Profile, ProfileStore};

use crate::error::Result;

/// Resolves the profile store and the profile a command should run with.
pub struct Context {
    pub store: ProfileStore,
    /// Profile name override from `--profile`
    pub profile_override: Option<String>,
}

impl Context {
    pub fn load(config: Option<PathBuf>, profile_override: Option<String>) -> Result<Self> {
        let store = match config {
            Some(path) => ProfileStore::load(path)?,
            None => ProfileStore::load_default()?,
        };
        Ok(Self {
            store,
            profile_override,
        })
    }

    /// The profile this command runs with: `--profile` if given, otherwise
    /// the active profile.
    pub fn profile(&self) -> Result<(&str, &Profile)> {
        match &self.profile_override {
            Some(name) => Ok((name.as_str(), self.store.get(name)?)),
            None => {
                let profile = self.store.active_profile()?;
                let name = self
                    .store
                    .active_profile_name()
                    .unwrap_or_default();
                Ok((name, profile))
            }
        }
    }
}
