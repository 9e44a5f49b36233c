//! Profile configuration types and loading
//!
//! Configuration lives in a single TOML file (default `~/.ddlrepo.toml`)
//! holding named connection profiles and one `active_profile` pointer. A
//! profile is an explicit value threaded through every call; nothing in the
//! workspace reads ambient profile state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of the default per-user config
pub const DEFAULT_CONFIG_FILE: &str = ".ddlrepo.toml";

/// Platforms a profile may name
pub const KNOWN_PLATFORMS: &[&str] = &["snowflake"];

/// One named warehouse connection profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Warehouse platform, e.g. "snowflake"
    pub platform: String,

    /// Root directory of the materialized DDL tree
    pub ddl_root: PathBuf,

    /// Account locator (Snowflake)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Database to extract from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Schema to extract from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_author_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_author_email: Option<String>,

    /// Push to the remote after a successful commit
    #[serde(default)]
    pub auto_push: bool,
}

impl Profile {
    /// Validate the profile, returning every problem found.
    ///
    /// Platform-specific required fields follow the platform's adapter:
    /// Snowflake needs `account`, `username`, `database`, and `schema`.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !KNOWN_PLATFORMS.contains(&self.platform.as_str()) {
            errors.push(format!("unknown platform '{}'", self.platform));
        }
        if self.ddl_root.as_os_str().is_empty() {
            errors.push("ddl_root must not be empty".to_string());
        }

        if self.platform == "snowflake" {
            for (field, value) in [
                ("account", &self.account),
                ("username", &self.username),
                ("database", &self.database),
                ("schema", &self.schema),
            ] {
                if value.as_deref().unwrap_or("").is_empty() {
                    errors.push(format!("snowflake profile missing required field '{field}'"));
                }
            }
        }

        errors
    }
}

/// On-disk shape of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_profile: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    profiles: BTreeMap<String, Profile>,
}

/// Loads, validates, and persists the profile config file.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    config: ConfigFile,
}

impl ProfileStore {
    /// Default config path: `~/.ddlrepo.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        Ok(home.join(DEFAULT_CONFIG_FILE))
    }

    /// Load the store from an explicit path. A missing file is an empty
    /// config, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| Error::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: ConfigFile =
                toml::from_str(&raw).map_err(|e| Error::ConfigParse {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            Self::validate_structure(&path, &config)?;
            tracing::debug!(
                path = %path.display(),
                profiles = config.profiles.len(),
                "loaded profile config"
            );
            config
        } else {
            tracing::debug!(path = %path.display(), "no config file; starting empty");
            ConfigFile::default()
        };

        Ok(Self { path, config })
    }

    /// Load from the default per-user location.
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path()?)
    }

    fn validate_structure(path: &Path, config: &ConfigFile) -> Result<()> {
        if let Some(active) = &config.active_profile
            && !config.profiles.contains_key(active)
        {
            return Err(Error::ConfigParse {
                path: path.to_path_buf(),
                message: format!("active profile '{active}' does not exist"),
            });
        }
        Ok(())
    }

    /// Persist the config, creating the parent directory if needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let raw = toml::to_string_pretty(&self.config)
            .map_err(|e| Error::ConfigSerialize(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| Error::Io {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), "saved profile config");
        Ok(())
    }

    /// Path this store reads from and writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the active profile, if one is set.
    pub fn active_profile_name(&self) -> Option<&str> {
        self.config.active_profile.as_deref()
    }

    /// The active profile itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveProfile`] when none is configured.
    pub fn active_profile(&self) -> Result<&Profile> {
        let name = self
            .config
            .active_profile
            .as_deref()
            .ok_or(Error::NoActiveProfile)?;
        self.get(name)
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.config
            .profiles
            .get(name)
            .ok_or_else(|| Error::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Sorted profile names.
    pub fn list(&self) -> Vec<&str> {
        self.config.profiles.keys().map(String::as_str).collect()
    }

    /// Insert or replace a profile after validating it.
    pub fn set(&mut self, name: &str, profile: Profile) -> Result<()> {
        if name.is_empty() {
            return Err(Error::ProfileInvalid {
                name: name.to_string(),
                reason: "profile name must not be empty".to_string(),
            });
        }
        let errors = profile.validation_errors();
        if !errors.is_empty() {
            return Err(Error::ProfileInvalid {
                name: name.to_string(),
                reason: errors.join("; "),
            });
        }
        self.config.profiles.insert(name.to_string(), profile);
        Ok(())
    }

    /// Make `name` the active profile.
    pub fn set_active(&mut self, name: &str) -> Result<()> {
        self.get(name)?;
        self.config.active_profile = Some(name.to_string());
        Ok(())
    }

    /// Delete a profile. The active profile cannot be deleted.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if !self.config.profiles.contains_key(name) {
            return Err(Error::ProfileNotFound {
                name: name.to_string(),
            });
        }
        if self.active_profile_name() == Some(name) {
            return Err(Error::ActiveProfileDelete {
                name: name.to_string(),
            });
        }
        self.config.profiles.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snowflake_profile(root: &Path) -> Profile {
        Profile {
            platform: "snowflake".to_string(),
            ddl_root: root.to_path_buf(),
            account: Some("xy12345".to_string()),
            username: Some("extractor".to_string()),
            database: Some("ANALYTICS".to_string()),
            schema: Some("PUBLIC".to_string()),
            warehouse: Some("COMPUTE_WH".to_string()),
            role: None,
            git_author_name: Some("DDL Bot".to_string()),
            git_author_email: Some("ddl-bot@example.com".to_string()),
            auto_push: false,
        }
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::load(dir.path().join("none.toml")).unwrap();
        assert!(store.list().is_empty());
        assert!(store.active_profile_name().is_none());
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut store = ProfileStore::load(&path).unwrap();
        store.set("prod", snowflake_profile(dir.path())).unwrap();
        store.set_active("prod").unwrap();
        store.save().unwrap();

        let reloaded = ProfileStore::load(&path).unwrap();
        assert_eq!(reloaded.active_profile_name(), Some("prod"));
        assert_eq!(reloaded.active_profile().unwrap().platform, "snowflake");
    }

    #[test]
    fn set_rejects_invalid_snowflake_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::load(dir.path().join("c.toml")).unwrap();

        let mut profile = snowflake_profile(dir.path());
        profile.account = None;
        profile.schema = Some(String::new());

        let err = store.set("bad", profile).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("account"));
        assert!(msg.contains("schema"));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::load(dir.path().join("c.toml")).unwrap();

        let mut profile = snowflake_profile(dir.path());
        profile.platform = "teradata".to_string();

        assert!(store.set("bad", profile).is_err());
    }

    #[test]
    fn cannot_activate_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::load(dir.path().join("c.toml")).unwrap();
        assert!(store.set_active("ghost").is_err());
    }

    #[test]
    fn cannot_delete_active_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::load(dir.path().join("c.toml")).unwrap();
        store.set("prod", snowflake_profile(dir.path())).unwrap();
        store.set_active("prod").unwrap();

        assert!(matches!(
            store.delete("prod"),
            Err(Error::ActiveProfileDelete { .. })
        ));
    }

    #[test]
    fn dangling_active_profile_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "active_profile = \"ghost\"\n").unwrap();

        assert!(ProfileStore::load(&path).is_err());
    }
}
