//! Object model for extracted warehouse metadata

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Warehouse platform a record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Snowflake,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Snowflake => "snowflake",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snowflake" => Ok(Platform::Snowflake),
            _ => Err(Error::UnknownPlatform {
                value: s.to_string(),
            }),
        }
    }
}

/// Kind of schema object the pipeline tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Table,
    View,
    MaterializedView,
    Stage,
    Pipe,
    StoredProcedure,
}

impl ObjectType {
    /// Extraction order for a full sync run.
    pub const ALL: [ObjectType; 6] = [
        ObjectType::Table,
        ObjectType::View,
        ObjectType::MaterializedView,
        ObjectType::Stage,
        ObjectType::Pipe,
        ObjectType::StoredProcedure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Table => "table",
            ObjectType::View => "view",
            ObjectType::MaterializedView => "materialized_view",
            ObjectType::Stage => "stage",
            ObjectType::Pipe => "pipe",
            ObjectType::StoredProcedure => "stored_procedure",
        }
    }

    /// Plural directory segment used by the DDL tree layout.
    pub fn plural_dir(&self) -> &'static str {
        match self {
            ObjectType::Table => "tables",
            ObjectType::View => "views",
            ObjectType::MaterializedView => "materialized_views",
            ObjectType::Stage => "stages",
            ObjectType::Pipe => "pipes",
            ObjectType::StoredProcedure => "stored_procedures",
        }
    }

    /// Inverse of [`ObjectType::plural_dir`], for identities recovered from
    /// on-disk paths.
    pub fn from_plural_dir(dir: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.plural_dir() == dir)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or(Error::UnknownObjectType {
                value: s.to_string(),
            })
    }
}

/// The (database, schema) pair one sync run extracts from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub database: String,
    pub schema: String,
}

impl Scope {
    pub fn new(database: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.schema)
    }
}

/// Unique identity of one schema object. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    pub platform: Platform,
    pub database: String,
    pub schema: String,
    pub object_type: ObjectType,
    pub name: String,
}

impl ObjectIdentity {
    pub fn new(
        platform: Platform,
        scope: &Scope,
        object_type: ObjectType,
        name: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            database: scope.database.clone(),
            schema: scope.schema.clone(),
            object_type,
            name: name.into(),
        }
    }

    /// Fully qualified `database.schema.name`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.database, self.schema, self.name)
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_type, self.qualified_name())
    }
}

/// Catalog field names the reconstructor understands.
///
/// Raw records carry an opaque field map; these are the keys with assigned
/// meaning. Everything else is preserved but ignored.
pub mod fields {
    /// Complete platform-provided DDL text (simple object types)
    pub const DEFINITION: &str = "definition";
    /// Parenthesized parameter list, e.g. `(ID VARCHAR, LIMIT NUMBER)`
    pub const ARGUMENT_SIGNATURE: &str = "argument_signature";
    /// Declared return type
    pub const RETURNS: &str = "returns";
    /// Procedure language (`SQL`, `JAVASCRIPT`, `PYTHON`, ...)
    pub const LANGUAGE: &str = "language";
    /// Raw procedure body from the metadata catalog
    pub const BODY: &str = "body";
    /// Runtime version for non-SQL languages
    pub const RUNTIME_VERSION: &str = "runtime_version";
    /// Handler entry point for non-SQL languages
    pub const HANDLER: &str = "handler";
    /// Package list for non-SQL languages
    pub const PACKAGES: &str = "packages";
    /// Clustering key reported in metadata
    pub const CLUSTER_BY: &str = "cluster_by";
}

/// Output of the extractor: identity plus the opaque platform field map.
///
/// Transient, produced fresh per sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObjectRecord {
    pub identity: ObjectIdentity,
    fields: BTreeMap<String, String>,
}

impl RawObjectRecord {
    pub fn new(identity: ObjectIdentity) -> Self {
        Self {
            identity,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Field lookup; absent and empty are both `None`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Final canonical DDL for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructedDdl {
    pub identity: ObjectIdentity,
    /// Normalized DDL text (LF line endings, single trailing newline)
    pub text: String,
    /// `sha256:<hex>` fingerprint of `text`
    pub fingerprint: String,
    /// False when structured fields were missing and the output is
    /// best-effort rather than directly re-executable
    pub complete: bool,
}

impl ReconstructedDdl {
    /// Normalize the text and derive its fingerprint.
    ///
    /// The fingerprint is a pure function of the normalized text; identical
    /// text always yields an identical fingerprint regardless of extraction
    /// order.
    pub fn new(identity: ObjectIdentity, text: &str, complete: bool) -> Self {
        let text = ddl_fs::normalize_text(text);
        let fingerprint = ddl_fs::fingerprint_content(&text);
        Self {
            identity,
            text,
            fingerprint,
            complete,
        }
    }
}
