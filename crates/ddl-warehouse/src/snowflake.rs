//! Snowflake platform adapter

use crate::adapter::{ExtractBatch, PlatformAdapter, fetch_listed};
use crate::error::Result;
use crate::procedure::reconstruct_procedure;
use crate::record::{
    ObjectType, Platform, RawObjectRecord, ReconstructedDdl, Scope, fields,
};
use crate::session::WarehouseSession;

/// Snowflake adapter: listing via `SHOW`-style metadata, definitions via
/// `GET_DDL`, and stored-procedure bodies via the information-schema catalog
/// view (the only source that returns the body unescaped).
pub struct SnowflakeAdapter;

impl PlatformAdapter for SnowflakeAdapter {
    fn platform(&self) -> Platform {
        Platform::Snowflake
    }

    fn extract(
        &self,
        session: &dyn WarehouseSession,
        object_type: ObjectType,
        scope: &Scope,
    ) -> Result<ExtractBatch> {
        let identities = session.list_objects(object_type, scope)?;

        // Keep the batch honest: drop listings that fell outside the
        // requested scope or type instead of materializing them in the
        // wrong place of the tree.
        let identities = identities
            .into_iter()
            .filter(|id| {
                let in_scope = id.object_type == object_type
                    && id.database == scope.database
                    && id.schema == scope.schema;
                if !in_scope {
                    tracing::warn!(identity = %id, "listing returned out-of-scope object; ignoring");
                }
                in_scope
            })
            .collect();

        Ok(fetch_listed(session, identities))
    }

    fn reconstruct(&self, record: &RawObjectRecord) -> Result<ReconstructedDdl> {
        let ddl = match record.identity.object_type {
            ObjectType::StoredProcedure => reconstruct_procedure(record),
            _ => reconstruct_simple(record),
        };
        Ok(ddl)
    }
}

/// Near-pass-through reconstruction for simple object types.
///
/// The platform-provided definition is normalized, and a clustering key
/// reported only in metadata is folded into the statement in one canonical
/// position, so re-running against an unchanged object never produces a
/// spurious diff.
fn reconstruct_simple(record: &RawObjectRecord) -> ReconstructedDdl {
    let identity = record.identity.clone();

    let Some(definition) = record.field(fields::DEFINITION) else {
        // Definition unavailable (catalog gap or privilege-limited view):
        // emit a placeholder the caller can see, flagged incomplete.
        let text = format!(
            "-- Definition unavailable for {} {}\n",
            identity.object_type,
            identity.qualified_name()
        );
        return ReconstructedDdl::new(identity, &text, false);
    };

    let text = match record.field(fields::CLUSTER_BY) {
        Some(keys) if !has_cluster_by(definition) => insert_cluster_by(definition, keys),
        _ => definition.to_string(),
    };

    ReconstructedDdl::new(identity, &text, true)
}

fn has_cluster_by(definition: &str) -> bool {
    definition.to_uppercase().contains("CLUSTER BY")
}

/// Append `CLUSTER BY (<keys>)` before the statement's closing semicolon,
/// or at the end when there is none.
fn insert_cluster_by(definition: &str, keys: &str) -> String {
    let trimmed = definition.trim_end();
    match trimmed.strip_suffix(';') {
        Some(stmt) => format!("{}\nCLUSTER BY ({});\n", stmt.trim_end(), keys),
        None => format!("{trimmed}\nCLUSTER BY ({keys})\n"),
    }
}
