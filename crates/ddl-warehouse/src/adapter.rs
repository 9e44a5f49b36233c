//! Platform adapter capability interface
//!
//! Each warehouse platform implements one small trait (`extract` +
//! `reconstruct`); adding a platform means implementing this interface, not
//! subclassing a hierarchy.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::record::{
    ObjectIdentity, ObjectType, Platform, RawObjectRecord, ReconstructedDdl, Scope,
};
use crate::session::WarehouseSession;
use crate::snowflake::SnowflakeAdapter;

/// One object skipped during extraction, with the reason recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedObject {
    pub identity: ObjectIdentity,
    pub reason: String,
}

/// Result of extracting one object type within one scope.
#[derive(Debug, Default)]
pub struct ExtractBatch {
    pub records: Vec<RawObjectRecord>,
    pub skipped: Vec<SkippedObject>,
}

impl ExtractBatch {
    /// Merge another batch into this one.
    pub fn extend(&mut self, other: ExtractBatch) {
        self.records.extend(other.records);
        self.skipped.extend(other.skipped);
    }
}

/// Capability interface one warehouse platform implements.
pub trait PlatformAdapter {
    fn platform(&self) -> Platform;

    /// Extract normalized records for every object of `object_type` in
    /// `scope`.
    ///
    /// Per-object failures (vanished object, insufficient privilege) are
    /// recorded as skips; only a failed listing aborts the batch.
    fn extract(
        &self,
        session: &dyn WarehouseSession,
        object_type: ObjectType,
        scope: &Scope,
    ) -> Result<ExtractBatch>;

    /// Produce canonical DDL for one record. Pure and deterministic.
    fn reconstruct(&self, record: &RawObjectRecord) -> Result<ReconstructedDdl>;
}

/// The adapter for a platform.
pub fn adapter_for(platform: Platform) -> Box<dyn PlatformAdapter> {
    match platform {
        Platform::Snowflake => Box::new(SnowflakeAdapter),
    }
}

/// Extract every supported object type in `scope`, in a fixed order.
///
/// The caller gets a fully materialized batch; planning must never start
/// against a partially populated inventory.
pub fn extract_all(
    adapter: &dyn PlatformAdapter,
    session: &dyn WarehouseSession,
    scope: &Scope,
) -> Result<ExtractBatch> {
    let mut all = ExtractBatch::default();
    for object_type in ObjectType::ALL {
        let batch = adapter.extract(session, object_type, scope)?;
        tracing::debug!(
            %object_type,
            records = batch.records.len(),
            skipped = batch.skipped.len(),
            "extracted object type"
        );
        all.extend(batch);
    }
    Ok(all)
}

/// Shared per-object fetch loop used by adapter implementations.
///
/// Classifies session failures: a vanished object is a quiet skip, a
/// privilege problem is a skip with a warning, and any other per-object
/// query failure is a skip as well. The batch always continues.
pub(crate) fn fetch_listed(
    session: &dyn WarehouseSession,
    identities: Vec<ObjectIdentity>,
) -> ExtractBatch {
    let mut batch = ExtractBatch::default();

    for identity in identities {
        match session.get_definition(&identity) {
            Ok(record) => batch.records.push(record),
            Err(SessionError::ObjectNotFound { identity }) => {
                tracing::debug!(%identity, "object vanished between listing and fetch");
                batch.skipped.push(SkippedObject {
                    identity,
                    reason: "object no longer exists".to_string(),
                });
            }
            Err(SessionError::PermissionDenied { identity }) => {
                tracing::warn!(%identity, "insufficient privilege; skipping object");
                batch.skipped.push(SkippedObject {
                    identity,
                    reason: "insufficient privilege".to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(%identity, error = %e, "failed to fetch definition; skipping");
                batch.skipped.push(SkippedObject {
                    identity,
                    reason: e.to_string(),
                });
            }
        }
    }

    batch
}
