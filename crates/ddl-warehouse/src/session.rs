//! Warehouse session collaborator
//!
//! The session is an opaque collaborator: it runs metadata queries, lists
//! object identities, and fetches structured per-object records. Connection
//! lifecycle, retries, and auth are outside this crate; tests drive the
//! pipeline through in-memory implementations.

use std::collections::BTreeMap;

use crate::error::SessionError;
use crate::record::{ObjectIdentity, ObjectType, RawObjectRecord, Scope};

/// One row of a metadata query result, keyed by column name.
pub type Row = BTreeMap<String, String>;

/// Read-only metadata access to one warehouse connection.
pub trait WarehouseSession {
    /// Run an arbitrary metadata query.
    fn run_query(&self, sql: &str) -> Result<Vec<Row>, SessionError>;

    /// List identities of every object of `object_type` within `scope`.
    ///
    /// An empty listing is a valid result, not an error.
    fn list_objects(
        &self,
        object_type: ObjectType,
        scope: &Scope,
    ) -> Result<Vec<ObjectIdentity>, SessionError>;

    /// Fetch the structured catalog record for one object.
    ///
    /// May fail per object (vanished since listing, insufficient privilege);
    /// such failures are recoverable and must not abort the batch.
    fn get_definition(&self, identity: &ObjectIdentity) -> Result<RawObjectRecord, SessionError>;
}
