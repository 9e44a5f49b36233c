//! In-memory warehouse session for pipeline tests.

use std::collections::BTreeMap;

use ddl_warehouse::{
    ObjectIdentity, ObjectType, Platform, RawObjectRecord, Row, Scope, SessionError,
    WarehouseSession, fields,
};

/// Scriptable in-memory session: objects live in a map, and individual
/// objects can be marked as vanished or permission-denied to exercise the
/// extractor's skip paths.
#[derive(Debug, Default)]
pub struct MockSession {
    records: BTreeMap<ObjectIdentity, RawObjectRecord>,
    vanished: Vec<ObjectIdentity>,
    denied: Vec<ObjectIdentity>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record; it will be listed and fetchable.
    pub fn with_record(mut self, record: RawObjectRecord) -> Self {
        self.records.insert(record.identity.clone(), record);
        self
    }

    /// The object is listed but its detail fetch reports it gone.
    pub fn with_vanishing(mut self, record: RawObjectRecord) -> Self {
        self.vanished.push(record.identity.clone());
        self.records.insert(record.identity.clone(), record);
        self
    }

    /// The object is listed but its detail fetch is permission-denied.
    pub fn with_denied(mut self, record: RawObjectRecord) -> Self {
        self.denied.push(record.identity.clone());
        self.records.insert(record.identity.clone(), record);
        self
    }

    /// Remove an object, simulating a drop between two sync runs.
    pub fn remove(&mut self, identity: &ObjectIdentity) {
        self.records.remove(identity);
    }

    /// Replace a record's field, simulating an in-place redefinition.
    pub fn update_field(&mut self, identity: &ObjectIdentity, key: &str, value: &str) {
        if let Some(record) = self.records.get_mut(identity) {
            record.set_field(key, value);
        }
    }
}

impl WarehouseSession for MockSession {
    fn run_query(&self, _sql: &str) -> Result<Vec<Row>, SessionError> {
        Ok(Vec::new())
    }

    fn list_objects(
        &self,
        object_type: ObjectType,
        scope: &Scope,
    ) -> Result<Vec<ObjectIdentity>, SessionError> {
        Ok(self
            .records
            .keys()
            .filter(|id| {
                id.object_type == object_type
                    && id.database == scope.database
                    && id.schema == scope.schema
            })
            .cloned()
            .collect())
    }

    fn get_definition(&self, identity: &ObjectIdentity) -> Result<RawObjectRecord, SessionError> {
        if self.vanished.contains(identity) {
            return Err(SessionError::ObjectNotFound {
                identity: identity.clone(),
            });
        }
        if self.denied.contains(identity) {
            return Err(SessionError::PermissionDenied {
                identity: identity.clone(),
            });
        }
        self.records
            .get(identity)
            .cloned()
            .ok_or_else(|| SessionError::ObjectNotFound {
                identity: identity.clone(),
            })
    }
}

/// Identity in the given scope.
pub fn identity(scope: &Scope, object_type: ObjectType, name: &str) -> ObjectIdentity {
    ObjectIdentity::new(Platform::Snowflake, scope, object_type, name)
}

/// Simple-object record carrying a `definition` field.
pub fn simple_record(
    scope: &Scope,
    object_type: ObjectType,
    name: &str,
    definition: &str,
) -> RawObjectRecord {
    RawObjectRecord::new(identity(scope, object_type, name))
        .with_field(fields::DEFINITION, definition)
}

/// SQL stored-procedure record with a full structured signature.
pub fn sql_procedure_record(
    scope: &Scope,
    name: &str,
    signature: &str,
    returns: &str,
    body: &str,
) -> RawObjectRecord {
    RawObjectRecord::new(identity(scope, ObjectType::StoredProcedure, name))
        .with_field(fields::ARGUMENT_SIGNATURE, signature)
        .with_field(fields::RETURNS, returns)
        .with_field(fields::LANGUAGE, "SQL")
        .with_field(fields::BODY, body)
}
