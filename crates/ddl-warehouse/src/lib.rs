//! Warehouse object extraction and DDL reconstruction
//!
//! Turns raw, platform-returned object metadata into canonical,
//! re-creatable DDL text. Each platform sits behind one capability
//! interface ([`PlatformAdapter`]: `extract` + `reconstruct`); the network
//! session is an opaque collaborator trait driven by the caller.

pub mod adapter;
pub mod error;
pub mod procedure;
pub mod record;
pub mod session;
pub mod snowflake;

pub use adapter::{ExtractBatch, PlatformAdapter, SkippedObject, adapter_for, extract_all};
pub use error::{Error, Result, SessionError};
pub use record::{
    ObjectIdentity, ObjectType, Platform, RawObjectRecord, ReconstructedDdl, Scope, fields,
};
pub use session::{Row, WarehouseSession};
pub use snowflake::SnowflakeAdapter;
