//! Shared test fixtures for the ddlrepo workspace.
//!
//! Dev-dependency only, never published.
//!
//! Provides the in-memory [`session::MockSession`] and catalog record
//! builders for driving the extraction pipeline without a warehouse.

pub mod session;
