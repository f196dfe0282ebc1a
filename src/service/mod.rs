//! Service layer: business logic orchestration.
//!
//! [`ConnectionRegistry`] owns the connection lifecycle; [`BackupLedger`]
//! appends backup records and reads connections only to validate and name
//! them. Both receive their store handle explicitly.

pub mod backup_ledger;
pub mod connection_registry;

pub use backup_ledger::BackupLedger;
pub use connection_registry::ConnectionRegistry;
