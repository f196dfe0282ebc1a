//! # dbvault
//!
//! REST registry for database connection profiles and the backups taken
//! against them.
//!
//! The service tracks named connection profiles (with soft-delete and
//! name reservation) and an append-only ledger of backup records. It
//! never connects to the target databases and never runs a dump; it only
//! keeps the metadata consistent.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ConnectionRegistry / BackupLedger (service/)
//!     ├── Connection / Backup entities (domain/)
//!     │
//!     └── RegistryStore (persistence/)
//!           ├── InMemoryStore
//!           └── PostgresStore
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
