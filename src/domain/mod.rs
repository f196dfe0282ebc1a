//! Domain layer: identifiers, connection profiles, and backup records.
//!
//! Everything here is storage-agnostic. Validation turns raw client input
//! into drafts and patches; entities carry the lifecycle rules (creation,
//! partial update, soft-delete, artifact naming).

pub mod backup;
pub mod clock;
pub mod connection;
pub mod ids;
pub mod validation;

pub use backup::{Backup, BackupEntry, NewBackup};
pub use connection::{
    Connection, ConnectionChanges, ConnectionDraft, ConnectionPatch, NewConnection,
};
pub use ids::{BackupId, ConnectionId};
pub use validation::FieldIssue;
