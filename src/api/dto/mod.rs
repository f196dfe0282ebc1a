//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies keep every field optional so validation can report all
//! missing fields at once; timestamps serialize as ISO-8601 strings.

pub mod backup_dto;
pub mod common_dto;
pub mod connection_dto;

pub use backup_dto::*;
pub use common_dto::*;
pub use connection_dto::*;
