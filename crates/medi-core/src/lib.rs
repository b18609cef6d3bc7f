//! # medi-core
//!
//! Core types, ID generation, and error types for MediFire.
//!
//! This crate provides the foundational types shared across all MediFire crates:
//! - The `Generation` entity (one prompt plus its resolved outcome)
//! - Status enums with state machine transitions
//! - Generation ID allocation
//! - The patient result payload model and its lenient JSON decoding
//! - The query collaborator contract (`QueryResult`)
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod payload;
pub mod responses;

pub use entities::{Generation, ResponseBody};
pub use enums::{GenerationStatus, SubmitPolicy, ViewKind};
pub use errors::{CoreError, PayloadError, QueryError};
pub use ids::{GenerationId, IdAllocator};
pub use payload::PatientResultPayload;
pub use responses::QueryResult;
