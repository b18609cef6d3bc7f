//! Entity structs for MediFire domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema export (`medi schema`).

mod generation;

pub use generation::{Generation, ResponseBody};
