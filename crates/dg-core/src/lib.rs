#![deny(missing_docs)]
#![doc = "Core error taxonomy and index-position types for the diffgeom tensor engine."]

pub mod errors;
pub mod position;
pub mod provenance;

pub use errors::{DgError, ErrorInfo};
pub use position::{IndexPosition, Signature};
pub use provenance::SchemaVersion;
