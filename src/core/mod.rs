/*!
 * Core Module
 * Fundamental simulator types, identifiers, limits, and errors
 */

pub mod errors;
pub mod id;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use id::{
    IdGenerator, NameCounter, ProcessId, ProcessIdGenerator, RegionId, RegionIdGenerator,
};
pub use types::*;
