/*!
 * Error Types
 * Top-level error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::memory::MemoryError;
pub use crate::simulation::CommandError;

/// Result type for whole-simulation operations
pub type SimulatorResult<T> = Result<T, SimulatorError>;

/// Failures that abort a simulation run
///
/// Rejected allocations are not in here; they are ordinary outcomes.
#[derive(Error, Debug, Diagnostic)]
pub enum SimulatorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(simulator::io),
        help("Check that the script path exists and stdout is writable.")
    )]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(simulator::json))]
    Json(#[from] serde_json::Error),
}
