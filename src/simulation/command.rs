/*!
 * Simulation Commands
 *
 * Line-oriented command language:
 *
 * ```text
 * <variant> alloc <size>      variant = fixed | first-fit
 * <variant> free <process-id>
 * <variant> reset
 * <variant> stats
 * show
 * ```
 *
 * `#` starts a comment; blank lines are ignored.
 */

use crate::core::id::ProcessId;
use crate::core::types::SizeRequest;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Command parse errors, tagged with their 1-based line number
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum CommandError {
    #[error("line {line}: unknown allocator variant {found:?}")]
    #[diagnostic(
        code(command::unknown_variant),
        help("Use `fixed` (or `internal`) or `first-fit` (or `external`).")
    )]
    UnknownVariant { line: usize, found: String },

    #[error("line {line}: unknown command {found:?}")]
    #[diagnostic(
        code(command::unknown_verb),
        help("Commands are alloc, free, reset, stats, and show.")
    )]
    UnknownVerb { line: usize, found: String },

    #[error("line {line}: `{verb}` needs {expected}")]
    #[diagnostic(code(command::missing_argument))]
    MissingArgument {
        line: usize,
        verb: &'static str,
        expected: &'static str,
    },

    #[error("line {line}: {value:?} is not {expected}")]
    #[diagnostic(code(command::invalid_argument))]
    InvalidArgument {
        line: usize,
        value: String,
        expected: &'static str,
    },

    #[error("line {line}: unexpected trailing input {value:?}")]
    #[diagnostic(code(command::trailing_input))]
    TrailingInput { line: usize, value: String },
}

/// Which simulated allocator a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Fixed-size blocks (internal fragmentation)
    Fixed,
    /// Variable-size first-fit (external fragmentation)
    FirstFit,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Fixed => write!(f, "fixed"),
            Variant::FirstFit => write!(f, "first-fit"),
        }
    }
}

impl FromStr for Variant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" | "internal" => Ok(Variant::Fixed),
            "first-fit" | "firstfit" | "external" => Ok(Variant::FirstFit),
            _ => Err(()),
        }
    }
}

/// A single simulation command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Allocate { variant: Variant, size: SizeRequest },
    Deallocate { variant: Variant, id: ProcessId },
    Reset { variant: Variant },
    Stats { variant: Variant },
    Show,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Allocate { .. } => "allocate",
            Command::Deallocate { .. } => "deallocate",
            Command::Reset { .. } => "reset",
            Command::Stats { .. } => "stats",
            Command::Show => "show",
        }
    }

    /// Target allocator, `None` for commands spanning both
    pub fn variant(&self) -> Option<Variant> {
        match self {
            Command::Allocate { variant, .. }
            | Command::Deallocate { variant, .. }
            | Command::Reset { variant }
            | Command::Stats { variant } => Some(*variant),
            Command::Show => None,
        }
    }

    /// Parse one line; `Ok(None)` for blank lines and comments
    pub fn parse_line(line: usize, text: &str) -> Result<Option<Command>, CommandError> {
        let text = text.split('#').next().unwrap_or_default().trim();
        let mut words = text.split_whitespace();

        let Some(first) = words.next() else {
            return Ok(None);
        };

        let command = if first.eq_ignore_ascii_case("show") {
            Command::Show
        } else {
            let variant = first.parse::<Variant>().map_err(|_| CommandError::UnknownVariant {
                line,
                found: first.to_string(),
            })?;
            let verb = words.next().ok_or(CommandError::MissingArgument {
                line,
                verb: "variant",
                expected: "a command (alloc, free, reset, stats)",
            })?;

            match verb.to_ascii_lowercase().as_str() {
                "alloc" | "allocate" => {
                    let raw = words.next().ok_or(CommandError::MissingArgument {
                        line,
                        verb: "alloc",
                        expected: "a size",
                    })?;
                    let size = raw.parse::<SizeRequest>().map_err(|_| {
                        CommandError::InvalidArgument {
                            line,
                            value: raw.to_string(),
                            expected: "an integer size",
                        }
                    })?;
                    Command::Allocate { variant, size }
                }
                "free" | "dealloc" | "deallocate" => {
                    let raw = words.next().ok_or(CommandError::MissingArgument {
                        line,
                        verb: "free",
                        expected: "a process id",
                    })?;
                    let id = raw.parse::<ProcessId>().map_err(|_| {
                        CommandError::InvalidArgument {
                            line,
                            value: raw.to_string(),
                            expected: "a process id",
                        }
                    })?;
                    Command::Deallocate { variant, id }
                }
                "reset" => Command::Reset { variant },
                "stats" => Command::Stats { variant },
                other => {
                    return Err(CommandError::UnknownVerb {
                        line,
                        found: other.to_string(),
                    })
                }
            }
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::TrailingInput {
                line,
                value: extra.to_string(),
            });
        }
        Ok(Some(command))
    }
}

/// Parse a whole script, keeping the line number of every command
pub fn parse_script(script: &str) -> Result<Vec<(usize, Command)>, CommandError> {
    let mut commands = Vec::new();
    for (index, text) in script.lines().enumerate() {
        if let Some(command) = Command::parse_line(index + 1, text)? {
            commands.push((index + 1, command));
        }
    }
    Ok(commands)
}
