/*!
 * Simulation Session
 *
 * Drives one fixed-block and one first-fit allocator side by side from a
 * command script, producing serializable outcomes and snapshots.
 */

pub mod command;

pub use command::{parse_script, Command, CommandError, Variant};

use crate::config::{ConfigError, SimulationConfig};
use crate::core::errors::SimulatorResult;
use crate::memory::{
    Allocator, BlockSlot, FirstFitAllocator, FirstFitStats, FixedBlockAllocator,
    FixedBlockStats, FreeRegion, MemoryError, MemoryInfo, MemoryPressure, MemoryResult, Process,
    Segment,
};
use crate::monitoring::span_command;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, info, warn};

/// Variant-specific statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantStats {
    Fixed(FixedBlockStats),
    FirstFit(FirstFitStats),
}

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Allocated {
        variant: Variant,
        process: Process,
    },
    /// Allocation refused; state is unchanged
    Rejected {
        variant: Variant,
        error: MemoryError,
    },
    /// `process` is `None` when the id was not live
    Released {
        variant: Variant,
        process: Option<Process>,
    },
    Reset {
        variant: Variant,
    },
    Stats {
        variant: Variant,
        stats: VariantStats,
    },
    Snapshot(Snapshot),
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Allocated { .. } => "allocated",
            Outcome::Rejected { .. } => "rejected",
            Outcome::Released { .. } => "released",
            Outcome::Reset { .. } => "reset",
            Outcome::Stats { .. } => "stats",
            Outcome::Snapshot(_) => "snapshot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedBlockSnapshot {
    pub processes: Vec<Process>,
    pub blocks: Vec<BlockSlot>,
    pub stats: FixedBlockStats,
    pub pressure: MemoryPressure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstFitSnapshot {
    pub processes: Vec<Process>,
    pub free_regions: Vec<FreeRegion>,
    pub layout: Vec<Segment>,
    pub stats: FirstFitStats,
    pub pressure: MemoryPressure,
}

/// Full view of both allocators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub fixed: FixedBlockSnapshot,
    pub first_fit: FirstFitSnapshot,
}

/// Side-by-side simulation of both allocation disciplines
#[derive(Debug, Clone)]
pub struct Simulation {
    fixed: FixedBlockAllocator,
    first_fit: FirstFitAllocator,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            fixed: FixedBlockAllocator::with_config(&config.fixed)?,
            first_fit: FirstFitAllocator::with_config(&config.first_fit)?,
        })
    }

    pub fn fixed(&self) -> &FixedBlockAllocator {
        &self.fixed
    }

    pub fn first_fit(&self) -> &FirstFitAllocator {
        &self.first_fit
    }

    fn allocator_mut(&mut self, variant: Variant) -> &mut dyn Allocator {
        match variant {
            Variant::Fixed => &mut self.fixed,
            Variant::FirstFit => &mut self.first_fit,
        }
    }

    pub fn execute(&mut self, command: &Command) -> Outcome {
        let variant_name = command.variant().map(|v| v.to_string());
        let span = span_command(command.name(), variant_name.as_deref());
        let _entered = span.enter();
        debug!(?command, "Executing command");

        let outcome = match *command {
            Command::Allocate { variant, size } => {
                match self.allocator_mut(variant).allocate(size) {
                    Ok(process) => Outcome::Allocated { variant, process },
                    Err(error) => Outcome::Rejected { variant, error },
                }
            }
            Command::Deallocate { variant, id } => Outcome::Released {
                variant,
                process: self.allocator_mut(variant).deallocate(id),
            },
            Command::Reset { variant } => {
                self.allocator_mut(variant).reset();
                Outcome::Reset { variant }
            }
            Command::Stats { variant } => Outcome::Stats {
                variant,
                stats: match variant {
                    Variant::Fixed => VariantStats::Fixed(self.fixed.stats()),
                    Variant::FirstFit => VariantStats::FirstFit(self.first_fit.stats()),
                },
            },
            Command::Show => Outcome::Snapshot(self.snapshot()),
        };
        span.record_result(outcome.kind());
        outcome
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            fixed: FixedBlockSnapshot {
                processes: self.fixed.processes().to_vec(),
                blocks: self.fixed.block_map(),
                stats: self.fixed.stats(),
                pressure: self.fixed.pressure(),
            },
            first_fit: FirstFitSnapshot {
                processes: self.first_fit.processes().to_vec(),
                free_regions: self.first_fit.free_regions(),
                layout: self.first_fit.layout(),
                stats: self.first_fit.stats(),
                pressure: self.first_fit.pressure(),
            },
        }
    }

    pub fn check_invariants(&self) -> MemoryResult<()> {
        self.fixed.check_invariants()?;
        self.first_fit.check_invariants()
    }

    /// Parse and run a whole script, writing one JSON line per outcome and
    /// a closing snapshot. Returns the number of commands executed.
    pub fn run_script<W: Write>(&mut self, script: &str, mut out: W) -> SimulatorResult<usize> {
        let commands = parse_script(script)?;
        info!(commands = commands.len(), "Running simulation script");

        let mut rejected = 0usize;
        for (line, command) in &commands {
            let outcome = self.execute(command);
            if let Outcome::Rejected { variant, error } = &outcome {
                rejected += 1;
                warn!(line, %variant, %error, "Command rejected");
            }
            serde_json::to_writer(&mut out, &outcome)?;
            writeln!(out)?;
        }

        self.check_invariants()?;
        serde_json::to_writer(&mut out, &Outcome::Snapshot(self.snapshot()))?;
        writeln!(out)?;
        out.flush()?;

        info!(commands = commands.len(), rejected, "Simulation complete");
        Ok(commands.len())
    }
}
