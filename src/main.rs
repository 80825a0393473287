/*!
 * fragsim - Main Entry Point
 *
 * Runs a command script against both allocators:
 *
 * ```text
 * fragsim [SCRIPT]      reads stdin when SCRIPT is omitted
 * ```
 *
 * One JSON object per outcome is written to stdout, followed by a final
 * snapshot. Logs go to stderr.
 */

use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;

use fragsim::{init_tracing, Simulation, SimulationConfig, SimulatorError};

fn read_script(path: Option<&PathBuf>) -> Result<String, SimulatorError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Reading script");
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            info!("Reading script from stdin");
            let mut script = String::new();
            io::stdin().read_to_string(&mut script)?;
            Ok(script)
        }
    }
}

fn main() -> miette::Result<()> {
    init_tracing();

    let config = SimulationConfig::load()?;
    let mut simulation = Simulation::new(&config)?;

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let script = read_script(path.as_ref())?;

    let stdout = io::stdout();
    let executed = simulation.run_script(&script, stdout.lock())?;
    info!(executed, "fragsim finished");

    Ok(())
}
