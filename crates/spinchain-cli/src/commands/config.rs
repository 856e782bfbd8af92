//! Config command implementation.

use anyhow::{Context, Result};

use spinchain_sim::SimulationConfig;

/// Print the default configuration as YAML, ready to be edited and passed
/// back with `spinchain run --config`.
pub fn execute() -> Result<()> {
    let yaml = serde_yaml_ng::to_string(&SimulationConfig::default())
        .context("Failed to serialize default configuration")?;
    print!("{yaml}");
    Ok(())
}
