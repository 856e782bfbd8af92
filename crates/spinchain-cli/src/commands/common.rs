//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use spinchain_sim::{MagnetizationVector, SimulationConfig, TrotterOrder};

use crate::RunArgs;

/// Load a simulation configuration from a YAML file.
///
/// Missing keys fall back to [`SimulationConfig::default`].
pub fn load_config(path: &str) -> Result<SimulationConfig> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    serde_yaml_ng::from_str(&source).with_context(|| format!("Invalid configuration in {path}"))
}

/// Build the run configuration: file (or defaults) first, then flags.
pub fn resolve_config(args: &RunArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(n) = args.sites {
        config.num_sites = n;
    }
    if let Some(j) = args.coupling {
        config.coupling_j = j;
    }
    if let Some(h) = args.field {
        config.field_h = h;
    }
    if let Some(t) = args.time {
        config.total_time = t;
    }
    if let Some(fps) = args.fps {
        config.frames_per_unit_time = Some(fps);
        config.total_frames = None;
    }
    if let Some(frames) = args.frames {
        config.total_frames = Some(frames);
    }
    if let Some(shots) = args.shots {
        config.shots_per_frame = shots;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }
    if args.second_order {
        config.trotter_order = TrotterOrder::Second;
    }

    config.validate()?;
    Ok(config)
}

/// Render the chain as one glyph per site, coloured by magnetization
/// (blue towards -1, red towards +1).
pub fn render_chain(m: &MagnetizationVector) -> String {
    m.as_slice()
        .iter()
        .map(|&v| {
            let glyph = style("●");
            let glyph = if v <= -0.33 {
                glyph.blue()
            } else if v >= 0.33 {
                glyph.red()
            } else {
                glyph.white()
            };
            glyph.to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print per-site values under the rendered chain.
pub fn print_magnetization(m: &MagnetizationVector) {
    println!("  {}", render_chain(m));
    for (site, v) in m.as_slice().iter().enumerate() {
        let bar_len = ((v.abs() * 20.0).round()) as usize;
        let bar = "█".repeat(bar_len);
        let bar = if *v < 0.0 {
            style(bar).blue()
        } else {
            style(bar).red()
        };
        println!("  site {:>2}: {:>+7.4} {}", style(site).cyan(), v, bar);
    }
}
