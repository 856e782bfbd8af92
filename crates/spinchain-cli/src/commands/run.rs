//! Run command implementation.

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use spinchain_sim::{
    Frame, MagnetizationVector, SimulationConfig, SimulationDriver, TimeSeriesRecorder,
    exact_magnetization, recorder::MAX_RESERVED_FRAMES,
};

use super::common::{print_magnetization, resolve_config};
use crate::RunArgs;

/// One frame as written to the JSON report.
#[derive(Debug, Serialize)]
struct FrameRecord {
    index: usize,
    time: f64,
    magnetization: MagnetizationVector,
    #[serde(skip_serializing_if = "Option::is_none")]
    exact_site0: Option<f64>,
}

/// Everything a plotting tool needs to redraw the run.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    config: &'a SimulationConfig,
    dt: f64,
    total_frames: usize,
    frames: Vec<FrameRecord>,
    series: &'a TimeSeriesRecorder,
}

/// Execute the run command.
pub fn execute(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let mut driver = SimulationDriver::new(&config)?;

    println!(
        "{} Simulating {} sites (J = {}, h = {}) for t = {} in {} frames ({} shots/frame)",
        style("→").cyan().bold(),
        style(config.num_sites).green(),
        config.coupling_j,
        config.field_h,
        config.total_time,
        style(driver.total_frames()).yellow(),
        config.shots_per_frame
    );
    println!(
        "  dt = {:.4}, {:?}-order Trotter, seed {}",
        driver.dt(),
        config.trotter_order,
        config
            .random_seed
            .map_or_else(|| "from entropy".to_string(), |s| s.to_string())
    );

    let progress = ProgressBar::new(driver.total_frames() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos:>4}/{len} {msg}")
            .context("Invalid progress bar template")?,
    );

    let mut records = Vec::with_capacity(driver.total_frames().min(MAX_RESERVED_FRAMES));
    while !driver.is_finished() {
        let Frame {
            index,
            time,
            magnetization,
            ..
        } = driver.next_frame()?;
        let exact_site0 = if args.exact {
            Some(exact_magnetization(driver.state())?[0])
        } else {
            None
        };

        let m0 = magnetization[0];
        progress.set_message(match exact_site0 {
            Some(e) => format!("t = {time:>6.2}  ⟨Z₀⟩ ≈ {m0:+.3} (exact {e:+.3})"),
            None => format!("t = {time:>6.2}  ⟨Z₀⟩ ≈ {m0:+.3}"),
        });
        progress.inc(1);
        records.push(FrameRecord {
            index,
            time,
            magnetization,
            exact_site0,
        });
    }
    progress.finish_and_clear();

    let series = driver.recorder();
    if let Some((time, last)) = series.latest() {
        println!(
            "\n{} Finished at t = {:.2} after {} frames",
            style("✓").green().bold(),
            time,
            series.len()
        );
        print_magnetization(last);
    }

    if let Some(path) = &args.output {
        let report = RunReport {
            config: &config,
            dt: driver.dt(),
            total_frames: driver.total_frames(),
            frames: records,
            series,
        };
        let file = File::create(path).with_context(|| format!("Failed to create {path}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .with_context(|| format!("Failed to write report to {path}"))?;
        debug!(path = %path, frames = report.frames.len(), "wrote run report");
        println!("  Report written to {}", style(path).green());
    }

    Ok(())
}
