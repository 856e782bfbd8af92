//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Trotterized transverse-field Ising chain dynamics",
        style("Spinchain").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  spinchain-sim  State evolution, shot sampling and time series");
    println!("  spinchain-cli  Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
