use std::path::Path;

use focuspet_core::simulate;

use super::load_config;

pub fn run(path: Option<&Path>, script: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let source = std::fs::read_to_string(script)?;
    let report = simulate(&config, &source)?;
    for rejected in &report.rejected {
        tracing::warn!(at_secs = rejected.at_secs, line = %rejected.line, "{}", rejected.error);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
