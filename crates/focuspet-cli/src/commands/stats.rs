use std::path::Path;

use focuspet_core::StatsSummary;

use super::load_config;

pub fn run(path: Option<&Path>, sessions: u64) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let stats = StatsSummary::from_counter(
        sessions,
        config.session.focus_duration_secs,
        config.stats.average_window_days,
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
