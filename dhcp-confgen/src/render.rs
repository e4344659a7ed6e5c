use std::path::Path;

use colored::Colorize;

use crate::subnet::{FilterStats, SubnetConfig};

/// Render the `"subnet4":` fragment for splicing into a server config.
///
/// The output is intentionally not standalone JSON: the label line
/// matches the key expected inside a Kea `Dhcp4` block.
pub fn render_subnet4_fragment(subnets: &[SubnetConfig]) -> Result<String, serde_json::Error> {
    Ok(format!(
        "\"subnet4\":\n{}",
        serde_json::to_string_pretty(subnets)?
    ))
}

/// One-line run summary for stderr.
pub fn render_filter_summary(stats: &FilterStats) -> String {
    format!(
        "subnet4 fragment: {} subnets ({} filtered by role, {} skipped by prefix length)",
        stats.emitted, stats.role_filtered, stats.prefix_skipped
    )
    .cyan()
    .to_string()
}

/// One-line expansion summary for stderr.
pub fn render_expand_summary(rows: usize, output: &Path) -> String {
    format!("wrote {} subnet records to {}", rows, output.display())
        .cyan()
        .to_string()
}
