//! Utility functions shared across the crate.

use chrono::NaiveDate;

/// Format a byte count as a human-readable string.
///
/// 1024-base with units Bytes/KB/MB/GB, rounded to two decimal places
/// with trailing zeros dropped: `0` -> "0 Bytes", `1536` -> "1.5 KB",
/// `1048576` -> "1 MB".
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    // Trim trailing zeros: 1.50 -> 1.5, 1.00 -> 1
    let mut text = format!("{rounded:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }

    format!("{} {}", text, UNITS[exponent])
}

/// Build the packet file name for a project and build date.
///
/// Convention: `MAXTERRA_<project name, whitespace runs -> '_'>_<YYYY-MM-DD>.pdf`.
pub fn packet_file_name(project_name: &str, date: NaiveDate) -> String {
    let underscored: String = project_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("MAXTERRA_{}_{}.pdf", underscored, date.format("%Y-%m-%d"))
}
