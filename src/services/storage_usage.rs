use tracing::warn;

use crate::dao::storage::{KeyValueStore, StorageResult};

/// Usage at which the indicator turns to [`UsageLevel::Warning`].
pub const WARNING_PERCENT: f64 = 75.0;
/// Usage at which the indicator turns to [`UsageLevel::Critical`].
pub const CRITICAL_PERCENT: f64 = 90.0;
/// Usage at which a warning is logged suggesting an export.
pub const ALERT_PERCENT: f64 = 95.0;

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Severity of the storage usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    /// Plenty of room left.
    Normal,
    /// Approaching the capacity.
    Warning,
    /// Nearly full; writes may start failing.
    Critical,
}

/// Snapshot of how much of the storage budget is used.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageUsage {
    /// Estimated bytes used by all keys.
    pub used_bytes: u64,
    /// Budget the usage is measured against.
    pub capacity_bytes: u64,
    /// Used share of the budget, uncapped.
    pub percent: f64,
    /// Severity derived from `percent`.
    pub level: UsageLevel,
    /// Human readable `used_bytes`.
    pub used_display: String,
}

/// Measure the store usage. Sizes are counted as two bytes per character of key and value,
/// matching UTF-16 browser storage accounting.
pub fn measure<S: KeyValueStore + ?Sized>(
    store: &S,
    capacity_bytes: u64,
) -> StorageResult<StorageUsage> {
    let used_bytes: u64 = store
        .entries()?
        .iter()
        .map(|(key, value_len)| (key.len() as u64 + *value_len as u64) * 2)
        .sum();
    let percent = used_bytes as f64 / capacity_bytes.max(1) as f64 * 100.0;

    let level = if percent >= CRITICAL_PERCENT {
        UsageLevel::Critical
    } else if percent >= WARNING_PERCENT {
        UsageLevel::Warning
    } else {
        UsageLevel::Normal
    };

    if percent >= ALERT_PERCENT {
        warn!(
            percent = percent.round(),
            used = %format_bytes(used_bytes),
            capacity = %format_bytes(capacity_bytes),
            "storage usage is high; consider exporting your data"
        );
    }

    Ok(StorageUsage {
        used_bytes,
        capacity_bytes,
        percent,
        level,
        used_display: format_bytes(used_bytes),
    })
}

/// Format a byte count with one decimal at most (`0.0 B`, `512 B`, `1.5 KB`, `2 MB`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0.0 B".to_owned();
    }
    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }
    let scaled = bytes as f64 / 1024u64.pow(exponent as u32) as f64;
    let rounded = (scaled * 10.0).round() / 10.0;
    format!("{rounded} {}", UNITS[exponent])
}
