use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::games::StatsResponse,
    services::storage_usage::{StorageUsage, UsageLevel},
};

/// Result of a successful import.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub message: String,
    pub stats: StatsResponse,
}

/// Severity of the storage usage.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevelView {
    Normal,
    Warning,
    Critical,
}

impl From<UsageLevel> for UsageLevelView {
    fn from(level: UsageLevel) -> Self {
        match level {
            UsageLevel::Normal => UsageLevelView::Normal,
            UsageLevel::Warning => UsageLevelView::Warning,
            UsageLevel::Critical => UsageLevelView::Critical,
        }
    }
}

/// Storage usage indicator.
#[derive(Debug, Serialize, ToSchema)]
pub struct StorageUsageResponse {
    pub used_bytes: u64,
    pub capacity_bytes: u64,
    /// Rounded percentage of the capacity in use.
    pub percent: u32,
    pub level: UsageLevelView,
    /// Human readable usage, e.g. `1.5 KB`.
    pub used_display: String,
}

impl From<StorageUsage> for StorageUsageResponse {
    fn from(usage: StorageUsage) -> Self {
        Self {
            used_bytes: usage.used_bytes,
            capacity_bytes: usage.capacity_bytes,
            percent: usage.percent.round() as u32,
            level: usage.level.into(),
            used_display: usage.used_display,
        }
    }
}
