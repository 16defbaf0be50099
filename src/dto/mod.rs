use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Backup import and storage usage payloads.
pub mod backup;
/// Drag gesture payloads.
pub mod drag;
/// List and game payloads.
pub mod games;
/// Shared validators for request payloads.
pub mod validation;

fn format_timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
