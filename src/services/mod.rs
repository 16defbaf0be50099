/// OpenAPI documentation generation.
pub mod documentation;
/// Async helpers mapping tracker operations to API payloads.
pub mod game_service;
/// Storage usage measurement and formatting.
pub mod storage_usage;
/// Tracker facade owning the lists, persistence and drag controller.
pub mod tracker_service;
