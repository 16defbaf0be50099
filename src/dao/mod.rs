/// File-per-key backend used by the server binary.
pub mod file_store;
/// In-process backend used by tests and embedders.
pub mod memory;
/// Versioned save/load, migration, export and import.
pub mod persistence;
/// Key-value abstraction shared by every backend.
pub mod storage;
