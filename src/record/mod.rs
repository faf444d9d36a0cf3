//! # Record Module
//!
//! Captured HTTP traffic: the record data model, the store that owns a
//! session's records, and the HAR loader that fills it.

pub mod loader;
pub mod store;

pub use loader::{demo_records, load_capture_dir, load_capture_file};
pub use store::{Anchor, Record, RecordStore, Timings};
