//! reqscope - a TUI for inspecting captured HTTP traffic
//!
//! This library provides the core functionality for loading HAR captures
//! and presenting them in a two-mode requests panel: a full-width grid of
//! every record, and a brief grid next to a per-record detail view.

pub mod record;
pub mod ui;
