//! # UI Module
//!
//! This module provides the terminal user interface components for reqscope.
//!
//! ## Components
//!
//! - [`App`] - the shell hosting the panels and routing keys
//! - [`controller::PanelController`] - the requests panel state machine
//! - [`list_view::ListView`] - the record grid and its event queue
//! - [`detail_view::DetailView`] - per-record inspector
//! - [`overview::OverviewPanel`] - capture totals and failure list
//! - [`mod@render`] - rendering functions for drawing the TUI
//!
//! ## Layout
//!
//! The requests panel has two shapes. Grid mode gives every record the
//! full width; opening a record splits the panel:
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               Header / panel tabs               │
//! ├────────────────┬────────────────────────────────┤
//! │                │                                │
//! │  Brief grid    │        Detail pane             │
//! │  (method,      │  (summary, headers, response,  │
//! │   status, URL) │   timing tabs)                 │
//! │                │                                │
//! ├────────────────┴────────────────────────────────┤
//! │            Footer / hints / search status        │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - Two-mode requests panel with always-fresh detail views
//! - Live URL search with match count in the footer
//! - Row filtering, density toggle, and a context menu with reveal
//! - Overview panel that links failures back into the grid

pub mod app;
pub mod clipboard;
pub mod config;
pub mod context_menu;
pub mod controller;
pub mod detail_view;
pub mod list_view;
pub mod overview;
pub mod panel;
pub mod render;
pub mod theme;

pub use app::App;
pub use render::render;
