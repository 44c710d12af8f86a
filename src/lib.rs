//! Library crate for user-dashboard.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, loaders, overlay, theme and the update loop (`app`)
//! - Command-line configuration and file locations (`config`)
//! - Error and result types (`error`)
//! - Tracing setup (`logging`)
//! - The filter/sort/paginate engine (`search`)
//! - Users document retrieval (`source`)
//! - Status breakdown for the chart (`stats`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-dashboard` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod search;
pub mod source;
pub mod stats;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
