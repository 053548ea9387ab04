//! Zakaranda: apply one color theme across terminal emulators, editors,
//! prompts and chat apps.
//!
//! A [`theme::Catalog`] of palettes is built once at startup and handed to
//! the [`controller::Controller`], which walks the user through choosing a
//! theme and a set of targets. Each target is an
//! [`integrations::Integration`] that merges the palette into the
//! application's own config through the [`document`] engine (backup first,
//! unrelated keys preserved) and shells out through [`tools`] for anything
//! that is not a file edit.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use zakaranda::config::HostPaths;
//! use zakaranda::integrations::{AdapterEnv, IntegrationRegistry};
//! use zakaranda::theme::Catalog;
//! use zakaranda::tools::SystemRunner;
//!
//! # async fn example() {
//! let paths = HostPaths::detect().unwrap();
//! let registry = IntegrationRegistry::builtin(&AdapterEnv::new(paths, Arc::new(SystemRunner)));
//! let theme = Catalog::builtin().find_theme("Catppuccin Mocha").unwrap();
//! let report = registry.apply_selected(&[0, 1], &theme).await;
//! println!("{} targets, {} failed", report.entries.len(), report.failures());
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod integrations;
#[cfg(test)]
pub mod testsupport;
pub mod theme;
pub mod tools;
pub mod tui;
