//! Binary-local application orchestration helpers.
//!
//! The main binary keeps wiring logic in `main.rs`, while this module hosts
//! logging setup and startup/shutdown helpers to keep entrypoint code small.

pub(crate) mod logging;
pub(crate) mod startup;
