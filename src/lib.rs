#![doc(test(attr(deny(warnings))))]

//! Attendance Core tracks per-subject class attendance over an academic term: scheduled and
//! cancelled hours, attendance percentages against a minimum threshold, and how many more
//! hours a student can still afford to miss.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Attendance Core tracing initialized.");
    });
}
