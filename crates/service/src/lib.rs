// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cst-service: Request-scoped pipeline transactions
//!
//! Every request loads the item, checks access, runs the stage engine and
//! saves the result against the loaded version, retrying on conflict.
//! Results are returned as serializable view models with display names
//! resolved through the directory.

pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod views;

pub use config::{Config, ConfigError};
pub use error::ServiceError;
pub use logging::setup_logging;
pub use service::{open, DefaultService, PipelineService, ServiceDeps};
pub use views::{BackBurnerView, BoardView, HistoryView, ItemDetailView, ItemView, StageColumnView};
