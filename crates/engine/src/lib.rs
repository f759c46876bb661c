//! Request orchestration for the replikit test server
//!
//! This crate ties the value-tree engine to the stores:
//! - TestDatabase: update, snapshot and verify flows
//! - DatabaseUpdateItem: wire form of one document change
//! - VerifyResponse: verification outcome
//! - ServerConfig: `replikit.toml` configuration
//! - Logging bootstrap for binaries

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod update;
pub mod verify;

pub use config::{ServerConfig, CONFIG_FILE_NAME, DEFAULT_COLLECTION};
pub use database::TestDatabase;
pub use error::{EngineError, Result};
pub use logging::init_logging;
pub use update::{DatabaseUpdateItem, UpdateType};
pub use verify::VerifyResponse;

pub use replikit_core::{KeyPath, Value, ValueBridge, WireDelta};
pub use replikit_store::{DocumentKey, SnapshotId};
