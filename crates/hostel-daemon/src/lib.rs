//! Hostel Daemon library
//!
//! This module provides the core components for the hostel occupancy daemon:
//! - REST API handlers (floor views, check-in/out, sheet webhook)
//! - Occupancy storage backends
//! - Webhook signature verification
//! - Server lifecycle management

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod signature;
pub mod storage;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, DaemonResult, StorageError};
pub use server::Server;
pub use storage::{InMemoryStorage, Storage};
