//! Hostel Layout - Floor layout registry and state reconciliation
//!
//! This crate provides the two pieces every floor view is built from:
//!
//! - **LayoutRegistry**: Read-only catalog of floor geometries keyed by
//!   facility and floor number, built once at startup
//! - **Reconciler**: Pure merge of a floor layout with an occupancy snapshot
//!   into render nodes, with vacant defaults for rooms the snapshot omits
//!
//! ## Sharing
//!
//! The registry is immutable after [`RegistryBuilder::build`]. Wrap it in an
//! `Arc` and hand it to every caller that needs it; no locking is required.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod catalog;
pub mod error;
pub mod reconcile;
pub mod registry;
pub mod stats;

// Re-exports
pub use catalog::{CatalogFacility, CatalogFile};
pub use error::{LayoutError, LayoutNotFound, Result};
pub use reconcile::{reconcile, reconcile_with_report, resolve_room, Reconciliation};
pub use registry::{FacilityEntry, LayoutRegistry, RegistryBuilder};
pub use stats::FloorStats;
