//! NeuroDrive: Hierarchical Drive-Item Model
//!
//! Flat-list-plus-parent-pointer model behind the NeuroZsis materials
//! catalog: child listing, breadcrumb resolution, validated insert, and
//! atomic cascading delete, with workspace-keyed snapshot persistence and a
//! bookmark index reconciled against deletions.

pub mod bookmarks;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
