//! SentinelOne account agents export action.
//!
//! Authenticates to a SentinelOne management API with a bearer token,
//! exports the account list via the CSV export endpoint, looks up each
//! account's active-agent count via the JSON accounts endpoint, and writes
//! a dated CSV report that is attached to the hosting SOAR platform's
//! action result.
//!
//! # Modules
//!
//! - [`accounts`] — Account export parsing and per-name detail lookup.
//! - [`action`] — The SOAR platform seam (`SoarAction`) and the pipeline.
//! - [`client`] — Authenticated HTTP wrapper for the management API.
//! - [`error`] — Typed error hierarchy (`S1Error`) for all operations.
//! - [`report`] — Dated CSV report writer.
//!
//! # Quick Start
//!
//! ```ignore
//! use s1_accounts::action::{run_action, ExecutionState, SoarAction};
//!
//! let mut platform = MyPlatform::connect()?; // implements SoarAction
//! let state = run_action(&mut platform).await;
//! assert_eq!(state, ExecutionState::Completed);
//! ```

#![warn(missing_docs)]

pub mod accounts;
pub mod action;
pub mod client;
pub mod error;
pub mod report;
