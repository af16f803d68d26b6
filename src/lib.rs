//! Library crate for reqres-admin.
//!
//! This crate exposes the building blocks of the TUI:
//! - Rule-based validation engine and form-state controller (`validate`, `form`)
//! - Concrete rule sets for the sign-in, sign-up and user forms (`rules`)
//! - HTTP client plus auth and user services (`api`)
//! - Key-value session storage (`store`)
//! - Application state and update loop (`app`)
//! - Error and result types (`error`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `reqres-admin` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod error;
pub mod form;
pub mod rules;
pub mod store;
pub mod ui;
pub mod validate;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
