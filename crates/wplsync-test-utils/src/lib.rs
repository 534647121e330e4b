//! Shared test utilities for the wplsync workspace.
//!
//! This crate provides folder fixtures for the crate test suites. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for source and target folders
//! - [`wpl`]: WPL playlist documents

pub mod tree;
pub mod wpl;

pub use tree::TestTree;
pub use wpl::wpl_document;
