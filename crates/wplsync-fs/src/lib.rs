//! Filesystem layer for wplsync
//!
//! Provides path canonicalization, inventory keys and the few mutating
//! file operations the synchronizer is allowed to perform.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use path::{RelativePath, canonicalize, is_within, paths_independent, resolve};
