//! # Farm Common
//!
//! Common types shared by the farm simulation crates:
//! - Grid coordinates, dimensions, and facing directions
//! - Load-time error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;
