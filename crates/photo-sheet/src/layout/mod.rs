//! Layout calculation modules
//!
//! This module handles all the geometric calculations:
//! - Coordinate mapping (cover fit, zoom, pan between preview and output)
//! - Grid layout (how many copies fit on a sheet and where they go)

mod grid;
pub mod mapper;
mod types;

pub use grid::*;
pub use mapper::*;
pub use types::*;
