//! Rasterization of the cropped photo and the print sheet
//!
//! Both renderers are pure functions of their inputs: the same inputs always
//! produce the same pixels and the same encoded bytes.

mod crop;
mod sheet;

pub use crop::*;
pub use sheet::*;
