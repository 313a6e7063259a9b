//! Display models for CLI output
//!
//! Flattened, table-friendly views of the content types.

pub mod display;

pub use display::{EventDisplay, LeelaDisplay, NewsDisplay, TempleDisplay};
