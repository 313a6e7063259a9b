//! Display model implementations for table and JSON output
//!
//! Display models transform content types into CLI-friendly formats
//! with appropriate column names and serialization.

mod calendar;
mod common;
mod leela;
mod news;
mod temple;

pub use calendar::EventDisplay;
pub use leela::LeelaDisplay;
pub use news::NewsDisplay;
pub use temple::TempleDisplay;
