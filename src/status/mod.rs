//! Status module.
//!
//! Reads the external health checker's state file and combines it with the
//! host registry into the dashboard status view.

mod aggregator;
mod environment;
mod reader;

pub use aggregator::*;
pub use environment::*;
pub use reader::*;
