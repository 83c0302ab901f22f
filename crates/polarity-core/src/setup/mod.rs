//! World Setup
//!
//! Party creation and population spawning.

pub mod parties;
pub mod population;

pub use parties::*;
pub use population::*;
