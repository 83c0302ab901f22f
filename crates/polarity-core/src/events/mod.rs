//! Event Log
//!
//! Append-only narrative log of notable occurrences.

pub mod log;

pub use log::EventLog;
