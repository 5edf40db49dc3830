//! Core domain types
//!
//! These types describe what the cloud control plane reports about a launched
//! app and what the harness looks for in its output.

pub mod app;
pub mod log;
pub mod marker;
