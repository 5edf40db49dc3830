//! Data Transfer Objects for the cloud control plane API
//!
//! Request bodies and query parameters sent by the client. Responses reuse
//! the domain types directly.

pub mod app;
pub mod log;
