//! Appwatch Core
//!
//! Core types shared by the appwatch client, harness and CLI.
//!
//! This crate contains:
//! - Domain types: Apps running in the cloud, their log entries, completion markers
//! - DTOs: Request bodies sent to the cloud control plane

pub mod domain;
pub mod dto;
