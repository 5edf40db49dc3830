//! Appwatch Harness
//!
//! Runs apps in the cloud and waits for markers in their logs.
//!
//! Architecture:
//! - Configuration: control plane location and wait bounds, from environment or defaults
//! - Sources: the [`LogSource`] trait the poller reads from
//! - Scheduler: bounded retry policy and the completion poller
//! - Launchers: the [`AppLauncher`] trait, the scoped [`with_app`] helper and
//!   the cloud-backed launcher
//!
//! A typical test launches a bundle with [`run_app_in_cloud`], then runs a
//! [`CompletionPoller`] against the yielded [`AppHandle`] until the app logs
//! "Application End!". The app is released however the test ends.

pub mod config;
pub mod launcher;
pub mod scheduler;
pub mod source;

pub use config::HarnessConfig;
pub use launcher::cloud::run_app_in_cloud;
pub use launcher::{AppHandle, AppLauncher, CloudLauncher, CloudLogSource, LaunchError, with_app};
pub use scheduler::{
    CompletionPoller, PollError, PollOutcome, PollState, RetryPolicy, wait_for_marker,
};
pub use source::LogSource;
