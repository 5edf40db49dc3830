//! Scheduler layer for the harness
//!
//! Decides when to fetch logs again and when to give up. The retry policy
//! bounds every wait; the completion poller drives a log source against it.

pub mod poller;
pub mod retry;

pub use poller::{CompletionPoller, PollError, PollOutcome, PollState, wait_for_marker};
pub use retry::RetryPolicy;
