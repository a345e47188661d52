//! Helpers shared by the backend's test binaries: one-time logging setup
//! and assertions over the Problem Details error contract.

pub mod logging;
pub mod problem_details;
