//! Core library for the JobConnect recruitment marketplace.
//!
//! The marketplace workflow lives under [`workflows::marketplace`]: profile
//! intake for both sides, the candidate matcher, the invitation state
//! machine, and notification delivery. Storage is abstracted behind narrow
//! repository traits so the workflow logic runs against any backing store.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
