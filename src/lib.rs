//! rsledger: a two-level allocation ledger.
//!
//! Root categories optionally own sub-categories. Percentage or value
//! allocations on a sub-category roll up into its parent; every entry tracks
//! its variance against the baseline it was created with.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
