//! Shared helpers used across the utilities

pub mod fs;
