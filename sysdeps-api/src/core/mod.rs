//! Capability vocabulary and the probe interfaces that answer it

pub mod traits;
pub mod types;
