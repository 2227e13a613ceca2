//! Core request types and the raw-operation interface

pub mod flags;
pub mod offset;
pub mod traits;
