//! Core domain types shared by the bundle and response-file flows.

pub mod errors;
pub mod model;
