//! Application layer: the `bundle` and `create-rsp` flows.

pub mod bundle;
pub mod response;
pub mod scan;
