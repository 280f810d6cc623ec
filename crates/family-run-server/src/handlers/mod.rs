//! HTTP handlers

pub mod feedback;
pub mod runs;
pub mod status;
