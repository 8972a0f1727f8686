//! Platform integration

pub mod open;
