//! Folio: desktop client for the book search and recommendation demo
//!
//! The backend owns ranking, scoring and feedback aggregation; this crate
//! renders its results, tracks request state per flow, sends feedback events
//! and manages the display theme.

pub mod app;
pub mod backend;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod native;
pub mod tags;
pub mod theme;
pub mod ui;

pub use error::{Error, Result};
