//! # reaper-core
//!
//! Core crate for REAPER. Contains the typed data contracts that flow
//! through the detect, score, act pipeline, configuration schemas, logging
//! setup, and the unified error system.
//!
//! This crate has **no** internal dependencies on other REAPER crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod result;

pub use error::{ErrorKind, ReaperError, ValidationError};
pub use models::{ActionResult, Attributes, Priority, ScoredSignal, Sense, Signal};
pub use result::ReaperResult;
