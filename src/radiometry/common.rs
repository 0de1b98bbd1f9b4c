//! Common utilities module
//!
//! This module contains shared utilities used across the radiometry pipeline.

pub mod error;

pub use error::{RadiometryError, Result};
