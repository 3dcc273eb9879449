//! Common utilities module
//!
//! This module contains the error type shared by the dataset decoder and the bitmap encoder.

pub mod error;

pub use error::{DatasetError, Result};
