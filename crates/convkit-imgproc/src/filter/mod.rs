//! Filter operations
//!
//! This module provides the 3x3 convolution filters and the named kernel registry.

/// Filter kernels
pub mod kernels;

/// Per pixel sampling and row range convolution
mod convolution;
pub use convolution::*;

/// Error types for the filter module
mod error;
pub use error::FilterError;

/// Filter operations
mod ops;
pub use ops::*;
