//! fuelrate Core - Fundamental types
//!
//! This crate provides the core types used throughout fuelrate:
//! - `ConvertError`: The error taxonomy of the conversion pipeline
//! - `ErrorResult`: The tagged error payload returned at the API boundary
//! - Numeric helpers for money rounding and display precision

mod error;
pub mod numeric;

pub use error::{codes, ConvertError, ErrorKind, ErrorResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{ConvertError, ErrorKind, ErrorResult};
}
