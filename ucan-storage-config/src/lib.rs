//! # UCAN Storage Config
//!
//! This crate provides the configuration of a UCAN storage service.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod error;
mod traits;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod default;
pub mod storage;

pub use error::*;
pub use traits::*;
