//! Core math modules.

pub mod ols;
pub mod rounding;
pub mod stable;
