//! Mess waste tracker math utilities.

pub mod math;

pub use math::ols::{fit_two_feature, OlsFit};
pub use math::rounding::round_to;
pub use math::stable::{mean, neumaier_sum};
