//! Math utilities for amounts, tolerances and fixed-point prices

pub mod pure_math;

pub use pure_math::{multiply_and_divide, clamp_tolerance, min_receive_for_tolerance, shortfall_ppm, fixed_point_to_decimal, invert_fixed_point};
