//! Demand charge with the overrun penalty.
//!
//! The contracted demand is always billed in full. Measured demand may exceed it by up to
//! [`TOLERANCE`] free of charge, past that the whole excess is billed at [`PENALTY_FACTOR`] times
//! the rate on top of the contracted amount.

use crate::quantity::{cost::Cost, power::Kilowatts, rate::KilowattRate};

pub const TOLERANCE: f64 = 1.05;

pub const PENALTY_FACTOR: f64 = 2.0;

/// Billed demand charge of a single period.
pub fn billed_cost(measured: Kilowatts, contracted: Kilowatts, rate: KilowattRate) -> Cost {
    let contracted_cost = contracted * rate;
    if measured <= contracted * TOLERANCE {
        contracted_cost
    } else {
        contracted_cost + (measured - contracted) * rate * PENALTY_FACTOR
    }
}
