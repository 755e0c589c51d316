//! Actual duration of a task on the calendar.
//!
//! `actual = round(estimated / availability * 100 * (1 + contingency / 100))`
//!
//! The value is evaluated exactly as the fraction
//! `estimated * (100 + contingency) / availability` and rounded half to even,
//! so `2.5 -> 2`, `3.5 -> 4` and `4.5 -> 4`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("availability must be between 1 and 100 percent (got {0})")]
    InvalidAvailability(i32),
    #[error("contingency margin must not be negative (got {0})")]
    InvalidContingency(i32),
    #[error("estimated duration must be at least one day")]
    InvalidEstimate,
    #[error("actual duration does not fit in a day count")]
    Overflow,
}

pub fn actual_duration(
    estimated_duration: u32,
    availability: i32,
    contingency_margin: i32,
) -> Result<u32, DurationError> {
    if !(1..=100).contains(&availability) {
        return Err(DurationError::InvalidAvailability(availability));
    }
    if contingency_margin < 0 {
        return Err(DurationError::InvalidContingency(contingency_margin));
    }
    if estimated_duration == 0 {
        return Err(DurationError::InvalidEstimate);
    }

    let numerator = u64::from(estimated_duration) * (100 + contingency_margin as u64);
    let denominator = availability as u64;
    let rounded = round_half_even(numerator, denominator);
    u32::try_from(rounded).map_err(|_| DurationError::Overflow)
}

fn round_half_even(numerator: u64, denominator: u64) -> u64 {
    let quotient = numerator / denominator;
    let twice_remainder = (numerator % denominator) * 2;
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}
