/// Amounts are stored in minor units (cents). API payloads carry decimals,
/// so the 0.01 matching tolerance becomes a one-cent band here.
pub const MINOR_UNIT_TOLERANCE: i64 = 1;

pub fn to_minor(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_minor(amount_minor: i32) -> f64 {
    f64::from(amount_minor) / 100.0
}

pub fn within_tolerance(expected_minor: i64, supplied_minor: i64) -> bool {
    (expected_minor - supplied_minor).abs() <= MINOR_UNIT_TOLERANCE
}
