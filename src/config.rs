//! Defaults and tolerances shared by the engine and the binaries.

/// Tolerance for every length comparison.
pub const EPS: f64 = 1e-9;

/// Decimal places kept when a correction is subtracted from an ordered width.
pub const LENGTH_DECIMALS: i32 = 3;

/// Default saw kerf, charged once per piece.
pub const DEFAULT_KERF: f64 = 0.003;

/// Default length of an uncut raw profile.
pub const DEFAULT_WHOLE_PROFILE_LENGTH: f64 = 6.0;

/// Leftovers shorter than this are waste, longer ones are reusable remnants.
pub const DEFAULT_MIN_REST_LENGTH: f64 = 1.0;

/// The search polls its deadline once per this many expanded nodes.
pub const DEADLINE_CHECK_INTERVAL: u64 = 4096;

/// Time limit when none is given: the server's cap when `TIME_LIMIT_MS` is
/// unset, and the CLI's limit for the `best` strategy.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 10_000;

/// Rounds a length to [`LENGTH_DECIMALS`] places.
pub fn round_length(value: f64) -> f64 {
    let factor = 10f64.powi(LENGTH_DECIMALS);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_length() {
        assert_eq!(round_length(1.2344), 1.234);
        assert_eq!(round_length(1.2346), 1.235);
        assert_eq!(round_length(2.0 - 0.001), 1.999);
    }
}
