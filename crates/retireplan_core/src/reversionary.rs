//! Defined-benefit continuation to a surviving partner

/// Annual amount that continues after the original recipient's death.
///
/// `reversionary_rate_percent` is expected in `[0, 100]`; values outside
/// that range are not rejected and scale the result linearly.
#[must_use]
pub fn calculate_reversionary_pension(original_annual: f64, reversionary_rate_percent: f64) -> f64 {
    original_annual * (reversionary_rate_percent / 100.0)
}
