//! Standard-normal helpers that stay finite in the tails.
//!
//! Binary-choice likelihoods need `ln Φ(x)` and `φ(x)/Φ(x)` for linear
//! predictors far from zero. Evaluating `Φ` directly underflows to `0`
//! around `x ≈ -38`, after which `ln Φ` is `-∞` and the Mills ratio is
//! `0/0`. Everything here goes through `erfc` (accurate in the upper tail)
//! and switches to the asymptotic expansion once `erfc` would underflow.
use statrs::function::erf::erfc;
use std::f64::consts::FRAC_1_SQRT_2;

/// Below this point `ln Φ(x)` is taken from the asymptotic series.
///
/// `erfc(-x/√2)` is still a normal `f64` here; the series' truncation error
/// (`~105/x⁸`) is far below `f64` resolution of `ln Φ ≈ -690`.
pub const LOG_CDF_ASYMPTOTIC_CUTOFF: f64 = -37.0;

/// `ln √(2π)`.
pub const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// Standard normal CDF `Φ(x)`.
pub fn std_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// `ln φ(x)`; exact for every finite `x`.
pub fn log_std_normal_pdf(x: f64) -> f64 {
    -0.5 * x * x - LN_SQRT_2PI
}

/// Numerically stable `ln Φ(x)`.
///
/// - `x ≥ LOG_CDF_ASYMPTOTIC_CUTOFF`: `ln(½·erfc(-x/√2))`.
/// - Below the cutoff:
///   `ln φ(x) − ln(−x) + ln(1 − 1/x² + 3/x⁴ − 15/x⁶)`.
///
/// Returns a finite, non-positive value for every finite input.
pub fn log_std_normal_cdf(x: f64) -> f64 {
    if x >= LOG_CDF_ASYMPTOTIC_CUTOFF {
        return std_normal_cdf(x).ln();
    }
    let inv_x2 = 1.0 / (x * x);
    let series = 1.0 - inv_x2 + 3.0 * inv_x2 * inv_x2 - 15.0 * inv_x2 * inv_x2 * inv_x2;
    log_std_normal_pdf(x) - (-x).ln() + series.ln()
}

/// Inverse Mills ratio `λ(x) = φ(x) / Φ(x)`.
///
/// Computed in log space, so it tends to `0` for large `x` and behaves like
/// `-x` for very negative `x` instead of producing `NaN`.
pub fn inverse_mills_ratio(x: f64) -> f64 {
    (log_std_normal_pdf(x) - log_std_normal_cdf(x)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the stable helpers with naïve formulas where both are
    //   well conditioned.
    // - Finiteness and asymptotic behavior in the far tails.
    //
    // They intentionally DO NOT cover:
    // - Accuracy of `statrs::function::erf::erfc` itself.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check `std_normal_cdf` against a few reference values.
    //
    // Given
    // -----
    // - x ∈ {0, 1.959964, -1}.
    //
    // Expect
    // ------
    // - Φ(0) = 0.5, Φ(1.959964) ≈ 0.975, Φ(-1) = 0.158655253931457 within
    //   1e-10. `erfc` carries an absolute error of about 1e-11 here.
    fn std_normal_cdf_matches_reference_values() {
        // Arrange / Act / Assert
        assert!((std_normal_cdf(0.0) - 0.5).abs() < 1e-15);
        assert!((std_normal_cdf(1.959_964) - 0.975).abs() < 1e-6);
        assert!((std_normal_cdf(-1.0) - 0.158_655_253_931_457).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `log_std_normal_cdf` agrees with `ln Φ` on a safe grid and
    // is continuous across the asymptotic cutoff.
    //
    // Given
    // -----
    // - A grid on [-10, 10] and the two sides of the cutoff.
    //
    // Expect
    // ------
    // - Agreement to 1e-12 on the grid.
    // - Relative jump across the cutoff below 1e-9.
    fn log_std_normal_cdf_matches_naive_and_is_continuous() {
        // Arrange
        let grid = (-20..=20).map(|i| i as f64 * 0.5);

        // Act / Assert
        for x in grid {
            let naive = std_normal_cdf(x).ln();
            assert!((log_std_normal_cdf(x) - naive).abs() < 1e-12, "mismatch at {x}");
        }
        let left = log_std_normal_cdf(LOG_CDF_ASYMPTOTIC_CUTOFF - 1e-9);
        let right = log_std_normal_cdf(LOG_CDF_ASYMPTOTIC_CUTOFF);
        assert!(((left - right) / right).abs() < 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Ensure tail evaluations stay finite where the naïve form breaks down.
    //
    // Given
    // -----
    // - x = -60 (Φ underflows) and x = 60 (Φ rounds to 1).
    //
    // Expect
    // ------
    // - `log_std_normal_cdf(-60)` is finite and close to `ln φ(-60) − ln 60`.
    // - `inverse_mills_ratio(-60)` ≈ 60 and `inverse_mills_ratio(60)` ≈ 0.
    fn tails_remain_finite() {
        // Arrange
        let x = -60.0;

        // Act
        let log_cdf = log_std_normal_cdf(x);
        let mills_low = inverse_mills_ratio(x);
        let mills_high = inverse_mills_ratio(-x);

        // Assert
        assert!(log_cdf.is_finite());
        assert!((log_cdf - (log_std_normal_pdf(x) - 60.0_f64.ln())).abs() < 1e-3);
        assert!((mills_low - 60.0).abs() < 0.05);
        assert!(mills_high >= 0.0 && mills_high < 1e-300);
    }
}
