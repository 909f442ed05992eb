//! Success probability estimates
//!
//! Closed-form estimates of the share of the password space a table covers,
//! used to report table quality without enumerating the space.

use crate::constants::PASSWORD_SPACE;
use crate::domain::reduction::Reducer;

/// Success probability of a rainbow table (distinct reduction per column)
///
/// `m` chains, `columns` hashed columns per chain, `n` passwords in the space.
/// Uses m₁ = m, mᵢ₊₁ = n(1 − e^(−mᵢ/n)), P = 1 − Π(1 − mᵢ/n).
pub fn rainbow_success_probability(m: u64, columns: u32, n: u64) -> f64 {
    if m == 0 || columns == 0 || n == 0 {
        return 0.0;
    }

    let n = n as f64;
    let mut mi = m as f64;
    let mut miss = 1.0f64;

    for _ in 0..columns {
        miss *= 1.0 - (mi / n).min(1.0);
        mi = -n * (-mi / n).exp_m1();
    }

    1.0 - miss
}

/// Success probability lower bound of a classic table (same reduction everywhere)
///
/// Hellman's bound: P ≥ (1/n) Σᵢ Σⱼ (1 − i·t/n)^(j+1) with i over chains and
/// j over columns; the inner sum is evaluated in closed form.
pub fn hellman_success_probability(m: u64, columns: u32, n: u64) -> f64 {
    if m == 0 || columns == 0 || n == 0 {
        return 0.0;
    }

    let n = n as f64;
    let t = columns as f64;
    let mut covered = 0.0f64;

    for i in 1..=m {
        let x = (i as f64 * t / n).min(1.0);
        if x >= 1.0 {
            break;
        }
        let q = 1.0 - x;
        // Σ_{j=0}^{t-1} q^(j+1) = q(1 − q^t)/(1 − q)
        covered += if x == 0.0 {
            t
        } else {
            q * (1.0 - q.powf(t)) / x
        };
    }

    (covered / n).min(1.0)
}

/// Success probability estimate for a table built with `reducer`
pub fn estimate_success_probability(reducer: Reducer, m: u64, chain_length: u32) -> f64 {
    // Every password of the chain, endpoint included, is searchable.
    let columns = chain_length + 1;
    match reducer {
        Reducer::Fixed => hellman_success_probability(m, columns, PASSWORD_SPACE),
        Reducer::Positional => rainbow_success_probability(m, columns, PASSWORD_SPACE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_inputs() {
        assert_eq!(rainbow_success_probability(0, 10, 100), 0.0);
        assert_eq!(rainbow_success_probability(10, 0, 100), 0.0);
        assert_eq!(hellman_success_probability(0, 10, 100), 0.0);
        assert_eq!(hellman_success_probability(10, 10, 0), 0.0);
    }

    #[test]
    fn test_small_table_is_nearly_linear() {
        // m·t ≪ n: almost no merges, P ≈ m·t/n
        let m = 1_000;
        let t = 11;
        let expected = (m * t as u64) as f64 / PASSWORD_SPACE as f64;

        let rainbow = rainbow_success_probability(m, t, PASSWORD_SPACE);
        let hellman = hellman_success_probability(m, t, PASSWORD_SPACE);
        assert!((rainbow - expected).abs() / expected < 1e-3);
        assert!((hellman - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_probability_bounded_and_monotonic() {
        let n = 10_000;
        let mut prev = 0.0;
        for m in [10, 100, 1_000, 10_000, 100_000] {
            let p = rainbow_success_probability(m, 20, n);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= prev);
            prev = p;
        }
        let p = hellman_success_probability(100_000, 20, n);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_estimate_uses_reducer() {
        let fixed = estimate_success_probability(Reducer::Fixed, 1 << 10, 10);
        let positional = estimate_success_probability(Reducer::Positional, 1 << 10, 10);
        assert!(fixed > 0.0 && fixed < 1e-6);
        assert!(positional > 0.0 && positional < 1e-6);
    }
}
