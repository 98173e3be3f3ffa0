//! Generic root-finding on scalar functions of Julian Day.
//!
//! Two primitives, both pure:
//!  - bisection on a wrapped-angle residual, with a documented
//!    nearest-endpoint policy for same-sign brackets;
//!  - ternary search for a local extremum of a unimodal function.

use tracing::debug;

/// Normalize an angle to (-180, +180].
pub fn wrap_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Normalize an angle to [0, 360).
pub fn norm360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Check if a sign change is a genuine zero crossing vs a wrap-around
/// discontinuity. A jump from ~+180 to ~-180 flips sign without crossing
/// zero; a genuine crossing has both values relatively small.
pub fn is_genuine_crossing(f_a: f64, f_b: f64) -> bool {
    f_a * f_b < 0.0 && (f_a - f_b).abs() < 270.0
}

/// Tolerances and iteration cap for [`bisect_wrapped`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectConfig {
    /// Stop when |f| falls below this (degrees).
    pub tol_f: f64,
    /// Stop when the bracket shrinks below this (days).
    pub tol_t: f64,
    pub max_iterations: u32,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            tol_f: 1e-3,
            tol_t: 60.0 / 86_400.0,
            max_iterations: 30,
        }
    }
}

impl BisectConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.tol_f > 0.0) {
            return Err("tol_f must be positive");
        }
        if !(self.tol_t > 0.0) {
            return Err("tol_t must be positive");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1");
        }
        Ok(())
    }
}

/// Bisect a wrapped-angle residual `f` to a root in `[a, b]`.
///
/// Returns `(t, f(t))`. If `f(a)` and `f(b)` share a sign, there is no
/// bracketed root; the endpoint with smaller `|f|` is returned instead of
/// an error, since callers probe degenerate brackets routinely.
pub fn bisect_wrapped<F>(mut f: F, a: f64, b: f64, config: &BisectConfig) -> (f64, f64)
where
    F: FnMut(f64) -> f64,
{
    let f_a = f(a);
    if f_a == 0.0 {
        return (a, 0.0);
    }
    let f_b = f(b);
    if f_b == 0.0 {
        return (b, 0.0);
    }

    if f_a * f_b > 0.0 {
        debug!(f_a, f_b, "same-sign bracket, returning nearest endpoint");
        return if f_a.abs() <= f_b.abs() { (a, f_a) } else { (b, f_b) };
    }

    let (mut t_a, mut f_a) = (a, f_a);
    let mut t_b = b;
    let mut best = (0.5 * (a + b), f64::MAX);

    for _ in 0..config.max_iterations {
        let t_mid = 0.5 * (t_a + t_b);
        let f_mid = f(t_mid);
        best = (t_mid, f_mid);

        if f_mid.abs() < config.tol_f || (t_b - t_a).abs() < config.tol_t {
            break;
        }

        if f_a * f_mid <= 0.0 {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            f_a = f_mid;
        }
    }

    best
}

/// Ternary-search a local extremum of a unimodal `f` over `[a, b]`.
///
/// Returns `(t, f(t))` at the midpoint after `iterations` narrowings.
/// `find_min` selects minimum vs maximum.
pub fn ternary_extremum<F>(mut f: F, a: f64, b: f64, iterations: u32, find_min: bool) -> (f64, f64)
where
    F: FnMut(f64) -> f64,
{
    let (mut lo, mut hi) = (a, b);

    for _ in 0..iterations {
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        let f1 = f(m1);
        let f2 = f(m2);
        let keep_left = if find_min { f1 < f2 } else { f1 > f2 };
        if keep_left {
            hi = m2;
        } else {
            lo = m1;
        }
    }

    let t = 0.5 * (lo + hi);
    let v = f(t);
    (t, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_basic() {
        assert!((wrap_pm180(0.0)).abs() < 1e-12);
        assert!((wrap_pm180(190.0) + 170.0).abs() < 1e-12);
        assert!((wrap_pm180(-190.0) - 170.0).abs() < 1e-12);
        assert!((wrap_pm180(720.0)).abs() < 1e-12);
    }

    #[test]
    fn genuine_vs_wraparound() {
        assert!(is_genuine_crossing(5.0, -3.0));
        assert!(!is_genuine_crossing(170.0, -170.0));
        assert!(!is_genuine_crossing(2.0, 3.0));
    }

    #[test]
    fn bisect_finds_linear_root() {
        let cfg = BisectConfig::default();
        let (t, ft) = bisect_wrapped(|x| x - 2.5, 0.0, 10.0, &cfg);
        assert!((t - 2.5).abs() < 1e-3, "t = {t}");
        assert!(ft.abs() < 1e-2);
    }

    #[test]
    fn bisect_same_sign_returns_nearest_endpoint() {
        let cfg = BisectConfig::default();
        // f positive on the whole bracket; |f| smaller at b.
        let (t, _) = bisect_wrapped(|x| 10.0 - x, 0.0, 5.0, &cfg);
        assert!((t - 5.0).abs() < 1e-12);
        // |f| smaller at a.
        let (t, _) = bisect_wrapped(|x| 1.0 + x, 0.0, 5.0, &cfg);
        assert!(t.abs() < 1e-12);
    }

    #[test]
    fn bisect_exact_endpoint_root() {
        let cfg = BisectConfig::default();
        let (t, ft) = bisect_wrapped(|x| x - 1.0, 1.0, 2.0, &cfg);
        assert!((t - 1.0).abs() < 1e-12);
        assert_eq!(ft, 0.0);
    }

    #[test]
    fn bisect_is_idempotent() {
        let cfg = BisectConfig::default();
        let f = |x: f64| (x - 3.3).sin();
        let r1 = bisect_wrapped(f, 2.0, 4.0, &cfg);
        let r2 = bisect_wrapped(f, 2.0, 4.0, &cfg);
        assert_eq!(r1, r2);
    }

    #[test]
    fn ternary_finds_parabola_minimum() {
        let (t, v) = ternary_extremum(|x| (x - 4.2) * (x - 4.2) + 1.0, 0.0, 10.0, 20, true);
        assert!((t - 4.2).abs() < 1e-2, "t = {t}");
        assert!((v - 1.0).abs() < 1e-3);
    }

    #[test]
    fn ternary_finds_maximum() {
        let (t, _) = ternary_extremum(|x| -(x - 7.0) * (x - 7.0), 0.0, 10.0, 20, false);
        assert!((t - 7.0).abs() < 1e-2, "t = {t}");
    }

    #[test]
    fn config_rejects_bad_values() {
        let mut c = BisectConfig::default();
        c.tol_f = 0.0;
        assert!(c.validate().is_err());
        let mut c = BisectConfig::default();
        c.max_iterations = 0;
        assert!(c.validate().is_err());
    }
}
