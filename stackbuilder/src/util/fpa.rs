//! Tolerant comparisons of lengths and masses.
//! `tol` is the absolute slack of the active [`UnitSystem`](crate::util::UnitSystem).

/// `a` and `b` are equal up to `tol` (or a few ulps for tiny values)
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    float_cmp::approx_eq!(f64, a, b, epsilon = tol, ulps = 4)
}

/// `a <= b`, or equal up to `tol`
pub fn approx_le(a: f64, b: f64, tol: f64) -> bool {
    a <= b || approx_eq(a, b, tol)
}

/// `a > b` by more than `tol`
pub fn exceeds(a: f64, b: f64, tol: f64) -> bool {
    !approx_le(a, b, tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_misses_within_tolerance() {
        assert!(approx_eq(1150.0, 1150.0 + 1e-5, 1e-3));
        assert!(!approx_eq(1150.0, 1150.1, 1e-3));
        assert!(approx_le(1700.0004, 1700.0, 1e-3));
        assert!(exceeds(1700.01, 1700.0, 1e-3));
    }
}
