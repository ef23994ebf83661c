use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Relative difference `|a - b| / max(|a|, |b|)`, zero when both are zero.
pub fn relative_diff(a: Real, b: Real) -> Real {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::NonPositive { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert_eq!(ensure_positive(2.5, "t"), Ok(2.5));
        assert!(matches!(
            ensure_positive(0.0, "t"),
            Err(CoreError::NonPositive { .. })
        ));
        assert!(matches!(
            ensure_positive(-1.0, "t"),
            Err(CoreError::NonPositive { .. })
        ));
        assert!(matches!(
            ensure_positive(Real::INFINITY, "t"),
            Err(CoreError::NonFinite { .. })
        ));
    }

    #[test]
    fn relative_diff_handles_zero() {
        assert_eq!(relative_diff(0.0, 0.0), 0.0);
        assert!((relative_diff(100.0, 99.0) - 0.01).abs() < 1e-12);
    }
}
