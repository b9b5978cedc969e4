//! Easing curves for step animation progress.

/// Easing curve applied to a step's rotation progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Constant-rate rotation - the classic split-flap look.
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First control point.
        c1: f32,
        /// Second control point.
        c2: f32,
    },
}

impl Easing {
    /// Evaluate the curve at progress `t`.
    ///
    /// Input is clamped to [0.0, 1.0]; the result stays in [0.0, 1.0].
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::CubicHermite { c1, c2 } => {
                // f(t) = c0(1-t)³ + c1·3t(1-t)² + c2·3(1-t)t² + c3·t³
                // with c0 = 0.0, c3 = 1.0.
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::Linear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        let curves = [
            Easing::Linear,
            Easing::QuadraticIn,
            Easing::QuadraticOut,
            Easing::CubicHermite { c1: 0.33, c2: 1.0 },
        ];
        for curve in curves {
            assert!((curve.evaluate(0.0) - 0.0).abs() < 1e-6);
            assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.evaluate(-2.0), 0.0);
        assert_eq!(Easing::Linear.evaluate(3.0), 1.0);
    }

    #[test]
    fn quadratic_in_lags_linear() {
        assert!(Easing::QuadraticIn.evaluate(0.5) < 0.5);
        assert!(Easing::QuadraticOut.evaluate(0.5) > 0.5);
    }
}
