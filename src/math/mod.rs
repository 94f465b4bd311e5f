//! Numeric helpers shared by the index arithmetic.

/// Most decimal places the CLI accepts; beyond this an `f64` carries no more digits.
pub const MAX_DECIMALS: u32 = 15;

/// Round `value` to `decimals` places, half away from zero.
///
/// Returns `value` unchanged when the scaling would overflow.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    let scaled = value * factor;
    if !(factor.is_finite() && scaled.is_finite()) {
        return value;
    }
    scaled.round() / factor
}

/// Running arithmetic mean over every value pushed.
///
/// Holds the sum and count, so the result is the true mean regardless of
/// the order values arrive in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}
