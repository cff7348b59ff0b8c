//! Bounds how much any simulated "after" image may differ from its source.

use crate::shared::frame::Frame;

/// Largest visual correction a simulation may represent.
pub const MAX_CORRECTION: f64 = 0.5;

/// Mean absolute per-channel change allowed, on the 0..255 scale.
pub const MAX_MEAN_DELTA: f64 = MAX_CORRECTION * 255.0 * 0.5;

/// How much darker on average a capped result may be before it is lifted.
pub const DARKENING_TOLERANCE: f64 = 0.5;

/// Bisection steps when solving for the lift; the bracket starts at 255.
const LIFT_SEARCH_STEPS: usize = 40;

/// Scales the change from `before` to `after` so its mean absolute value is
/// at most [`MAX_MEAN_DELTA`]. If the rounded result is then more than
/// [`DARKENING_TOLERANCE`] darker on average than `before`, it is lifted
/// until it is no darker at all.
///
/// Both frames must have the same dimensions; otherwise `before` is
/// returned unchanged.
pub fn cap_correction(before: &Frame, after: &Frame) -> Frame {
    if before.is_empty()
        || before.width() != after.width()
        || before.height() != after.height()
    {
        if !before.is_empty() {
            log::warn!(
                "Simulation changed crop size from {}x{} to {}x{}, keeping the original",
                before.width(),
                before.height(),
                after.width(),
                after.height()
            );
        }
        return before.clone();
    }

    let base: Vec<f64> = before.data().iter().map(|&v| v as f64).collect();
    let mut delta: Vec<f64> = after
        .data()
        .iter()
        .zip(&base)
        .map(|(&a, &b)| a as f64 - b)
        .collect();

    limit_mean_delta(&mut delta);
    let capped = quantize(before, &base, &delta);
    if capped.mean_value() >= before.mean_value() - DARKENING_TOLERANCE {
        return capped;
    }

    let lift = solve_lift(&base, &delta);
    for (d, &b) in delta.iter_mut().zip(&base) {
        *d = (b + *d + lift).clamp(0.0, 255.0) - b;
    }
    // Uniform scaling keeps a non-negative mean delta non-negative.
    limit_mean_delta(&mut delta);
    quantize(before, &base, &delta)
}

/// Smallest flat lift (up to bisection precision, rounded up) that makes
/// the mean delta non-negative once values saturate at 0 and 255.
fn solve_lift(base: &[f64], delta: &[f64]) -> f64 {
    let lifted_mean = |lift: f64| {
        base.iter()
            .zip(delta)
            .map(|(&b, &d)| (b + d + lift).clamp(0.0, 255.0) - b)
            .sum::<f64>()
            / base.len() as f64
    };

    let (mut lo, mut hi) = (0.0, 255.0);
    for _ in 0..LIFT_SEARCH_STEPS {
        let mid = (lo + hi) / 2.0;
        if lifted_mean(mid) >= 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi
}

fn quantize(before: &Frame, base: &[f64], delta: &[f64]) -> Frame {
    let data = base
        .iter()
        .zip(delta)
        .map(|(&b, &d)| (b + d).round().clamp(0.0, 255.0) as u8)
        .collect();
    Frame::new(data, before.width(), before.height())
}

fn limit_mean_delta(delta: &mut [f64]) {
    let mean_abs = delta.iter().map(|d| d.abs()).sum::<f64>() / delta.len() as f64;
    if mean_abs > 1e-6 && mean_abs > MAX_MEAN_DELTA {
        let scale = MAX_MEAN_DELTA / mean_abs;
        delta.iter_mut().for_each(|d| *d *= scale);
    }
}
