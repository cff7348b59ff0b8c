//! Pixel statistics shared by the confidence and skin scoring engines.

use image::GrayImage;
use imageproc::edges::canny;
use ndarray::Array2;

/// Hysteresis thresholds for the binary edge map.
pub const CANNY_LOW: f32 = 50.0;
pub const CANNY_HIGH: f32 = 150.0;

/// Clip `value` into `[low, high]` and rescale to 0..100.
///
/// A degenerate range (`high <= low`) yields the neutral 50.0.
pub fn normalize_0_100(value: f64, low: f64, high: f64) -> f64 {
    if high <= low {
        return 50.0;
    }
    100.0 * (value.clamp(low, high) - low) / (high - low)
}

pub fn clip_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Population variance of the 4-neighbour Laplacian response, with
/// reflect-101 borders. Blurry images have low variance, sharp or rough
/// texture high variance.
pub fn laplacian_variance(gray: &Array2<f32>) -> f64 {
    let (h, w) = gray.dim();
    if h == 0 || w == 0 {
        return 0.0;
    }

    let n = (h * w) as f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for y in 0..h {
        let up = reflect_101(y as isize - 1, h);
        let down = reflect_101(y as isize + 1, h);
        for x in 0..w {
            let left = reflect_101(x as isize - 1, w);
            let right = reflect_101(x as isize + 1, w);
            let response = gray[[up, x]] + gray[[down, x]] + gray[[y, left]] + gray[[y, right]]
                - 4.0 * gray[[y, x]];
            let r = response as f64;
            sum += r;
            sum_sq += r * r;
        }
    }
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Mirror index for out-of-range neighbours, excluding the edge pixel itself.
pub fn reflect_101(i: isize, len: usize) -> usize {
    let n = len as isize;
    if n == 1 {
        return 0;
    }
    let reflected = if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    };
    reflected.clamp(0, n - 1) as usize
}

/// Share of values strictly below `threshold`, in [0, 1].
pub fn fraction_below(values: &Array2<f32>, threshold: f32) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|&&v| v < threshold).count() as f64 / values.len() as f64
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(values: &Array2<f32>, pct: f64) -> f64 {
    let mut sorted: Vec<f32> = values.iter().copied().collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac
}

/// Share of pixels marked as edges by a Canny detector, in [0, 1].
///
/// imageproc's Canny blurs with σ 1.4 first, so densities run lower than
/// on an unsmoothed gradient.
pub fn edge_density(gray: &GrayImage) -> f64 {
    let total = gray.width() as usize * gray.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let edges = canny(gray, CANNY_LOW, CANNY_HIGH);
    edges.pixels().filter(|p| p.0[0] > 0).count() as f64 / total as f64
}

pub fn mean(values: &Array2<f32>) -> f64 {
    values.mean().map_or(0.0, f64::from)
}

pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let m = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n).sqrt()
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    #[rstest]
    #[case::below_low(10.0, 20.0, 90.0, 0.0)]
    #[case::above_high(95.0, 20.0, 90.0, 100.0)]
    #[case::midpoint(55.0, 20.0, 90.0, 50.0)]
    #[case::degenerate(5.0, 10.0, 10.0, 50.0)]
    #[case::inverted(5.0, 10.0, 0.0, 50.0)]
    fn test_normalize_0_100(
        #[case] value: f64,
        #[case] low: f64,
        #[case] high: f64,
        #[case] expected: f64,
    ) {
        assert_relative_eq!(normalize_0_100(value, low, high), expected);
    }

    #[test]
    fn test_laplacian_variance_flat_is_zero() {
        let flat = Array2::from_elem((10, 10), 128.0f32);
        assert_relative_eq!(laplacian_variance(&flat), 0.0);
    }

    #[test]
    fn test_laplacian_variance_checkerboard_is_high() {
        let board = Array2::from_shape_fn((16, 16), |(y, x)| if (x + y) % 2 == 0 { 0.0 } else { 255.0 });
        // Every interior response is +-1020.
        assert!(laplacian_variance(&board) > 500_000.0);
    }

    #[test]
    fn test_laplacian_variance_single_pixel_and_empty() {
        assert_relative_eq!(laplacian_variance(&Array2::from_elem((1, 1), 9.0f32)), 0.0);
        assert_relative_eq!(laplacian_variance(&Array2::<f32>::zeros((0, 0))), 0.0);
    }

    #[rstest]
    #[case(-1, 5, 1)]
    #[case(5, 5, 3)]
    #[case(2, 5, 2)]
    #[case(-1, 1, 0)]
    fn test_reflect_101(#[case] i: isize, #[case] len: usize, #[case] expected: usize) {
        assert_eq!(reflect_101(i, len), expected);
    }

    #[test]
    fn test_fraction_below() {
        let v = array![[1.0f32, 2.0], [3.0, 4.0]];
        assert_relative_eq!(fraction_below(&v, 3.0), 0.5);
        assert_relative_eq!(fraction_below(&v, 0.0), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let v = array![[1.0f32, 2.0], [3.0, 4.0]];
        assert_relative_eq!(percentile(&v, 25.0), 1.75);
        assert_relative_eq!(percentile(&v, 0.0), 1.0);
        assert_relative_eq!(percentile(&v, 100.0), 4.0);
    }

    #[test]
    fn test_edge_density_flat_image_has_no_edges() {
        let gray = GrayImage::from_pixel(32, 32, image::Luma([120]));
        assert_relative_eq!(edge_density(&gray), 0.0);
    }

    #[test]
    fn test_edge_density_detects_step() {
        let gray = GrayImage::from_fn(32, 32, |x, _| image::Luma([if x < 16 { 20 } else { 230 }]));
        let d = edge_density(&gray);
        assert!(d > 0.0 && d < 0.5, "density {d}");
    }

    #[test]
    fn test_edge_density_smooths_away_isolated_speckle() {
        let mut gray = GrayImage::from_pixel(32, 32, image::Luma([0]));
        gray.put_pixel(16, 16, image::Luma([255]));
        assert_relative_eq!(edge_density(&gray), 0.0);
    }

    #[test]
    fn test_std_dev() {
        assert_relative_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
        assert_relative_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_round1() {
        assert_relative_eq!(round1(12.345), 12.3);
        assert_relative_eq!(round1(59.96), 60.0);
    }
}
