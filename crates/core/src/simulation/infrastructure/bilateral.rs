use ndarray::Array2;

use crate::scoring::pixel_statistics::reflect_101;

/// Precomputed neighbourhood for a bilateral filter: offsets inside the
/// circular window and their spatial Gaussian weights.
pub struct BilateralKernel {
    offsets: Vec<(isize, isize, f32)>,
    color_coeff: f32,
}

impl BilateralKernel {
    /// `diameter` is the window width in pixels; sigmas are in channel
    /// levels (color) and pixels (space).
    pub fn new(diameter: usize, sigma_color: f32, sigma_space: f32) -> Self {
        let radius = (diameter / 2) as isize;
        let space_coeff = -0.5 / (sigma_space * sigma_space);
        let mut offsets = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let r2 = (dx * dx + dy * dy) as f32;
                if r2 > (radius * radius) as f32 {
                    continue;
                }
                offsets.push((dy, dx, (r2 * space_coeff).exp()));
            }
        }
        Self {
            offsets,
            color_coeff: -0.5 / (sigma_color * sigma_color),
        }
    }

    /// Filters same-shaped planes jointly. The color distance between two
    /// pixels is the sum of absolute differences across all planes, so
    /// edges in any plane are preserved in every plane. Results are
    /// rounded to integer levels.
    pub fn apply(&self, planes: &[&Array2<f32>]) -> Vec<Array2<f32>> {
        let Some(first) = planes.first() else {
            return Vec::new();
        };
        let (h, w) = first.dim();
        debug_assert!(planes.iter().all(|p| p.dim() == (h, w)));

        let mut out: Vec<Array2<f32>> = planes.iter().map(|_| Array2::zeros((h, w))).collect();
        let mut acc = vec![0.0f32; planes.len()];

        for y in 0..h {
            for x in 0..w {
                acc.iter_mut().for_each(|v| *v = 0.0);
                let mut weight_sum = 0.0f32;

                for &(dy, dx, spatial) in &self.offsets {
                    let sy = reflect_101(y as isize + dy, h);
                    let sx = reflect_101(x as isize + dx, w);
                    let dist: f32 = planes
                        .iter()
                        .map(|p| (p[[sy, sx]] - p[[y, x]]).abs())
                        .sum();
                    let weight = spatial * (dist * dist * self.color_coeff).exp();
                    for (a, p) in acc.iter_mut().zip(planes) {
                        *a += weight * p[[sy, sx]];
                    }
                    weight_sum += weight;
                }

                for (o, a) in out.iter_mut().zip(&acc) {
                    o[[y, x]] = (a / weight_sum).round();
                }
            }
        }
        out
    }
}
