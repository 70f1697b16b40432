//! Two-dimensional Gaussian kernel density estimation.
//!
//! The kernel covariance is the sample covariance of the cloud scaled by
//! Scott's factor `n^(-1/6)` squared. Clouds whose covariance is singular
//! (a single point, coincident points, points on one line) are rejected
//! with `ContextError::SingularDistribution`.

use crate::error::*;
use crate::location::*;
use std::f64::consts::PI;

/// Determinants below this fraction of `var_lat * var_lon` are singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

#[derive(Clone, Debug)]
pub struct GaussianKde {
    points: Vec<GeoPoint>,
    /// Upper triangle `[a, b, d]` of the inverse kernel covariance.
    inv_cov: [f64; 3],
    norm: f64,
}

impl GaussianKde {
    pub fn fit(points: &[GeoPoint]) -> Result<GaussianKde> {
        let n = points.len();
        let singular = || ContextError::SingularDistribution { points: n };

        if n < 2 || points.iter().any(|p| !p.is_finite()) {
            return Err(singular());
        }

        let nf = n as f64;
        let mean_lat = points.iter().map(|p| p.lat()).sum::<f64>() / nf;
        let mean_lon = points.iter().map(|p| p.lon()).sum::<f64>() / nf;

        let (mut s_ll, mut s_lo, mut s_oo) = (0.0, 0.0, 0.0);
        for p in points {
            let dl = p.lat() - mean_lat;
            let dlo = p.lon() - mean_lon;
            s_ll += dl * dl;
            s_lo += dl * dlo;
            s_oo += dlo * dlo;
        }

        let factor = nf.powf(-1.0 / 6.0);
        let scale = factor * factor / (nf - 1.0);
        let (c_ll, c_lo, c_oo) = (s_ll * scale, s_lo * scale, s_oo * scale);

        let det = c_ll * c_oo - c_lo * c_lo;
        if !det.is_finite() || det <= SINGULAR_TOLERANCE * c_ll * c_oo || det <= 0.0 {
            return Err(singular());
        }

        Ok(GaussianKde {
            points: points.to_vec(),
            inv_cov: [c_oo / det, -c_lo / det, c_ll / det],
            norm: 1.0 / (nf * 2.0 * PI * det.sqrt()),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Estimated density at `at`.
    pub fn pdf(&self, at: GeoPoint) -> f64 {
        let [a, b, d] = self.inv_cov;

        let sum: f64 = self
            .points
            .iter()
            .map(|p| {
                let dl = at.lat() - p.lat();
                let dlo = at.lon() - p.lon();
                let mahalanobis = a * dl * dl + 2.0 * b * dl * dlo + d * dlo * dlo;
                (-0.5 * mahalanobis).exp()
            })
            .sum();

        sum * self.norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.2),
            GeoPoint::new(0.3, 1.1),
            GeoPoint::new(-0.4, 0.6),
            GeoPoint::new(0.8, -0.7),
        ]
    }

    #[test]
    fn rejects_degenerate_clouds() {
        let single = [GeoPoint::new(1.0, 1.0)];
        let coincident = [GeoPoint::new(1.0, 1.0); 4];
        let collinear = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(2.0, 2.0),
        ];
        let empty: [GeoPoint; 0] = [];

        for points in [&single[..], &coincident[..], &collinear[..], &empty[..]] {
            assert!(matches!(
                GaussianKde::fit(points),
                Err(ContextError::SingularDistribution { .. })
            ));
        }
    }

    #[test]
    fn density_peaks_near_the_cloud() {
        let kde = GaussianKde::fit(&cloud()).unwrap();

        let near = kde.pdf(GeoPoint::new(0.3, 0.2));
        let far = kde.pdf(GeoPoint::new(10.0, 10.0));

        assert!(near > far);
        assert!(far >= 0.0);
    }

    #[test]
    fn density_integrates_to_one() {
        let kde = GaussianKde::fit(&cloud()).unwrap();

        let (lo, hi, steps) = (-6.0, 7.0, 260);
        let h = (hi - lo) / steps as f64;
        let mut total = 0.0;
        for i in 0..steps {
            for j in 0..steps {
                let lat = lo + (i as f64 + 0.5) * h;
                let lon = lo + (j as f64 + 0.5) * h;
                total += kde.pdf(GeoPoint::new(lat, lon)) * h * h;
            }
        }

        assert!((total - 1.0).abs() < 1e-3, "integral was {}", total);
    }

    #[test]
    fn density_matches_closed_form() {
        // Corners of a square centred on the origin: diagonal covariance.
        let points = [
            GeoPoint::new(-1.0, -1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(-1.0, 1.0),
            GeoPoint::new(1.0, -1.0),
        ];
        let kde = GaussianKde::fit(&points).unwrap();

        // Sample variance 4/3 per axis, Scott factor 4^(-1/6).
        let var = (4.0 / 3.0) * 4f64.powf(-1.0 / 3.0);
        let expected: f64 = points
            .iter()
            .map(|p| {
                let q = (p.lat() * p.lat() + p.lon() * p.lon()) / var;
                (-0.5 * q).exp()
            })
            .sum::<f64>()
            / (4.0 * 2.0 * PI * var);

        assert!((kde.pdf(GeoPoint::new(0.0, 0.0)) - expected).abs() < 1e-12);
    }
}
