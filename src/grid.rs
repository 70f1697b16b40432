use crate::location::*;
use itertools::*;

/// Axis-aligned bounds of a point cloud.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BoundingBox {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl BoundingBox {
    /// Bounds of `points`, or `None` for an empty cloud.
    pub fn of(points: &[GeoPoint]) -> Option<BoundingBox> {
        let (min_lat, max_lat) = points
            .iter()
            .map(|p| p.lat())
            .minmax_by(f64::total_cmp)
            .into_option()?;
        let (min_lon, max_lon) = points
            .iter()
            .map(|p| p.lon())
            .minmax_by(f64::total_cmp)
            .into_option()?;

        Some(BoundingBox {
            min: GeoPoint::new(min_lat, min_lon),
            max: GeoPoint::new(max_lat, max_lon),
        })
    }
}

/// `count` evenly spaced samples from `start` to `end`, both inclusive.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i + 1 == count { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// A square evaluation grid spanning a bounding box, holding one sampled
/// value per node.
#[derive(Clone, Debug)]
pub struct DensityGrid {
    resolution: usize,
    lats: Vec<f64>,
    lons: Vec<f64>,
    data: Vec<f64>,
}

impl DensityGrid {
    pub fn new(bounds: &BoundingBox, resolution: usize) -> Self {
        DensityGrid {
            resolution,
            lats: linspace(bounds.min.lat(), bounds.max.lat(), resolution),
            lons: linspace(bounds.min.lon(), bounds.max.lon(), resolution),
            data: vec![0.0; resolution * resolution],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    pub fn node(&self, x: usize, y: usize) -> GeoPoint {
        GeoPoint::new(self.lats[x], self.lons[y])
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.resolution + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[y * self.resolution + x] = value;
    }

    /// Sample `f` at every node.
    pub fn fill<F>(&mut self, mut f: F)
    where
        F: FnMut(GeoPoint) -> f64,
    {
        for y in 0..self.resolution {
            for x in 0..self.resolution {
                let value = f(self.node(x, y));
                self.set(x, y, value);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        let resolution = self.resolution;
        self.data.iter().enumerate().map(move |(i, v)| {
            let x = i % resolution;
            let y = i / resolution;
            ((x, y), *v)
        })
    }

    /// Smallest and largest sampled value, ignoring non-finite samples.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .minmax_by(f64::total_cmp)
            .into_option()
    }

    /// Node holding the largest sampled value.
    pub fn argmax(&self) -> Option<GeoPoint> {
        self.iter()
            .filter(|(_, v)| v.is_finite())
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|((x, y), _)| self.node(x, y))
    }

    /// Node holding the smallest sampled value.
    pub fn argmin(&self) -> Option<GeoPoint> {
        self.iter()
            .filter(|(_, v)| v.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|((x, y), _)| self.node(x, y))
    }
}
