use serde::*;

/// An observed or queried coordinate (latitude, longitude).
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    #[inline]
    pub fn lat(self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(self) -> f64 {
        self.lon
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        GeoPoint { lat, lon }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lat, lon]: [f64; 2]) -> Self {
        GeoPoint { lat, lon }
    }
}

impl Serialize for GeoPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.lat, self.lon].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <[f64; 2]>::deserialize(deserializer).map(GeoPoint::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_coordinate_pair() {
        let point: GeoPoint = serde_json::from_str("[41.88, -87.63]").unwrap();
        assert_eq!(point, GeoPoint::new(41.88, -87.63));
    }

    #[test]
    fn rejects_short_pair() {
        assert!(serde_json::from_str::<GeoPoint>("[41.88]").is_err());
    }
}
