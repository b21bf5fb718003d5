/// Sphere radius used for great-circle distances. Kept as the fixed value the
/// distance fixtures were produced with; it is not the mean Earth radius.
pub const SPHERE_RADIUS: f64 = 6335.439;

/// A point in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Great-circle distance using the spherical law of cosines.
    /// Input lat/lon in degrees. Output in units of [`SPHERE_RADIUS`].
    pub fn distance(&self, other: &Position) -> f64 {
        let (lat1, lon1, lat2, lon2) = (
            self.latitude.to_radians(),
            self.longitude.to_radians(),
            other.latitude.to_radians(),
            other.longitude.to_radians(),
        );
        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
        // Rounding can push identical points just above 1.0, where acos is NaN.
        let angle = cos_angle.clamp(-1.0, 1.0).acos();
        SPHERE_RADIUS * angle
    }
}

impl From<(f64, f64)> for Position {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        let p = Position::new(48.7758, 9.1829);
        assert_eq!(p.distance(&p), 0.0);
        let q = Position::new(-33.8688, 151.2093);
        assert_eq!(q.distance(&q), 0.0);
    }

    #[test]
    fn quarter_meridian() {
        // Equator to pole is a right angle.
        let equator = Position::new(0.0, 0.0);
        let pole = Position::new(90.0, 0.0);
        let expected = SPHERE_RADIUS * std::f64::consts::FRAC_PI_2;
        assert!((equator.distance(&pole) - expected).abs() < 1e-9);
    }

    #[test]
    fn symmetric() {
        let a = Position::new(48.7758, 9.1829);
        let b = Position::new(52.5200, 13.4050);
        assert!((a.distance(&b) - b.distance(&a)).abs() < 1e-9);
        // Stuttgart to Berlin is roughly 500 km on this sphere.
        let d = a.distance(&b);
        assert!(d > 480.0 && d < 520.0, "{d}");
    }
}
