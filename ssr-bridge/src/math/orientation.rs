use super::Position;
use std::fmt;

/// Orientation as azimuth (yaw) and elevation (pitch), in degrees.
///
/// The default orientation faces the negative y-direction (towards the
/// listener). Angles are stored as given: rotating never wraps them into a
/// canonical range, so turning by 360 degrees yields an azimuth of 360.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub azimuth: f32,
    pub elevation: f32,
}

impl Orientation {
    pub fn new(azimuth: f32, elevation: f32) -> Self {
        Self { azimuth, elevation }
    }

    pub fn from_azimuth(azimuth: f32) -> Self {
        Self {
            azimuth,
            elevation: 0.0,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.azimuth + other.azimuth, self.elevation + other.elevation)
    }

    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.azimuth - other.azimuth, self.elevation - other.elevation)
    }

    pub fn add_assign(&mut self, other: Self) -> &mut Self {
        *self = self.add(other);
        self
    }

    pub fn subtract_assign(&mut self, other: Self) -> &mut Self {
        *self = self.subtract(other);
        self
    }

    pub fn divide<T: Into<f64>>(self, divisor: T) -> Self {
        let divisor = divisor.into();
        Self::new(
            (f64::from(self.azimuth) / divisor) as f32,
            (f64::from(self.elevation) / divisor) as f32,
        )
    }

    /// Unit-length look vector `(cos θ cos φ, cos θ sin φ, sin θ)`.
    pub fn look_vector(&self) -> Position {
        let phi = self.azimuth.to_radians();
        let theta = self.elevation.to_radians();
        Position::new(
            theta.cos() * phi.cos(),
            theta.cos() * phi.sin(),
            theta.sin(),
        )
    }

    /// Turn by `yaw` and `pitch` degrees (plain addition).
    pub fn rotate(&mut self, yaw: f32, pitch: f32) -> &mut Self {
        self.azimuth += yaw;
        self.elevation += pitch;
        self
    }

    pub fn rotate_by(&mut self, rotation: &Orientation) -> &mut Self {
        self.rotate(rotation.azimuth, rotation.elevation)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "azimuth = {}, elevation = {}",
            self.azimuth, self.elevation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_is_not_normalized() {
        let mut o = Orientation::default();
        o.rotate(360.0, 0.0);
        assert_eq!(o.azimuth, 360.0);

        o.rotate(360.0, -45.0).rotate(10.0, 0.0);
        assert_eq!(o, Orientation::new(730.0, -45.0));
    }

    #[test]
    fn test_rotate_by_orientation() {
        let mut o = Orientation::new(10.0, 5.0);
        o.rotate_by(&Orientation::new(-20.0, 5.0));
        assert_eq!(o, Orientation::new(-10.0, 10.0));
    }

    #[test]
    fn test_component_wise_arithmetic() {
        let a = Orientation::new(90.0, 10.0);
        let b = Orientation::new(30.0, 20.0);
        assert_eq!(a.add(b), Orientation::new(120.0, 30.0));
        assert_eq!(a.subtract(b), Orientation::new(60.0, -10.0));
        assert_eq!(a.divide(2u8), Orientation::new(45.0, 5.0));

        let mut c = a;
        c.add_assign(b).subtract_assign(a);
        assert_eq!(c, b);
    }

    #[test]
    fn test_look_vector_is_unit_length() {
        let forward = Orientation::default().look_vector();
        assert_eq!(forward, Position::new(1.0, 0.0, 0.0));

        let v = Orientation::new(123.0, -33.0).look_vector();
        assert!((v.length() - 1.0).abs() < 1e-6);

        let up = Orientation::new(0.0, 90.0).look_vector();
        assert!((up.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Orientation::new(45.0, -5.5).to_string(),
            "azimuth = 45, elevation = -5.5"
        );
    }
}
