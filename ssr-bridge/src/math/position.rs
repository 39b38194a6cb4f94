use super::Orientation;
use glam::Vec3;
use std::fmt;

/// Position of a point in space, in meters.
///
/// The protocol only ever writes `x` and `y`; `z` is carried so that look
/// vectors and rotated positions keep their full magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point in the horizontal plane (`z = 0`).
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Length of the position vector.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Direction of the position vector as azimuth/elevation in degrees.
    pub fn orientation(&self) -> Orientation {
        let azimuth = self.y.atan2(self.x).to_degrees();
        let elevation = self
            .z
            .atan2((self.x * self.x + self.y * self.y).sqrt())
            .to_degrees();
        Orientation::new(azimuth, elevation)
    }

    /// Turn around the origin by `yaw` and `pitch` degrees, keeping the radius.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) -> &mut Self {
        let current = self.orientation();
        let phi = (current.azimuth + yaw).to_radians();
        let theta = (current.elevation + pitch).to_radians();
        let radius = self.length();
        *self = Self::new(
            radius * theta.cos() * phi.cos(),
            radius * theta.cos() * phi.sin(),
            radius * theta.sin(),
        );
        self
    }

    pub fn rotate_by(&mut self, rotation: &Orientation) -> &mut Self {
        self.rotate(rotation.azimuth, rotation.elevation)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn negated(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    pub fn add_assign(&mut self, other: Self) -> &mut Self {
        *self = self.add(other);
        self
    }

    pub fn subtract_assign(&mut self, other: Self) -> &mut Self {
        *self = self.subtract(other);
        self
    }

    /// Divide every component by a numeric scalar.
    pub fn divide<T: Into<f64>>(self, divisor: T) -> Self {
        let divisor = divisor.into();
        Self::new(
            (f64::from(self.x) / divisor) as f32,
            (f64::from(self.y) / divisor) as f32,
            (f64::from(self.z) / divisor) as f32,
        )
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Position> for Vec3 {
    fn from(p: Position) -> Self {
        p.to_vec3()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x = {}, y = {}, z = {}", self.x, self.y, self.z)
    }
}
