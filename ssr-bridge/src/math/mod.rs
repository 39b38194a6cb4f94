//! Geometry kernel: positions, orientations and the angles between them.
//!
//! All angle functions return radians in `[0, π]`. They are never negative,
//! even when the second direction lies at a larger azimuth than the first.

mod orientation;
mod position;

pub use glam::Vec3;
pub use orientation::Orientation;
pub use position::Position;

/// Angle between two orientations, from the normalized dot product of their
/// look vectors.
pub fn angle(a: &Orientation, b: &Orientation) -> f32 {
    angle_between_positions(&a.look_vector(), &b.look_vector())
}

/// Angle between the position vectors of `a` and `b`.
pub fn angle_between_positions(a: &Position, b: &Position) -> f32 {
    (a.dot(b) / (a.length() * b.length())).acos()
}

/// Angle between the position vector of `point` and the look vector of
/// `orientation`.
pub fn angle_to_orientation(point: &Position, orientation: &Orientation) -> f32 {
    angle_between_positions(point, &orientation.look_vector())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_between_orientations() {
        let front = Orientation::default();
        assert_eq!(angle(&front, &front), 0.0);
        assert!((angle(&front, &Orientation::new(90.0, 0.0)) - FRAC_PI_2).abs() < 1e-5);
        assert!((angle(&front, &Orientation::new(180.0, 0.0)) - PI).abs() < 1e-3);
    }

    #[test]
    fn test_angle_is_never_negative() {
        let a = Orientation::new(10.0, 0.0);
        let b = Orientation::new(80.0, 0.0);
        let forward = angle(&a, &b);
        let backward = angle(&b, &a);
        assert!(forward > 0.0);
        assert!((forward - backward).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_positions_ignores_length() {
        let a = Position::from_xy(5.0, 0.0);
        let b = Position::from_xy(0.0, 0.1);
        assert!((angle_between_positions(&a, &b) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_angle_to_orientation() {
        let point = Position::from_xy(0.0, -3.0);
        let facing = Orientation::from_azimuth(-90.0);
        assert!(angle_to_orientation(&point, &facing) < 1e-3);
    }
}
