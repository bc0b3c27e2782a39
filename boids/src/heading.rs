use glam::DVec2;
use std::f64::consts::FRAC_PI_4;

/// Direction of travel in screen coordinates, where `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
}

// Indexed by octant, counting 45 degree turns from +x toward +y.
const HEADINGS: [Heading; 8] = [
    Heading::East,
    Heading::SouthEast,
    Heading::South,
    Heading::SouthWest,
    Heading::West,
    Heading::NorthWest,
    Heading::North,
    Heading::NorthEast,
];

const GLYPHS: [char; 8] = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];

impl Heading {
    /// Nearest of the eight compass headings. A stationary agent faces east.
    pub fn from_velocity(velocity: DVec2) -> Self {
        if velocity == DVec2::ZERO {
            return Heading::East;
        }
        let octant = (velocity.y.atan2(velocity.x) / FRAC_PI_4).round() as i64;
        HEADINGS[octant.rem_euclid(8) as usize]
    }

    pub fn glyph(self) -> char {
        GLYPHS[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_velocities() {
        let cases = [
            ((1.0, 0.0), Heading::East, '→'),
            ((1.0, 1.0), Heading::SouthEast, '↘'),
            ((0.0, 1.0), Heading::South, '↓'),
            ((-1.0, 1.0), Heading::SouthWest, '↙'),
            ((-1.0, 0.0), Heading::West, '←'),
            ((-1.0, -1.0), Heading::NorthWest, '↖'),
            ((0.0, -1.0), Heading::North, '↑'),
            ((1.0, -1.0), Heading::NorthEast, '↗'),
        ];
        for ((x, y), heading, glyph) in cases {
            assert_eq!(Heading::from_velocity(DVec2::new(x, y)), heading);
            assert_eq!(heading.glyph(), glyph);
        }
    }

    #[test]
    fn rounds_to_nearest_octant() {
        assert_eq!(Heading::from_velocity(DVec2::new(2.0, 0.3)), Heading::East);
        assert_eq!(Heading::from_velocity(DVec2::new(0.3, 2.0)), Heading::South);
        assert_eq!(Heading::from_velocity(DVec2::new(-2.0, -0.01)), Heading::West);
    }

    #[test]
    fn stationary_faces_east() {
        assert_eq!(Heading::from_velocity(DVec2::ZERO), Heading::East);
    }
}
