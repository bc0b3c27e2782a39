use crate::Heading;
use glam::DVec2;
use world_grid::{ConfigError, Random};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlockParams {
    pub max_speed: f64,
    pub max_force: f64,
    pub desired_separation: f64,
    pub neighbor_distance: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            max_speed: 2.0,
            max_force: 0.05,
            desired_separation: 3.0,
            neighbor_distance: 10.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
        }
    }
}

impl FlockParams {
    /// Limits and distances must be positive, weights non-negative, and all finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("desired_separation", self.desired_separation),
            ("neighbor_distance", self.neighbor_distance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    requirement: "positive and finite",
                    value,
                });
            }
        }

        let weights = [
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
        ];
        for (name, value) in weights {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    requirement: "non-negative and finite",
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boid {
    pub position: DVec2,
    pub velocity: DVec2,
    pub acceleration: DVec2,
}

impl Boid {
    pub fn new(position: DVec2, velocity: DVec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: DVec2::ZERO,
        }
    }

    pub(crate) fn random(width: f64, height: f64, rand: &mut Random) -> Self {
        let position = DVec2::new(
            rand.next_in_range(0.0..width),
            rand.next_in_range(0.0..height),
        );
        let velocity = DVec2::new(
            rand.next_in_range(-1.0..1.0),
            rand.next_in_range(-1.0..1.0),
        );
        Self::new(position, velocity)
    }

    pub fn apply_force(&mut self, force: DVec2) {
        self.acceleration += force;
    }

    /// Moves one tick on a `width` x `height` torus and clears the accumulated force.
    pub fn integrate(&mut self, width: f64, height: f64, max_speed: f64) {
        self.velocity = (self.velocity + self.acceleration).clamp_length_max(max_speed);
        self.position += self.velocity;
        self.acceleration = DVec2::ZERO;
        self.position = DVec2::new(
            wrap(self.position.x, width),
            wrap(self.position.y, height),
        );
    }

    pub fn heading(&self) -> Heading {
        Heading::from_velocity(self.velocity)
    }
}

/// Maps `value` into `[0, extent)`.
pub fn wrap(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid rounds tiny negatives up to `extent` itself.
    if wrapped >= extent { 0.0 } else { wrapped }
}
