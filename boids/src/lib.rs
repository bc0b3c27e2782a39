#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Boids flocking on a toroidal plane.
//!
//! Every tick each agent steers by three rules computed from the flock as it stood at the
//! start of the tick: separation from agents that are too close, alignment with the
//! average heading of nearby agents, and cohesion toward their average position. Each raw
//! steering vector is limited to `max_force` and weighted before it is added to the
//! agent's acceleration.

mod boid;
mod heading;

pub use boid::{wrap, Boid, FlockParams};
pub use heading::Heading;
pub use glam::DVec2;
pub use world_grid::{ConfigError, Random, World};

use log::{debug, trace};

pub const EMPTY_GLYPH: char = ' ';

#[derive(Clone, Debug)]
pub struct Flock {
    width: u32,
    height: u32,
    boids: Vec<Boid>,
    params: FlockParams,
    tick: u64,
}

impl Flock {
    pub fn new(
        width: u32,
        height: u32,
        count: usize,
        rand: &mut Random,
    ) -> Result<Self, ConfigError> {
        Self::with_params(width, height, count, FlockParams::default(), rand)
    }

    pub fn with_params(
        width: u32,
        height: u32,
        count: usize,
        params: FlockParams,
        rand: &mut Random,
    ) -> Result<Self, ConfigError> {
        ConfigError::check_dimensions(width, height)?;
        params.validate()?;
        let boids = (0..count)
            .map(|_| Boid::random(width as f64, height as f64, rand))
            .collect();
        debug!("created flock of {count} on a {width}x{height} plane");
        Ok(Self {
            width,
            height,
            boids,
            params,
            tick: 0,
        })
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn update(&mut self) {
        let forces: Vec<DVec2> = (0..self.boids.len())
            .map(|index| self.flocking_force(index))
            .collect();

        let (width, height) = (self.width as f64, self.height as f64);
        for (boid, force) in self.boids.iter_mut().zip(forces) {
            boid.apply_force(force);
            boid.integrate(width, height, self.params.max_speed);
        }
        self.tick += 1;
        trace!("flock tick {}", self.tick);
    }

    fn flocking_force(&self, index: usize) -> DVec2 {
        let params = &self.params;
        let separation = self.separation(index).clamp_length_max(params.max_force);
        let alignment = self.alignment(index).clamp_length_max(params.max_force);
        let cohesion = self.cohesion(index).clamp_length_max(params.max_force);
        separation * params.separation_weight
            + alignment * params.alignment_weight
            + cohesion * params.cohesion_weight
    }

    /// Every other boid paired with its distance from the boid at `index`.
    fn others(&self, index: usize) -> impl Iterator<Item = (&Boid, f64)> + Clone {
        let position = self.boids[index].position;
        self.boids
            .iter()
            .enumerate()
            .filter(move |&(other_index, _)| other_index != index)
            .map(move |(_, other)| (other, position.distance(other.position)))
    }

    fn neighbors(&self, index: usize) -> impl Iterator<Item = &Boid> + Clone {
        let neighbor_distance = self.params.neighbor_distance;
        self.others(index)
            .filter(move |&(_, distance)| distance < neighbor_distance)
            .map(|(other, _)| other)
    }

    /// Average of unit vectors pointing away from each too-close boid, each divided by its
    /// distance. Coincident boids are ignored.
    pub fn separation(&self, index: usize) -> DVec2 {
        let position = self.boids[index].position;
        let desired_separation = self.params.desired_separation;
        let mut steer = DVec2::ZERO;
        let mut count = 0;
        for (other, distance) in self.others(index) {
            if distance > 0.0 && distance < desired_separation {
                steer += (position - other.position).normalize_or_zero() / distance;
                count += 1;
            }
        }
        if count > 0 {
            steer / count as f64
        } else {
            steer
        }
    }

    /// Steering toward the average velocity of neighbors, at full speed.
    pub fn alignment(&self, index: usize) -> DVec2 {
        let boid = &self.boids[index];
        match average(self.neighbors(index).map(|other| other.velocity)) {
            Some(mean) if mean != DVec2::ZERO => {
                mean.normalize_or_zero() * self.params.max_speed - boid.velocity
            }
            _ => DVec2::ZERO,
        }
    }

    /// Seeking the average position of neighbors.
    pub fn cohesion(&self, index: usize) -> DVec2 {
        average(self.neighbors(index).map(|other| other.position))
            .map_or(DVec2::ZERO, |center| self.seek(&self.boids[index], center))
    }

    /// The change in velocity that would send `boid` toward `target` at full speed,
    /// limited to `max_force`.
    pub fn seek(&self, boid: &Boid, target: DVec2) -> DVec2 {
        let offset = target - boid.position;
        if offset == DVec2::ZERO {
            return DVec2::ZERO;
        }
        let desired = offset.normalize_or_zero() * self.params.max_speed;
        (desired - boid.velocity).clamp_length_max(self.params.max_force)
    }

    fn render_row(&self, row: u32) -> String {
        let mut glyphs = vec![EMPTY_GLYPH; self.width as usize];
        for boid in &self.boids {
            if let Some((boid_row, col)) = self.cell_of(boid)
                && boid_row == row
            {
                glyphs[col as usize] = boid.heading().glyph();
            }
        }
        glyphs.into_iter().collect()
    }

    /// The `(row, col)` a boid is drawn at.
    fn cell_of(&self, boid: &Boid) -> Option<(u32, u32)> {
        let col = boid.position.x.floor();
        let row = boid.position.y.floor();
        if (0.0..self.width as f64).contains(&col) && (0.0..self.height as f64).contains(&row) {
            Some((row as u32, col as u32))
        } else {
            None
        }
    }

    #[cfg(test)]
    fn from_boids(width: u32, height: u32, boids: Vec<Boid>) -> Self {
        Self {
            width,
            height,
            boids,
            params: FlockParams::default(),
            tick: 0,
        }
    }
}

fn average<I>(vectors: I) -> Option<DVec2>
where
    I: Iterator<Item = DVec2> + Clone,
{
    let count = vectors.clone().count();
    (count > 0).then(|| vectors.sum::<DVec2>() / count as f64)
}

impl World for Flock {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn update(&mut self) {
        Flock::update(self);
    }

    /// Later boids overwrite earlier ones that land on the same cell.
    fn render(&self) -> impl Iterator<Item = String> + Clone {
        (0..self.height).map(move |row| self.render_row(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn boid_at(x: f64, y: f64) -> Boid {
        Boid::new(DVec2::new(x, y), DVec2::ZERO)
    }

    fn assert_close(actual: DVec2, expected: DVec2) {
        assert!(
            actual.distance(expected) < EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn rejects_empty_plane() {
        let mut rand = Random::with_seed(1);
        assert_eq!(
            Flock::new(0, 10, 5, &mut rand).unwrap_err(),
            ConfigError::InvalidDimensions { width: 0, height: 10 }
        );
        assert!(Flock::new(10, 0, 5, &mut rand).is_err());
    }

    #[test]
    fn rejects_invalid_params() {
        let params = FlockParams {
            max_force: -1.0,
            ..FlockParams::default()
        };
        let result = Flock::with_params(10, 10, 5, params, &mut Random::with_seed(1));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "max_force", .. })
        ));
    }

    #[test]
    fn empty_flock_renders_blank_grid() {
        let mut flock = Flock::new(6, 3, 0, &mut Random::with_seed(1)).unwrap();
        assert_eq!(flock.render_text(), "      \n      \n      ");
        flock.update();
        assert_eq!(flock.render().count(), 3);
        assert!(flock.render().all(|row| row == "      "));
        assert_eq!(flock.tick(), 1);
    }

    #[test]
    fn creates_requested_number_of_boids() {
        let flock = Flock::new(40, 20, 25, &mut Random::with_seed(3)).unwrap();
        assert_eq!(flock.boids().len(), 25);
        assert_eq!(flock.params(), &FlockParams::default());
        for boid in flock.boids() {
            assert!((0.0..40.0).contains(&boid.position.x));
            assert!((0.0..20.0).contains(&boid.position.y));
        }
    }

    #[test]
    fn seek_limits_large_steering() {
        let flock = Flock::from_boids(50, 50, vec![]);
        let steer = flock.seek(&boid_at(10.0, 10.0), DVec2::new(40.0, 10.0));
        assert!((steer.length() - flock.params().max_force).abs() < EPSILON);
        assert_close(steer, DVec2::new(0.05, 0.0));
    }

    #[test]
    fn seek_keeps_small_steering() {
        let flock = Flock::from_boids(50, 50, vec![]);
        let boid = Boid::new(DVec2::new(10.0, 10.0), DVec2::new(1.99, 0.0));
        let steer = flock.seek(&boid, DVec2::new(40.0, 10.0));
        assert_close(steer, DVec2::new(0.01, 0.0));
    }

    #[test]
    fn seek_own_position_is_zero() {
        let flock = Flock::from_boids(50, 50, vec![]);
        let boid = Boid::new(DVec2::new(10.0, 10.0), DVec2::new(1.0, 1.0));
        assert_eq!(flock.seek(&boid, boid.position), DVec2::ZERO);
    }

    #[test]
    fn separation_points_away_scaled_by_inverse_distance() {
        let flock = Flock::from_boids(50, 50, vec![boid_at(10.0, 10.0), boid_at(12.0, 10.0)]);
        assert_close(flock.separation(0), DVec2::new(-0.5, 0.0));
        assert_close(flock.separation(1), DVec2::new(0.5, 0.0));
    }

    #[test]
    fn separation_averages_over_close_boids() {
        let flock = Flock::from_boids(
            50,
            50,
            vec![boid_at(10.0, 10.0), boid_at(11.0, 10.0), boid_at(10.0, 12.0)],
        );
        // (-1, 0) / 1 and (0, -1) / 2, averaged.
        assert_close(flock.separation(0), DVec2::new(-0.5, -0.25));
    }

    #[test]
    fn separation_ignores_distant_and_coincident_boids() {
        let flock = Flock::from_boids(
            50,
            50,
            vec![boid_at(10.0, 10.0), boid_at(10.0, 10.0), boid_at(13.5, 10.0)],
        );
        assert_eq!(flock.separation(0), DVec2::ZERO);
    }

    #[test]
    fn alignment_steers_toward_average_heading() {
        let mut neighbor = boid_at(15.0, 10.0);
        neighbor.velocity = DVec2::new(0.0, 0.5);
        let flock = Flock::from_boids(50, 50, vec![boid_at(10.0, 10.0), neighbor]);
        assert_close(flock.alignment(0), DVec2::new(0.0, 2.0));
    }

    #[test]
    fn alignment_subtracts_own_velocity() {
        let mut boid = boid_at(10.0, 10.0);
        boid.velocity = DVec2::new(1.0, 0.0);
        let mut neighbor = boid_at(12.0, 10.0);
        neighbor.velocity = DVec2::new(-1.0, 0.0);
        let flock = Flock::from_boids(50, 50, vec![boid, neighbor]);
        assert_close(flock.alignment(0), DVec2::new(-3.0, 0.0));
    }

    #[test]
    fn flocking_force_limits_alignment() {
        let mut boid = boid_at(10.0, 10.0);
        boid.velocity = DVec2::new(1.0, 0.0);
        let mut neighbor = boid_at(10.0, 15.0);
        neighbor.velocity = DVec2::new(-1.0, 0.0);
        let flock = Flock::from_boids(50, 50, vec![boid, neighbor]);

        // Too far apart to separate, so only alignment and cohesion remain.
        assert_eq!(flock.separation(0), DVec2::ZERO);
        assert!((flock.alignment(0).length() - 3.0).abs() < EPSILON);
        let cohesion = flock.cohesion(0);
        assert!(cohesion.length() <= flock.params().max_force + EPSILON);
        assert_close(flock.flocking_force(0) - cohesion, DVec2::new(-0.05, 0.0));
    }

    #[test]
    fn lonely_boid_feels_no_force() {
        let flock = Flock::from_boids(50, 50, vec![boid_at(5.0, 5.0), boid_at(30.0, 30.0)]);
        assert_eq!(flock.separation(0), DVec2::ZERO);
        assert_eq!(flock.alignment(0), DVec2::ZERO);
        assert_eq!(flock.cohesion(0), DVec2::ZERO);
    }

    #[test]
    fn cohesion_seeks_neighbor_center() {
        let flock = Flock::from_boids(
            50,
            50,
            vec![boid_at(10.0, 10.0), boid_at(16.0, 8.0), boid_at(16.0, 12.0)],
        );
        assert_close(flock.cohesion(0), DVec2::new(0.05, 0.0));
    }

    #[test]
    fn forces_add_up_with_weights() {
        let flock = Flock::from_boids(50, 50, vec![boid_at(4.0, 5.0), boid_at(6.0, 5.0)]);
        // Separation (-0.05 after limiting) * 1.5 plus cohesion 0.05.
        assert_close(flock.flocking_force(0), DVec2::new(-0.025, 0.0));
    }

    #[test]
    fn update_uses_start_of_tick_positions() {
        let mut flock = Flock::from_boids(20, 20, vec![boid_at(4.0, 5.0), boid_at(6.0, 5.0)]);
        flock.update();
        let [a, b] = [flock.boids()[0], flock.boids()[1]];
        assert!((a.position.x + b.position.x - 10.0).abs() < EPSILON);
        assert!((a.position.x - 3.975).abs() < EPSILON);
        assert_eq!(a.acceleration, DVec2::ZERO);
        assert_eq!(b.acceleration, DVec2::ZERO);
    }

    #[test]
    fn render_stamps_heading_glyphs() {
        let mut east = boid_at(2.7, 1.2);
        east.velocity = DVec2::new(1.0, 0.0);
        let mut north = boid_at(0.1, 0.9);
        north.velocity = DVec2::new(0.0, -1.5);
        let flock = Flock::from_boids(4, 2, vec![east, north]);
        assert_eq!(flock.render_text(), "↑   \n  → ");
    }

    #[test]
    fn last_boid_wins_shared_cell() {
        let mut first = boid_at(1.2, 0.3);
        first.velocity = DVec2::new(-1.0, 0.0);
        let mut second = boid_at(1.8, 0.6);
        second.velocity = DVec2::new(0.0, 1.0);
        let flock = Flock::from_boids(3, 1, vec![first, second]);
        assert_eq!(flock.render_text(), " ↓ ");
    }

    #[test]
    fn render_is_restartable() {
        let flock = Flock::new(30, 10, 12, &mut Random::with_seed(8)).unwrap();
        let rendering = flock.render();
        let first: Vec<String> = rendering.clone().collect();
        let second: Vec<String> = rendering.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
        assert!(first.iter().all(|row| row.chars().count() == 30));
    }

    #[test]
    fn same_seed_same_flight() {
        let mut a = Flock::new(40, 20, 15, &mut Random::with_seed(21)).unwrap();
        let mut b = Flock::new(40, 20, 15, &mut Random::with_seed(21)).unwrap();
        for _ in 0..25 {
            a.update();
            b.update();
        }
        assert_eq!(a.boids(), b.boids());
    }

    proptest! {
        #[test]
        fn speed_and_position_stay_bounded(
            seed in any::<u64>(),
            count in 0usize..30,
            ticks in 0usize..50,
        ) {
            let mut flock = Flock::new(24, 12, count, &mut Random::with_seed(seed)).unwrap();
            for _ in 0..ticks {
                flock.update();
            }
            for boid in flock.boids() {
                prop_assert!(boid.velocity.length() <= flock.params().max_speed + EPSILON);
                prop_assert!((0.0..24.0).contains(&boid.position.x));
                prop_assert!((0.0..12.0).contains(&boid.position.y));
            }
        }

        #[test]
        fn limited_force_never_exceeds_max(
            x in -100.0f64..100.0,
            y in -100.0f64..100.0,
            vx in -2.0f64..2.0,
            vy in -2.0f64..2.0,
        ) {
            let flock = Flock::from_boids(50, 50, vec![]);
            let boid = Boid::new(DVec2::new(0.0, 0.0), DVec2::new(vx, vy));
            let steer = flock.seek(&boid, DVec2::new(x, y));
            prop_assert!(steer.length() <= flock.params().max_force + EPSILON);
        }
    }
}
