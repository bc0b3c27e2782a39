#![deny(clippy::all)]
#![forbid(unsafe_code)]

use crossterm::{
    cursor, queue,
    terminal::{self, ClearType},
};
use log::{info, warn};
use std::env;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use world_grid::{Random, World};

pub const SEED_VAR: &str = "SIM_SEED";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationConfig {
    pub step_millis: u64,
    pub num_steps: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_millis: 100,
            num_steps: 200,
        }
    }
}

pub fn animate<W>(world: &mut W, config: AnimationConfig) -> io::Result<()>
where
    W: World,
{
    let stdout = io::stdout();
    animate_to(stdout.lock(), world, config)
}

/// Draws a frame, then advances the world, `config.num_steps` times.
pub fn animate_to<W, O>(out: O, world: &mut W, config: AnimationConfig) -> io::Result<()>
where
    W: World,
    O: Write,
{
    let mut app = App::new(world, out, config);
    for _ in 0..config.num_steps {
        app.on_redraw()?;
        app.on_time_step();
    }
    Ok(())
}

struct App<'a, W: World, O: Write> {
    world: &'a mut W,
    out: O,
    time_step: Duration,
    next_update: Instant,
}

impl<'a, W: World, O: Write> App<'a, W, O> {
    fn new(world: &'a mut W, out: O, config: AnimationConfig) -> Self {
        Self {
            world,
            out,
            time_step: Duration::from_millis(config.step_millis),
            next_update: Instant::now(),
        }
    }

    fn on_redraw(&mut self) -> io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        writeln!(self.out, "{}", self.world.render_text())?;
        self.out.flush()
    }

    fn on_time_step(&mut self) {
        self.world.update();

        self.next_update += self.time_step;
        let now = Instant::now();
        if self.next_update > now {
            thread::sleep(self.next_update - now);
        } else {
            self.next_update = now;
        }
    }
}

/// Seeded from `SIM_SEED` when it holds a `u64`, otherwise from the OS.
pub fn random_from_env() -> Random {
    match env::var(SEED_VAR) {
        Ok(value) => match parse_seed(&value) {
            Some(seed) => {
                info!("using seed {seed}");
                Random::with_seed(seed)
            }
            None => {
                warn!("ignoring {SEED_VAR}={value:?}, not a u64");
                Random::new()
            }
        },
        Err(_) => Random::new(),
    }
}

fn parse_seed(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR_AND_HOME: &str = "\x1b[2J\x1b[1;1H";

    #[derive(Default)]
    struct Counter {
        updates: u32,
    }

    impl World for Counter {
        fn width(&self) -> u32 {
            1
        }

        fn height(&self) -> u32 {
            2
        }

        fn update(&mut self) {
            self.updates += 1;
        }

        fn render(&self) -> impl Iterator<Item = String> + Clone {
            let updates = self.updates;
            (0..2).map(move |row| (updates + row).to_string())
        }
    }

    #[test]
    fn draws_then_updates_each_step() {
        let mut counter = Counter::default();
        let mut out = Vec::new();
        let config = AnimationConfig {
            step_millis: 0,
            num_steps: 3,
        };

        animate_to(&mut out, &mut counter, config).unwrap();

        assert_eq!(counter.updates, 3);
        let text = String::from_utf8(out).unwrap();
        let expected = format!("{CLEAR_AND_HOME}0\n1\n{CLEAR_AND_HOME}1\n2\n{CLEAR_AND_HOME}2\n3\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn zero_steps_draws_nothing() {
        let mut counter = Counter::default();
        let mut out = Vec::new();
        let config = AnimationConfig {
            step_millis: 0,
            num_steps: 0,
        };
        animate_to(&mut out, &mut counter, config).unwrap();
        assert!(out.is_empty());
        assert_eq!(counter.updates, 0);
    }

    #[test]
    fn parses_seeds() {
        assert_eq!(parse_seed("42"), Some(42));
        assert_eq!(parse_seed(" 7\n"), Some(7));
        assert_eq!(parse_seed("-1"), None);
        assert_eq!(parse_seed("seed"), None);
    }
}
