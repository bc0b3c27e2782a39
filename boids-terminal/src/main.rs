#![deny(clippy::all)]
#![forbid(unsafe_code)]

use boids::Flock;
use log::info;
use std::error::Error;
use terminal_main_support::{animate, random_from_env, AnimationConfig};

const WIDTH: u32 = 80;
const HEIGHT: u32 = 20;
const NUM_BOIDS: usize = 30;
const TIME_STEP_MILLIS: u64 = 80;
const NUM_STEPS: u64 = 200;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mut flock = Flock::new(WIDTH, HEIGHT, NUM_BOIDS, &mut random_from_env())?;
    info!("flying {} boids with {:?}", flock.boids().len(), flock.params());
    animate(
        &mut flock,
        AnimationConfig {
            step_millis: TIME_STEP_MILLIS,
            num_steps: NUM_STEPS,
        },
    )?;
    info!("stopped after {} ticks", flock.tick());
    Ok(())
}
