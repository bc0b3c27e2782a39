#![deny(clippy::all)]
#![forbid(unsafe_code)]

use conway_life::{ConwayWorld, Pattern};
use log::info;
use std::error::Error;
use terminal_main_support::{animate, random_from_env, AnimationConfig};

const WIDTH: u32 = 80;
const HEIGHT: u32 = 20;
const TIME_STEP_MILLIS: u64 = 100;
const NUM_STEPS: u64 = 150;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mut rand = random_from_env();
    let pattern = rand.choose(&Pattern::ALL).copied().unwrap_or(Pattern::Random);
    info!("starting life with pattern {pattern}");

    let mut world = ConwayWorld::new(WIDTH, HEIGHT, rand)?;
    world.load(pattern);
    animate(
        &mut world,
        AnimationConfig {
            step_millis: TIME_STEP_MILLIS,
            num_steps: NUM_STEPS,
        },
    )?;
    info!(
        "stopped after {} generations with {} live cells",
        world.generation(),
        world.live_cell_count()
    );
    Ok(())
}
