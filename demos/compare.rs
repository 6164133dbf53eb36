use delivery_grid::run::run_static;
use delivery_grid::{EngineConfig, GridModel, Strategy};
use std::env;
use std::error::Error;

// Runs every strategy on the same map and prints one record per strategy.
//
//     cargo run --example compare -- maps/small.map

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let map = env::args()
        .nth(1)
        .unwrap_or_else(|| "maps/small.map".to_owned());
    let grid = GridModel::load(&map)?;
    let config = EngineConfig {
        seed: Some(0),
        ..Default::default()
    };
    let mut rng = config.rng();
    for strategy in Strategy::ALL {
        println!("{}", run_static(&grid, &map, strategy, &config, &mut rng));
    }
    Ok(())
}
