use delivery_grid::agent::LogSink;
use delivery_grid::run::{run_dynamic, run_static};
use delivery_grid::{EngineConfig, GridModel, Strategy};
use std::env;
use std::error::Error;

// Plans a route on a map file and then drives the replanning agent along it.
//
//     cargo run --example deliver -- maps/small.map a_star maps/demo.toml
//
// The optional third argument is an engine config whose [[obstacles]] entries become the
// transient obstacle table. Set RUST_LOG=debug to see every move.

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let map = args.next().unwrap_or_else(|| "maps/small.map".to_owned());
    let strategy: Strategy = args.next().as_deref().unwrap_or("a_star").parse()?;
    let config = match args.next() {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let grid = GridModel::load(&map)?.with_transient_obstacles(config.obstacle_schedule());
    println!("{}", grid);
    println!("Start: {}  Goal: {}", grid.start(), grid.goal());

    let mut rng = config.rng();
    let record = run_static(&grid, &map, strategy, &config, &mut rng);
    println!("{}", record);
    if let Some(path) = &record.path {
        println!("Path:");
        for p in path.iter() {
            println!("{}", p);
        }
    }

    let record = run_dynamic(&grid, &map, strategy, &config, config.rng(), LogSink);
    println!("{}", record);
    Ok(())
}
