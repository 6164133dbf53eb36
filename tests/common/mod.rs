#![allow(dead_code)]

use delivery_grid::{Coord, Cost, GridModel};
use rand::prelude::*;

/// An `n` x `n` grid with roughly `density` of its cells blocked and random costs 1..=9
/// elsewhere. The corners (0, 0) and (n - 1, n - 1) are start and goal and always free.
pub fn random_grid(n: usize, rng: &mut StdRng, density: f64) -> GridModel {
    let mut costs = (0..n * n)
        .map(|_| {
            if rng.gen_bool(density) {
                Cost::Blocked
            } else {
                Cost::Finite(rng.gen_range(1..=9))
            }
        })
        .collect::<Vec<Cost>>();
    costs[0] = Cost::Finite(1);
    costs[n * n - 1] = Cost::Finite(1);
    let goal = Coord::new(n as i32 - 1, n as i32 - 1);
    GridModel::new(n, n, costs, Coord::new(0, 0), goal).unwrap()
}

/// The same obstacles with every free cell costing 1.
pub fn unit_cost_copy(grid: &GridModel) -> GridModel {
    let costs = (0..grid.rows() as i32)
        .flat_map(|row| (0..grid.cols() as i32).map(move |col| Coord::new(row, col)))
        .map(|c| match grid.cost(&c) {
            Cost::Blocked => Cost::Blocked,
            Cost::Finite(_) => Cost::Finite(1),
        })
        .collect();
    GridModel::new(grid.rows(), grid.cols(), costs, grid.start(), grid.goal()).unwrap()
}

pub fn visualize_grid(grid: &GridModel) {
    for row in 0..grid.rows() as i32 {
        for col in 0..grid.cols() as i32 {
            let p = Coord::new(row, col);
            if grid.start() == p {
                print!("S");
            } else if grid.goal() == p {
                print!("G");
            } else {
                match grid.cost(&p) {
                    Cost::Blocked => print!("#"),
                    Cost::Finite(c) => print!("{c}"),
                }
            }
        }
        println!();
    }
}
