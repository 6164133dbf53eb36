//! Best-first search core shared by uniform-cost search and A*. Nodes are finalized on their
//! first pop; cheaper routes found later are pushed as new heap entries and stale ones are
//! dropped on pop instead of being decreased in place.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimate first; among equal estimates the deeper node wins
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.cmp(&other.cost),
            s => s,
        }
    }
}

#[derive(Clone, Copy)]
struct Visit<C> {
    parent: usize,
    cost: C,
    closed: bool,
}

/// Outcome of [best_first]: the path and its cost if the goal was reached, and the number of
/// nodes finalized either way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestFirstResult<N, C> {
    pub solution: Option<(Vec<N>, C)>,
    pub expanded: usize,
}

fn reverse_path<N: Clone, C>(parents: &FxIndexMap<N, Visit<C>>, goal_index: usize) -> Vec<N> {
    let mut path = Vec::new();
    let mut i = goal_index;
    // The start is stored with parent usize::MAX, which ends the walk.
    while let Some((node, visit)) = parents.get_index(i) {
        path.push(node.clone());
        i = visit.parent;
    }
    path.reverse();
    path
}

pub fn best_first<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> BestFirstResult<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: heuristic(start),
        cost: Zero::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, Visit<C>> = FxIndexMap::default();
    parents.insert(
        start.clone(),
        Visit {
            parent: usize::MAX,
            cost: Zero::zero(),
            closed: false,
        },
    );
    let mut expanded = 0;
    while let Some(SmallestCostHolder { index, .. }) = to_see.pop() {
        let (node, visit) = match parents.get_index_mut(index) {
            Some((node, visit)) => {
                if visit.closed {
                    continue;
                }
                visit.closed = true;
                (node.clone(), *visit)
            }
            None => continue,
        };
        expanded += 1;
        if success(&node) {
            let path = reverse_path(&parents, index);
            return BestFirstResult {
                solution: Some((path, visit.cost)),
                expanded,
            };
        }
        for (successor, move_cost) in successors(&node) {
            let new_cost = visit.cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert(Visit {
                        parent: index,
                        cost: new_cost,
                        closed: false,
                    });
                }
                Occupied(mut e) => {
                    if !e.get().closed && e.get().cost > new_cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert(Visit {
                            parent: index,
                            cost: new_cost,
                            closed: false,
                        });
                    } else {
                        continue;
                    }
                }
            }

            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: n,
            });
        }
    }
    debug!("Frontier exhausted after {} expansions", expanded);
    BestFirstResult {
        solution: None,
        expanded,
    }
}
