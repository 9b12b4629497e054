use std::cmp::Ordering;
use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::{BinaryHeap, HashMap, HashSet};

use ndarray::prelude::*;
use rayon::prelude::*;

use super::road_network::RoadNetwork;


/// Minimal travel time between two locations, and the cost of driving that fastest path.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PathCost {
    pub time: f64,
    pub cost: f64,
}

/// Anything that can answer "how long, and how much, from here to there" on a road network.
pub trait ShortestPathOracle {
    fn from_network(network: &RoadNetwork) -> Self where Self: Sized;
    fn query(&self, origin: usize, destination: usize) -> Option<PathCost>;

    fn path_time(&self, origin: usize, destination: usize) -> Option<f64> {
        self.query(origin, destination).map(|pc| pc.time)
    }
}


/// All-pairs fastest paths, one Dijkstra search per origin.
#[derive(Debug, Clone)]
pub struct AllPairsPaths {
    // row and column ii hold location ii + 1.  Unreachable pairs are infinite.
    path_times: Array<f64, Ix2>,
    path_costs: Array<f64, Ix2>,
}

impl ShortestPathOracle for AllPairsPaths {
    fn from_network(network: &RoadNetwork) -> AllPairsPaths {
        let size = network.get_num_nodes();
        let mut path_times = Array::ones((size, size)) * f64::INFINITY;
        let mut path_costs = Array::ones((size, size)) * f64::INFINITY;
        let node_list = network.get_nodes();

        // run dijkstra in parallel
        let path_results: Vec<(usize, HashMap<usize, PathCost>)> = node_list.par_iter()
            .map(|nn| (*nn, dijkstra_with_costs(network, *nn))).collect();
        for (node, paths) in path_results {
            for (dest_node, pc) in paths {
                path_times[[node - 1, dest_node - 1]] = pc.time;
                path_costs[[node - 1, dest_node - 1]] = pc.cost;
            }
        }
        log::debug!("computed fastest paths between {} locations", size);

        AllPairsPaths {path_times, path_costs}
    }

    fn query(&self, origin: usize, destination: usize) -> Option<PathCost> {
        let size = self.path_times.nrows();
        if origin < 1 || destination < 1 || origin > size || destination > size {
            return None;
        }
        let time = self.path_times[[origin - 1, destination - 1]];
        if time == f64::INFINITY {
            return None;
        }
        Some(PathCost {time, cost: self.path_costs[[origin - 1, destination - 1]]})
    }
}


/// Forward Dijkstra over travel times from `source`.  Each reached node maps to its fastest
/// travel time and the summed edge cost along the path that achieved it.
pub fn dijkstra_with_costs(network: &RoadNetwork, source: usize) -> HashMap<usize, PathCost> {
    let mut visited = HashSet::new();
    let mut scores = HashMap::new();
    let zero = PathCost {time: 0.0, cost: 0.0};
    scores.insert(source, zero);

    let mut visit_next = BinaryHeap::new();
    visit_next.push(MinScored(0.0, source));
    while let Some(MinScored(node_time, node)) = visit_next.pop() {
        if visited.contains(&node) {
            continue;
        }
        let node_cost = scores[&node].cost;
        for next in network.get_out_neighbours(node) {
            if visited.contains(&next) {
                continue;
            }
            // every out-neighbour has both weights, the network builds them together
            let edge_time = network.get_travel_time(node, next).unwrap_or(f64::INFINITY);
            let edge_cost = network.get_travel_cost(node, next).unwrap_or(f64::INFINITY);
            let next_score = PathCost {time: node_time + edge_time, cost: node_cost + edge_cost};
            match scores.entry(next) {
                Occupied(ent) => {
                    if next_score.time < ent.get().time {
                        *ent.into_mut() = next_score;
                        visit_next.push(MinScored(next_score.time, next));
                    }
                }
                Vacant(ent) => {
                    ent.insert(next_score);
                    visit_next.push(MinScored(next_score.time, next));
                }
            }
        }
        visited.insert(node);
    }
    scores
}


/// Reverses the ordering of the score so a max-heap pops the smallest score first.  Copied from
/// petgraph's `scored::MinScored`, which that crate keeps private.
#[derive(Copy, Clone, Debug)]
pub struct MinScored<K, T>(pub K, pub T);

impl<K: PartialOrd, T> PartialEq for MinScored<K, T> {
    #[inline]
    fn eq(&self, other: &MinScored<K, T>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd, T> Eq for MinScored<K, T> {}

impl<K: PartialOrd, T> PartialOrd for MinScored<K, T> {
    #[inline]
    fn partial_cmp(&self, other: &MinScored<K, T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd, T> Ord for MinScored<K, T> {
    #[inline]
    fn cmp(&self, other: &MinScored<K, T>) -> Ordering {
        let a = &self.0;
        let b = &other.0;
        if a == b {
            Ordering::Equal
        } else if a < b {
            Ordering::Greater
        } else if a > b {
            Ordering::Less
        } else if a.ne(a) && b.ne(b) {
            // both NaN
            Ordering::Equal
        } else if a.ne(a) {
            // NaN sorts last
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}
