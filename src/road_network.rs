// This file defines the road network of a synthetic metropolis: a main grid with suburb grids
// hanging off its edges.  It's a wrapper around a petgraph graph plus sparse weight maps.
use std::collections::HashMap;

use itertools::iproduct;
use petgraph::algo::kosaraju_scc;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use rand::Rng;

use super::cost_model::CostModel;
use super::error::GenerationError;
use super::geometry::{CityLayout, GridCoord};


static SHORT_HOP_RANGE: (u32, u32) = (1, 4);
static LONG_HOP_RANGE: (u32, u32) = (5, 15);

/// Roads inside a grid and between suburbs are short hops; roads from the city to a suburb are
/// long ones.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Hop {
    Short,
    Long,
}

impl Hop {
    /// Draw a travel time, in time steps, for one direction of a road.
    pub fn sample_time<RR: Rng>(&self, discrete_time: bool, rng: &mut RR) -> f64 {
        let (low, high) = match self {
            Hop::Short => SHORT_HOP_RANGE,
            Hop::Long => LONG_HOP_RANGE,
        };
        if discrete_time {
            rng.gen_range(low..=high) as f64
        } else {
            rng.gen_range(low as f64..high as f64)
        }
    }
}


#[derive(Debug, Clone)]
pub struct RoadNetwork {
    layout: CityLayout,
    discrete_time: bool,
    // edge weights are travel times, in time steps.
    network: DiGraphMap<usize, f64>,
    travel_times: HashMap<(usize, usize), f64>,
    travel_costs: HashMap<(usize, usize), f64>,
}

impl RoadNetwork {
    /// Wrap a graph of travel times.  Every location of the layout becomes a node, whether or not
    /// it has edges.
    pub fn from_graph(layout: CityLayout, discrete_time: bool, graph: DiGraphMap<usize, f64>,
                      cost_model: &CostModel) -> Result<RoadNetwork, GenerationError> {
        let mut network = DiGraphMap::new();
        for loc in 1..=layout.num_nodes() {
            network.add_node(loc);
        }

        let mut travel_times = HashMap::new();
        let mut travel_costs = HashMap::new();
        for (from, to, time) in graph.all_edges() {
            if from == to {
                return Err(GenerationError::InvalidParameter(format!(
                    "self-loop on location {}", from)));
            }
            if layout.from_loc(from).is_none() || layout.from_loc(to).is_none() {
                return Err(GenerationError::InvalidParameter(format!(
                    "edge ({}, {}) leaves the {} locations of the city", from, to,
                    layout.num_nodes())));
            }
            if !(*time >= 0.0) {
                return Err(GenerationError::InvalidParameter(format!(
                    "edge ({}, {}) has travel time {}", from, to, time)));
            }
            network.add_edge(from, to, *time);
            travel_times.insert((from, to), *time);
            travel_costs.insert((from, to), cost_model.drive_cost(*time));
        }

        Ok(RoadNetwork {
            layout,
            discrete_time,
            network,
            travel_times,
            travel_costs,
        })
    }

    pub fn get_layout(&self) -> &CityLayout {
        &self.layout
    }

    pub fn is_discrete_time(&self) -> bool {
        self.discrete_time
    }

    pub fn get_num_nodes(&self) -> usize {
        self.network.node_count()
    }

    pub fn get_num_edges(&self) -> usize {
        self.network.edge_count()
    }

    pub fn get_nodes(&self) -> Vec<usize> {
        self.network.nodes().collect()
    }

    pub fn get_out_neighbours(&self, node: usize) -> Vec<usize> {
        self.network.neighbors_directed(node, Direction::Outgoing).collect()
    }

    pub fn get_adjacencies(&self) -> Vec<(usize, usize)> {
        self.network.all_edges().map(|(ff, tt, _)| (ff, tt)).collect()
    }

    pub fn get_travel_time(&self, from: usize, to: usize) -> Option<f64> {
        self.travel_times.get(&(from, to)).copied()
    }

    pub fn get_travel_cost(&self, from: usize, to: usize) -> Option<f64> {
        self.travel_costs.get(&(from, to)).copied()
    }

    pub fn get_travel_times(&self) -> &HashMap<(usize, usize), f64> {
        &self.travel_times
    }

    pub fn get_travel_costs(&self) -> &HashMap<(usize, usize), f64> {
        &self.travel_costs
    }

    pub fn get_graph(&self) -> &DiGraphMap<usize, f64> {
        &self.network
    }

    pub fn num_strong_components(&self) -> usize {
        kosaraju_scc(&self.network).len()
    }
}


/// Build the road network of a metropolis: a grid for the main city, one smaller grid per
/// suburb, each suburb tied to a random point on the city's boundary, and the suburbs chained
/// into a ring.
pub fn generate_metropolis<RR>(layout: CityLayout, discrete_time: bool, cost_model: &CostModel,
                               rng: &mut RR) -> Result<RoadNetwork, GenerationError>
                               where RR: Rng {
    let mut street_graph = DiGraphMap::new();
    for loc in 1..=layout.num_nodes() {
        street_graph.add_node(loc);
    }

    for zone in 0..layout.num_zones() {
        let zw = layout.zone_width(zone);
        for (y_idx, x_idx) in iproduct!(1..=zw, 1..=zw) {
            let here = GridCoord::new(x_idx, y_idx);
            let this_loc = layout.to_loc(&here, zone);
            for other in here.forward_neighbours(zw) {
                add_road(&mut street_graph, this_loc, layout.to_loc(&other, zone), Hop::Short,
                         discrete_time, rng);
            }
        }
    }

    let num_suburbs = layout.num_suburbs();
    if num_suburbs > 0 {
        let sw = layout.sub_width();
        let mut anchors: Vec<GridCoord> = (0..num_suburbs)
            .map(|_| layout.random_perimeter_coord(rng))
            .collect();
        anchors.sort();
        for (ii, anchor) in anchors.iter().enumerate() {
            let suburb = ii + 1;
            log::debug!("suburb {} attaches to {:?}", suburb, anchor);
            add_road(&mut street_graph, layout.to_loc(anchor, 0),
                     layout.to_loc(&GridCoord::new(1, 1), suburb), Hop::Long, discrete_time, rng);
        }

        let far_corner = GridCoord::new(1, sw);
        let near_corner = GridCoord::new(sw, 1);
        for suburb in 1..num_suburbs {
            add_road(&mut street_graph, layout.to_loc(&far_corner, suburb),
                     layout.to_loc(&near_corner, suburb + 1), Hop::Short, discrete_time, rng);
        }
        if num_suburbs > 1 {
            // close the ring
            add_road(&mut street_graph, layout.to_loc(&far_corner, num_suburbs),
                     layout.to_loc(&near_corner, 1), Hop::Short, discrete_time, rng);
        }
    }

    let network = RoadNetwork::from_graph(layout, discrete_time, street_graph, cost_model)?;
    let components = network.num_strong_components();
    log::info!("built metropolis with {} nodes, {} edges, {} strongly connected components",
               network.get_num_nodes(), network.get_num_edges(), components);
    if components != 1 {
        return Err(GenerationError::Disconnected { components });
    }
    Ok(network)
}


// both directions of a road get their own travel time
fn add_road<RR: Rng>(graph: &mut DiGraphMap<usize, f64>, aa: usize, bb: usize, hop: Hop,
                     discrete_time: bool, rng: &mut RR) {
    graph.add_edge(aa, bb, hop.sample_time(discrete_time, rng));
    graph.add_edge(bb, aa, hop.sample_time(discrete_time, rng));
}
