//! A* route search over the transit network.
//!
//! A query never touches the shared network. The per-query entry and exit
//! vertices and their board/alight edges live in a small overlay consulted
//! while expanding the frontier.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::domain::{EdgeKind, StationName};
use crate::geometry::{self, Point, round2};
use crate::network::{EdgeId, Network, NodeId};

use super::config::{RouteConfig, SearchMode};

/// Error from route search.
///
/// `UnknownStation` and `NoPath` are both "not found" to callers; they only
/// differ in diagnostic detail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Origin and destination are the same station
    #[error("origin and destination are both {0}")]
    SameStation(StationName),

    /// A station is not in the network
    #[error("unknown station: {0}")]
    UnknownStation(StationName),

    /// The network has no connection between the two stations
    #[error("no route from {origin} to {destination}")]
    NoPath {
        origin: StationName,
        destination: StationName,
    },
}

impl SearchError {
    /// Whether this error should be reported as "route not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SearchError::UnknownStation(_) | SearchError::NoPath { .. }
        )
    }
}

/// Request for a route between two stations.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: StationName,
    pub destination: StationName,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(origin: StationName, destination: StationName) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Validate the request against the network.
    ///
    /// Same-station queries are rejected here so the search always has at
    /// least one step to report.
    pub fn validate(&self, network: &Network) -> Result<(), SearchError> {
        if self.origin == self.destination {
            return Err(SearchError::SameStation(self.origin.clone()));
        }
        for station in [&self.origin, &self.destination] {
            if !network.contains_station(station) {
                return Err(SearchError::UnknownStation(station.clone()));
            }
        }
        Ok(())
    }
}

/// One reported move of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub from: StationName,
    pub to: StationName,
    /// Minutes, rounded to 2 decimal places.
    pub time: f64,
    pub kind: EdgeKind,
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Ride and transfer steps in travel order.
    pub steps: Vec<Step>,

    /// Sum of the step times, rounded to 2 decimal places.
    pub total_time: f64,

    /// Cost of the searched path, board time included.
    pub search_cost: f64,

    /// Number of vertices expanded by the search.
    pub nodes_expanded: usize,
}

/// A search vertex: a real network node or one of the two virtual ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Vertex {
    Entry,
    Node(NodeId),
    Exit,
}

/// How a vertex was reached.
#[derive(Debug, Clone, Copy)]
enum Via {
    Board,
    Edge(EdgeId),
    Alight,
}

/// Frontier entry. Ordered so that `BinaryHeap` pops the lowest estimate;
/// ties go to the smaller vertex so runs are deterministic.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    estimate: f64,
    cost: f64,
    vertex: Vertex,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-query view of the network plus the virtual entry/exit overlay.
struct Overlay<'a> {
    network: &'a Network,
    origin_nodes: &'a [NodeId],
    destination_nodes: &'a [NodeId],
    /// Reference position of the destination (its first node).
    target: Point,
    board_time: f64,
    walk_speed: f64,
    mode: SearchMode,
}

impl Overlay<'_> {
    fn slot(&self, vertex: Vertex) -> usize {
        let n = self.network.node_count();
        match vertex {
            Vertex::Node(id) => id.index(),
            Vertex::Entry => n,
            Vertex::Exit => n + 1,
        }
    }

    /// Remaining-time estimate: walking time from the node to `target`.
    ///
    /// Destination nodes are pinned to zero instead, since they are one free
    /// alight away from the exit. When the destination's nodes share one
    /// position (checked at startup) the two rules agree; otherwise this keeps
    /// the other destination nodes from being estimated past their real cost.
    fn heuristic(&self, vertex: Vertex) -> f64 {
        match (self.mode, vertex) {
            (SearchMode::Exact, _) | (_, Vertex::Entry | Vertex::Exit) => 0.0,
            (SearchMode::AStar, Vertex::Node(id)) => {
                if self.destination_nodes.contains(&id) {
                    0.0
                } else {
                    geometry::walk_time(
                        self.network.node(id).position,
                        self.target,
                        self.walk_speed,
                    )
                }
            }
        }
    }

    /// Outgoing moves from a vertex: (next vertex, how, cost).
    fn successors(&self, vertex: Vertex, out: &mut Vec<(Vertex, Via, f64)>) {
        out.clear();
        match vertex {
            Vertex::Entry => {
                out.extend(
                    self.origin_nodes
                        .iter()
                        .map(|&id| (Vertex::Node(id), Via::Board, self.board_time)),
                );
            }
            Vertex::Node(id) => {
                out.extend(self.network.edges_of(id).iter().map(|&eid| {
                    let edge = self.network.edge(eid);
                    (Vertex::Node(edge.other(id)), Via::Edge(eid), edge.weight)
                }));
                if self.destination_nodes.contains(&id) {
                    out.push((Vertex::Exit, Via::Alight, 0.0));
                }
            }
            Vertex::Exit => {}
        }
    }
}

/// Route planner over a shared, read-only network.
pub struct RoutePlanner<'a> {
    network: &'a Network,
    config: &'a RouteConfig,
}

impl<'a> RoutePlanner<'a> {
    /// Create a new planner.
    pub fn new(network: &'a Network, config: &'a RouteConfig) -> Self {
        Self { network, config }
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    pub fn config(&self) -> &'a RouteConfig {
        self.config
    }

    /// Find the cheapest network path between two stations.
    pub fn find_path(&self, request: &SearchRequest) -> Result<PathResult, SearchError> {
        request.validate(self.network)?;

        let origin_nodes = self.network.nodes_at(&request.origin);
        let destination_nodes = self.network.nodes_at(&request.destination);
        let target = destination_nodes
            .first()
            .map(|&id| self.network.node(id).position)
            .ok_or_else(|| SearchError::UnknownStation(request.destination.clone()))?;

        let overlay = Overlay {
            network: self.network,
            origin_nodes,
            destination_nodes,
            target,
            board_time: self.config.board_time,
            walk_speed: self.config.walk_speed,
            mode: self.config.search_mode,
        };

        let slots = self.network.node_count() + 2;
        let mut best = vec![f64::INFINITY; slots];
        let mut came_from: Vec<Option<(Vertex, Via)>> = vec![None; slots];
        let mut heap = BinaryHeap::new();
        let mut successors = Vec::new();
        let mut expanded = 0;

        best[overlay.slot(Vertex::Entry)] = 0.0;
        heap.push(QueueEntry {
            estimate: overlay.heuristic(Vertex::Entry),
            cost: 0.0,
            vertex: Vertex::Entry,
        });

        while let Some(QueueEntry { cost, vertex, .. }) = heap.pop() {
            if vertex == Vertex::Exit {
                let result = self.reconstruct(&overlay, &came_from, cost, expanded);
                debug!(
                    origin = %request.origin,
                    destination = %request.destination,
                    mode = %self.config.search_mode,
                    expanded,
                    cost,
                    steps = result.steps.len(),
                    "route found"
                );
                return Ok(result);
            }

            // Stale entry: a cheaper way here was already found.
            if cost > best[overlay.slot(vertex)] {
                continue;
            }
            expanded += 1;

            overlay.successors(vertex, &mut successors);
            for &(next, via, weight) in &successors {
                let next_cost = cost + weight;
                let slot = overlay.slot(next);
                if next_cost < best[slot] {
                    best[slot] = next_cost;
                    came_from[slot] = Some((vertex, via));
                    heap.push(QueueEntry {
                        estimate: next_cost + overlay.heuristic(next),
                        cost: next_cost,
                        vertex: next,
                    });
                }
            }
        }

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            expanded,
            "no route"
        );
        Err(SearchError::NoPath {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
        })
    }

    /// Walk the predecessor chain back from the exit and emit one step per
    /// network edge; board and alight hops are dropped.
    fn reconstruct(
        &self,
        overlay: &Overlay<'_>,
        came_from: &[Option<(Vertex, Via)>],
        cost: f64,
        nodes_expanded: usize,
    ) -> PathResult {
        let mut hops = Vec::new();
        let mut current = Vertex::Exit;
        while let Some((prev, via)) = came_from[overlay.slot(current)] {
            hops.push((prev, via, current));
            current = prev;
        }
        hops.reverse();

        let steps: Vec<Step> = hops
            .into_iter()
            .filter_map(|(prev, via, next)| match (prev, via, next) {
                (Vertex::Node(a), Via::Edge(eid), Vertex::Node(b)) => {
                    let edge = self.network.edge(eid);
                    Some(Step {
                        from: self.network.node(a).station.clone(),
                        to: self.network.node(b).station.clone(),
                        time: round2(edge.weight),
                        kind: edge.kind,
                    })
                }
                _ => None,
            })
            .collect();

        let total_time = round2(steps.iter().map(|s| s.time).sum());

        PathResult {
            steps,
            total_time,
            search_cost: round2(cost),
            nodes_expanded,
        }
    }
}
