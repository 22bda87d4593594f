//! Arena-indexed network graph.

use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::domain::{EdgeKind, LineName, StationName};
use crate::geometry::{self, Point};

use super::dataset::LineDefinitions;
use super::error::NetworkError;

/// Index of a node in the network arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge in the network arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A (station, line) pair. Its position is fixed when the node is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub station: StationName,
    pub line: LineName,
    pub position: Point,
}

/// An undirected weighted edge between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    /// Time cost in minutes.
    pub weight: f64,
    pub kind: EdgeKind,
}

impl Edge {
    /// The endpoint opposite `from`.
    pub fn other(&self, from: NodeId) -> NodeId {
        if self.a == from { self.b } else { self.a }
    }
}

/// A line as stored in the network: its nodes in riding order.
#[derive(Debug, Clone)]
pub struct Line {
    pub name: LineName,
    pub color: Option<String>,
    pub nodes: Vec<NodeId>,
}

/// Constants that shape the base network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkParams {
    pub image_width: f64,
    pub image_height: f64,
    /// Minutes between consecutive stations.
    pub ride_time: f64,
    /// Minutes to change lines at a station.
    pub transfer_time: f64,
}

/// Where the straight-line walking estimate can overshoot the real cost.
///
/// `violations` are edges whose walking estimate exceeds the edge cost.
/// `split_stations` are stations whose nodes sit at different positions on
/// different lines: the search aims at one of those nodes, so the estimate
/// can overshoot the cost of reaching another. An empty report means the
/// walking-time heuristic is consistent on the base network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeuristicCheck {
    pub violations: Vec<EdgeId>,
    /// Largest amount (minutes) by which a walking estimate exceeds its edge.
    pub worst_excess: f64,
    pub split_stations: Vec<StationName>,
}

impl HeuristicCheck {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty() && self.split_stations.is_empty()
    }
}

/// The immutable transit network.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeId>>,
    node_index: HashMap<(StationName, LineName), NodeId>,
    station_index: BTreeMap<StationName, Vec<NodeId>>,
    lines: Vec<Line>,
}

impl Network {
    /// Build the network from validated line definitions.
    pub fn build(defs: &LineDefinitions, params: &NetworkParams) -> Self {
        let mut network = Network {
            nodes: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            node_index: HashMap::new(),
            station_index: BTreeMap::new(),
            lines: Vec::with_capacity(defs.len()),
        };

        for def in defs.lines() {
            let mut line_nodes = Vec::with_capacity(def.stations.len());

            for entry in &def.stations {
                let position = geometry::scale(entry.coord, params.image_width, params.image_height);
                let node = network.get_or_insert_node(&entry.name, &def.name, position);

                if let Some(&prev) = line_nodes.last() {
                    network.add_edge(prev, node, params.ride_time, EdgeKind::Ride);
                }
                line_nodes.push(node);
            }

            network.lines.push(Line {
                name: def.name.clone(),
                color: def.color.clone(),
                nodes: line_nodes,
            });
        }

        let transfer_pairs: Vec<(NodeId, NodeId)> = network
            .station_index
            .values()
            .flat_map(|nodes| {
                nodes.iter().enumerate().flat_map(move |(i, &a)| {
                    nodes[i + 1..].iter().map(move |&b| (a, b))
                })
            })
            .collect();
        for (a, b) in transfer_pairs {
            network.add_edge(a, b, params.transfer_time, EdgeKind::Transfer);
        }

        info!(
            lines = network.lines.len(),
            stations = network.station_index.len(),
            nodes = network.nodes.len(),
            edges = network.edges.len(),
            "built transit network"
        );

        network
    }

    fn get_or_insert_node(
        &mut self,
        station: &StationName,
        line: &LineName,
        position: Point,
    ) -> NodeId {
        let key = (station.clone(), line.clone());
        if let Some(&id) = self.node_index.get(&key) {
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            station: station.clone(),
            line: line.clone(),
            position,
        });
        self.adjacency.push(Vec::new());
        self.node_index.insert(key, id);
        self.station_index
            .entry(station.clone())
            .or_default()
            .push(id);
        id
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64, kind: EdgeKind) {
        debug_assert!(a != b, "self-loop on {:?}", self.nodes[a.0]);
        debug_assert!(weight >= 0.0, "negative edge weight {weight}");

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge { a, b, weight, kind });
        self.adjacency[a.0].push(id);
        self.adjacency[b.0].push(id);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges incident to a node, in insertion order.
    pub fn edges_of(&self, id: NodeId) -> &[EdgeId] {
        &self.adjacency[id.0]
    }

    /// Look up the node for a station on a specific line.
    pub fn node_at(&self, station: &StationName, line: &LineName) -> Option<NodeId> {
        self.node_index
            .get(&(station.clone(), line.clone()))
            .copied()
    }

    /// All nodes at a station, one per line serving it.
    ///
    /// Returns an empty slice for unknown stations.
    pub fn nodes_at(&self, station: &StationName) -> &[NodeId] {
        self.station_index
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_station(&self, station: &StationName) -> bool {
        self.station_index.contains_key(station)
    }

    /// All station names, sorted.
    pub fn stations(&self) -> impl Iterator<Item = &StationName> {
        self.station_index.keys()
    }

    pub fn station_count(&self) -> usize {
        self.station_index.len()
    }

    /// Lines in dataset order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Canonical position of a station: the centroid of its nodes.
    pub fn station_position(&self, station: &StationName) -> Result<Point, NetworkError> {
        Point::centroid(self.nodes_at(station).iter().map(|&id| self.nodes[id.0].position))
            .ok_or_else(|| NetworkError::UnknownStation(station.clone()))
    }

    /// Find base edges where walking between the endpoints is estimated to
    /// be slower than the edge itself, and stations whose nodes do not share
    /// one position.
    pub fn heuristic_check(&self, walk_speed: f64) -> HeuristicCheck {
        let mut check = HeuristicCheck::default();

        for (idx, edge) in self.edges.iter().enumerate() {
            let estimate = geometry::walk_time(
                self.nodes[edge.a.0].position,
                self.nodes[edge.b.0].position,
                walk_speed,
            );
            let excess = estimate - edge.weight;
            if excess > 0.0 {
                check.violations.push(EdgeId(idx));
                check.worst_excess = check.worst_excess.max(excess);
            }
        }

        check.split_stations = self
            .station_index
            .iter()
            .filter(|(_, nodes)| {
                nodes
                    .split_first()
                    .is_some_and(|(first, rest)| {
                        let at = self.nodes[first.0].position;
                        rest.iter().any(|id| self.nodes[id.0].position != at)
                    })
            })
            .map(|(name, _)| name.clone())
            .collect();

        check
    }

    /// Case-insensitive substring search over station names.
    ///
    /// Prefix matches sort before other matches; ties are alphabetical.
    pub fn search_stations(&self, query: &str, limit: usize) -> Vec<&StationName> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(bool, &StationName)> = self
            .station_index
            .keys()
            .filter_map(|name| {
                let haystack = name.as_str().to_lowercase();
                haystack
                    .find(&needle)
                    .map(|pos| (pos != 0, name))
            })
            .collect();

        // BTreeMap keys are already alphabetical; a stable sort keeps that
        // order within each group.
        matches.sort_by_key(|(not_prefix, _)| *not_prefix);
        matches.into_iter().take(limit).map(|(_, name)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NetworkParams {
        NetworkParams {
            image_width: 396.0,
            image_height: 443.0,
            ride_time: 2.0,
            transfer_time: 5.0,
        }
    }

    fn station(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn line(s: &str) -> LineName {
        LineName::parse(s).unwrap()
    }

    /// Two lines crossing at "Mid", a third line also through "Mid".
    fn three_lines() -> Network {
        let defs = LineDefinitions::from_json_str(
            r#"{
                "L1": { "stations": { "A": [0.1, 0.5], "Mid": [0.5, 0.5], "B": [0.9, 0.5] } },
                "L2": { "stations": { "C": [0.5, 0.1], "Mid": [0.5, 0.5], "D": [0.5, 0.9] } },
                "L3": { "stations": { "Mid": [0.5, 0.5], "E": [0.8, 0.8] } }
            }"#,
        )
        .unwrap();
        Network::build(&defs, &params())
    }

    #[test]
    fn one_node_per_station_line_pair() {
        let network = three_lines();
        assert_eq!(network.node_count(), 3 + 3 + 2);
        assert_eq!(network.station_count(), 6);
        assert_eq!(network.nodes_at(&station("Mid")).len(), 3);
        assert_eq!(network.nodes_at(&station("A")).len(), 1);
        assert!(network.nodes_at(&station("Nowhere")).is_empty());
    }

    #[test]
    fn ride_edges_join_consecutive_stations() {
        let network = three_lines();
        let rides: Vec<(&str, &str)> = network
            .edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::Ride)
            .map(|e| {
                (
                    network.node(e.a).station.as_str(),
                    network.node(e.b).station.as_str(),
                )
            })
            .collect();

        assert_eq!(
            rides,
            vec![("A", "Mid"), ("Mid", "B"), ("C", "Mid"), ("Mid", "D"), ("Mid", "E")]
        );
        assert!(
            network
                .edges()
                .iter()
                .filter(|e| e.kind == EdgeKind::Ride)
                .all(|e| network.node(e.a).line == network.node(e.b).line && e.weight == 2.0)
        );
    }

    #[test]
    fn transfer_edges_pair_every_line_at_station() {
        let network = three_lines();
        let transfers: Vec<&Edge> = network
            .edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::Transfer)
            .collect();

        // k = 3 lines at Mid → 3 transfer edges
        assert_eq!(transfers.len(), 3);
        for edge in transfers {
            let (a, b) = (network.node(edge.a), network.node(edge.b));
            assert_eq!(a.station, station("Mid"));
            assert_eq!(b.station, station("Mid"));
            assert_ne!(a.line, b.line);
            assert_eq!(edge.weight, 5.0);
        }
    }

    #[test]
    fn positions_are_scaled() {
        let network = three_lines();
        let id = network.node_at(&station("A"), &line("L1")).unwrap();
        assert_eq!(network.node(id).position, Point::new(0.1 * 396.0, 0.5 * 443.0));
    }

    #[test]
    fn station_position_is_centroid() {
        let defs = LineDefinitions::from_json_str(
            r#"{
                "L1": { "stations": { "X": [0.0, 0.0] } },
                "L2": { "stations": { "X": [0.5, 1.0] } }
            }"#,
        )
        .unwrap();
        let network = Network::build(&defs, &params());

        let pos = network.station_position(&station("X")).unwrap();
        assert_eq!(pos, Point::new(0.25 * 396.0, 0.5 * 443.0));
    }

    #[test]
    fn station_position_unknown() {
        let network = three_lines();
        let err = network.station_position(&station("Nowhere")).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownStation(_)));
    }

    #[test]
    fn loop_line_reuses_node() {
        let defs = LineDefinitions::from_json_str(
            r#"{ "Loop": { "stations": { "A": [0.0, 0.0], "B": [0.1, 0.0], "C": [0.1, 0.1], "A": [0.9, 0.9] } } }"#,
        )
        .unwrap();
        let network = Network::build(&defs, &params());

        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 3);
        // The first listing fixes the position.
        let a = network.node_at(&station("A"), &line("Loop")).unwrap();
        assert_eq!(network.node(a).position, Point::new(0.0, 0.0));
        assert_eq!(network.lines()[0].nodes.len(), 4);
    }

    #[test]
    fn no_self_loops() {
        let network = three_lines();
        assert!(network.edges().iter().all(|e| e.a != e.b));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let network = three_lines();
        for (idx, edge) in network.edges().iter().enumerate() {
            let id = EdgeId(idx);
            assert!(network.edges_of(edge.a).contains(&id));
            assert!(network.edges_of(edge.b).contains(&id));
            assert_eq!(edge.other(edge.a), edge.b);
            assert_eq!(edge.other(edge.b), edge.a);
        }
    }

    #[test]
    fn heuristic_check_flags_slow_walks() {
        let network = three_lines();
        // A→Mid is 0.4 * 396 = 158.4 px. At 20 px/min that is 7.92 min > 2.
        let check = network.heuristic_check(20.0);
        assert!(!check.is_consistent());
        // Every ride edge is violated; transfers at Mid share one position.
        assert_eq!(check.violations.len(), 5);
        let mid = geometry::scale([0.5, 0.5], 396.0, 443.0);
        let e = geometry::scale([0.8, 0.8], 396.0, 443.0);
        let expected = geometry::walk_time(mid, e, 20.0) - 2.0;
        assert!((check.worst_excess - expected).abs() < 1e-9);

        // Very fast walking is always dominated by the edge costs.
        let check = network.heuristic_check(1e6);
        assert!(check.is_consistent());
        assert_eq!(check.worst_excess, 0.0);
        assert!(check.split_stations.is_empty());
    }

    #[test]
    fn heuristic_check_flags_stations_placed_apart() {
        // O and D sit at different spots on L1 and L2. No single edge is
        // cheaper than walking, but aiming at one D node can overshoot the
        // cost of reaching the other.
        let defs = LineDefinitions::from_json_str(
            r#"{
                "L1": { "stations": { "O": [0.01, 0.0], "X": [0.005, 0.0], "D": [0.0, 0.0] } },
                "L2": { "stations": { "O": [0.06, 0.0], "D": [0.04, 0.0] } }
            }"#,
        )
        .unwrap();
        let network = Network::build(
            &defs,
            &NetworkParams {
                image_width: 100.0,
                image_height: 100.0,
                ride_time: 2.0,
                transfer_time: 5.0,
            },
        );

        let check = network.heuristic_check(1.0);
        assert!(check.violations.is_empty());
        assert_eq!(check.split_stations, vec![station("D"), station("O")]);
        assert!(!check.is_consistent());
    }

    #[test]
    fn search_stations_prefix_first() {
        let defs = LineDefinitions::from_json_str(
            r#"{ "L1": { "stations": { "Santa Ana": [0.0, 0.0], "Ana Maria": [0.1, 0.0], "Banana": [0.2, 0.0], "Central": [0.3, 0.0] } } }"#,
        )
        .unwrap();
        let network = Network::build(&defs, &params());

        let found: Vec<&str> = network
            .search_stations("ana", 10)
            .into_iter()
            .map(StationName::as_str)
            .collect();
        assert_eq!(found, vec!["Ana Maria", "Banana", "Santa Ana"]);

        assert_eq!(network.search_stations("ana", 1).len(), 1);
        assert!(network.search_stations("  ", 10).is_empty());
        assert!(network.search_stations("zzz", 10).is_empty());
    }
}
