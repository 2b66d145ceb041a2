//! Adjacency graph built from a layout's placed rooms, backed by
//! `petgraph`. Used by the rule validator (connectivity checks) and by
//! metrics. Grounded on `build_room_adjacency`/`build_circulation_graph` in
//! the retrieval pack's graph-building prototype.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

use crate::brief::{LayoutResult, PlacedRoom};

/// An undirected adjacency graph over a layout's rooms. Two rooms are
/// connected iff their rectangles touch or overlap (inclusive edge test).
pub struct AdjacencyGraph {
    pub graph: UnGraph<String, ()>,
    index_of: HashMap<String, NodeIndex>,
}

impl AdjacencyGraph {
    pub fn build(layout: &LayoutResult) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut index_of = HashMap::new();

        for room in &layout.rooms {
            let idx = graph.add_node(room.name.clone());
            index_of.insert(room.name.clone(), idx);
        }

        for i in 0..layout.rooms.len() {
            for j in (i + 1)..layout.rooms.len() {
                if rects_touch_or_overlap(&layout.rooms[i], &layout.rooms[j]) {
                    let a = index_of[&layout.rooms[i].name];
                    let b = index_of[&layout.rooms[j].name];
                    graph.add_edge(a, b, ());
                }
            }
        }

        Self { graph, index_of }
    }

    pub fn degree(&self, room_name: &str) -> usize {
        self.index_of
            .get(room_name)
            .map(|&idx| self.graph.neighbors(idx).count())
            .unwrap_or(0)
    }

    pub fn is_isolated(&self, room_name: &str) -> bool {
        self.degree(room_name) == 0
    }

    pub fn neighbors(&self, room_name: &str) -> Vec<String> {
        match self.index_of.get(room_name) {
            Some(&idx) => self
                .graph
                .neighbors(idx)
                .map(|n| self.graph[n].clone())
                .collect(),
            None => vec![],
        }
    }

    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbors(a).iter().any(|n| n == b)
    }
}

fn rects_touch_or_overlap(a: &PlacedRoom, b: &PlacedRoom) -> bool {
    a.touches_or_overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str, x: f64, y: f64, w: f64, h: f64) -> PlacedRoom {
        PlacedRoom {
            name: name.to_string(),
            x,
            y,
            w,
            h,
            is_corridor: false,
        }
    }

    #[test]
    fn isolated_room_has_zero_degree() {
        let layout = LayoutResult {
            rooms: vec![room("a", 0.0, 0.0, 100.0, 100.0), room("b", 1000.0, 1000.0, 100.0, 100.0)],
            dropped: vec![],
        };
        let graph = AdjacencyGraph::build(&layout);
        assert!(graph.is_isolated("b"));
        assert!(graph.is_isolated("a"));
    }

    #[test]
    fn touching_rooms_are_adjacent() {
        let layout = LayoutResult {
            rooms: vec![room("a", 0.0, 0.0, 100.0, 100.0), room("b", 100.0, 0.0, 100.0, 100.0)],
            dropped: vec![],
        };
        let graph = AdjacencyGraph::build(&layout);
        assert!(graph.are_adjacent("a", "b"));
        assert_eq!(graph.degree("a"), 1);
    }
}
