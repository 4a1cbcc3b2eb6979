//! Directed connection graph between note anchors.
//!
//! Graph nodes are note ids, not notes: an edge can outlive the note it
//! points at. Such dangling edges are kept and silently dropped when
//! projecting for render.

use crate::error::ConnectionError;
use crate::geometry;
use crate::id::{ConnectionId, NoteId};
use crate::model::{Connection, EdgeKey, Note, Notebook, Side};
use kurbo::Point;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    graph: StableDiGraph<NoteId, Connection>,
    /// Index from note id → graph node.
    note_index: HashMap<NoteId, NodeIndex>,
    /// Index from connection id → graph edge.
    edge_index: HashMap<ConnectionId, EdgeIndex>,
}

impl ConnectionGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from stored connections. Edges that violate the
    /// graph rules are skipped with a warning.
    pub fn from_connections(connections: impl IntoIterator<Item = Connection>) -> Self {
        let mut graph = Self::new();
        for conn in connections {
            let id = conn.id;
            if let Err(err) = graph.insert(conn) {
                log::warn!("skipping stored connection {id}: {err}");
            }
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.edge_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_index.is_empty()
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.edge_index
            .get(&id)
            .and_then(|e| self.graph.edge_weight(*e))
    }

    /// All connections in edge-index order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.edge_indices().filter_map(|e| self.graph.edge_weight(e))
    }

    pub fn find(&self, key: EdgeKey) -> Option<&Connection> {
        let (from, to, from_side, to_side) = key;
        let a = self.note_index.get(&from)?;
        let b = self.note_index.get(&to)?;
        self.graph
            .edges_connecting(*a, *b)
            .map(|e| e.weight())
            .find(|c| c.from_side == from_side && c.to_side == to_side)
    }

    /// Whether an edge with this shape may be added.
    pub fn check(
        &self,
        from: NoteId,
        to: NoteId,
        from_side: Side,
        to_side: Side,
    ) -> Result<(), ConnectionError> {
        if from == to {
            return Err(ConnectionError::SelfLoop);
        }
        if self.find((from, to, from_side, to_side)).is_some() {
            return Err(ConnectionError::DuplicateEdge);
        }
        Ok(())
    }

    /// Create a new connection with a fresh id.
    pub fn create(
        &mut self,
        from: NoteId,
        to: NoteId,
        from_side: Side,
        to_side: Side,
    ) -> Result<Connection, ConnectionError> {
        self.check(from, to, from_side, to_side)?;
        let conn = Connection {
            id: ConnectionId::generate(),
            from_note_id: from,
            to_note_id: to,
            from_side,
            to_side,
        };
        self.insert(conn.clone())?;
        Ok(conn)
    }

    /// Add a connection that already carries an id.
    pub fn insert(&mut self, conn: Connection) -> Result<(), ConnectionError> {
        self.check(conn.from_note_id, conn.to_note_id, conn.from_side, conn.to_side)?;
        if self.edge_index.contains_key(&conn.id) {
            return Err(ConnectionError::IdInUse(conn.id));
        }
        let a = self.ensure_node(conn.from_note_id);
        let b = self.ensure_node(conn.to_note_id);
        let id = conn.id;
        let edge = self.graph.add_edge(a, b, conn);
        self.edge_index.insert(id, edge);
        Ok(())
    }

    /// Remove a connection. Unknown ids are a no-op. Endpoint nodes left
    /// without edges are dropped.
    pub fn delete(&mut self, id: ConnectionId) -> Option<Connection> {
        let edge = self.edge_index.remove(&id)?;
        let (a, b) = self.graph.edge_endpoints(edge)?;
        let conn = self.graph.remove_edge(edge)?;
        self.prune(a);
        self.prune(b);
        Some(conn)
    }

    /// Drop every connection touching `note`, returning what was removed.
    pub fn remove_note(&mut self, note: NoteId) -> Vec<Connection> {
        let Some(idx) = self.note_index.remove(&note) else {
            return Vec::new();
        };
        let touching: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        let neighbors: Vec<NodeIndex> = self.graph.neighbors_undirected(idx).collect();
        let mut removed = Vec::with_capacity(touching.len());
        for edge in touching {
            if let Some(conn) = self.graph.remove_edge(edge) {
                self.edge_index.remove(&conn.id);
                removed.push(conn);
            }
        }
        self.graph.remove_node(idx);
        for n in neighbors {
            self.prune(n);
        }
        removed
    }

    /// Connections with at least one endpoint among the notebook's notes.
    pub fn for_notebook(&self, notebook: &Notebook) -> Vec<&Connection> {
        self.connections()
            .filter(|c| notebook.contains(c.from_note_id) || notebook.contains(c.to_note_id))
            .collect()
    }

    /// Drop a node once its last edge is gone.
    fn prune(&mut self, idx: NodeIndex) {
        if self.graph.neighbors_undirected(idx).next().is_some() {
            return;
        }
        if let Some(note) = self.graph.remove_node(idx) {
            self.note_index.remove(&note);
        }
    }

    fn ensure_node(&mut self, note: NoteId) -> NodeIndex {
        if let Some(idx) = self.note_index.get(&note) {
            return *idx;
        }
        let idx = self.graph.add_node(note);
        self.note_index.insert(note, idx);
        idx
    }
}

// ─── Render geometry ─────────────────────────────────────────────────────

/// A connection resolved to canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionSegment {
    pub id: ConnectionId,
    pub from: Point,
    pub to: Point,
}

impl ConnectionSegment {
    pub fn midpoint(&self) -> Point {
        geometry::midpoint(self.from, self.to)
    }
}

/// Resolve connections against the current note rectangles. Connections
/// whose endpoint note is missing are dropped.
pub fn project_for_render<'a>(
    connections: impl IntoIterator<Item = &'a Connection>,
    notes: &[Note],
) -> Vec<ConnectionSegment> {
    let by_id: HashMap<NoteId, &Note> = notes.iter().map(|n| (n.id, n)).collect();
    connections
        .into_iter()
        .filter_map(|c| {
            let from = by_id.get(&c.from_note_id)?;
            let to = by_id.get(&c.to_note_id)?;
            Some(ConnectionSegment {
                id: c.id,
                from: from.anchor(c.from_side),
                to: to.anchor(c.to_side),
            })
        })
        .collect()
}

/// The topmost (last drawn) segment whose hit band covers `p`.
/// `band` is the full band width; the line sits in its middle.
pub fn hit_test_segments(segments: &[ConnectionSegment], p: Point, band: f64) -> Option<ConnectionId> {
    let reach = band / 2.0;
    segments
        .iter()
        .rev()
        .find(|s| geometry::distance_to_segment(p, s.from, s.to) <= reach)
        .map(|s| s.id)
}
