//! Linked node arena shared by the aliasing fixtures
//!
//! Nodes are stored in a [`NodeGraph`] and addressed by [`NodeId`]. Two
//! equal ids denote the same node, so passing one id twice is how a caller
//! aliases a node, and a write through either is visible through both.
//! Links may form chains, cycles or self-loops.

use crate::error::{FixtureError, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Reference to a node inside a [`NodeGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutable record with two integers and an optional link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub link: Option<NodeId>,
}

impl Node {
    pub fn new(x: i32, y: i32, link: Option<NodeId>) -> Self {
        Node { x, y, link }
    }
}

/// Arena owning every node a fixture call can reach
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGraph {
    nodes: Vec<Node>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its id
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Allocate an all-zero, unlinked node
    pub fn alloc_zeroed(&mut self) -> NodeId {
        self.alloc(Node::default())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .ok_or(FixtureError::DanglingNode { id })
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .ok_or(FixtureError::DanglingNode { id })
    }

    /// Point `from.link` at `to` (or clear it)
    pub fn set_link(&mut self, from: NodeId, to: Option<NodeId>) -> Result<()> {
        if let Some(target) = to {
            self.get(target)?;
        }
        self.get_mut(from)?.link = to;
        Ok(())
    }

    /// Dereference a nullable reference, naming `expr` in the fault
    pub fn deref(&self, reference: Option<NodeId>, expr: &str) -> Result<&Node> {
        match reference {
            Some(id) => self.get(id),
            None => Err(FixtureError::null(expr)),
        }
    }

    /// Mutable counterpart of [`NodeGraph::deref`]
    pub fn deref_mut(&mut self, reference: Option<NodeId>, expr: &str) -> Result<&mut Node> {
        match reference {
            Some(id) => self.get_mut(id),
            None => Err(FixtureError::null(expr)),
        }
    }

    /// Check that every link points inside the arena
    ///
    /// Graphs built through [`NodeGraph::alloc`] and
    /// [`NodeGraph::set_link`] are always valid; deserialized ones may not be.
    pub fn validate(&self) -> Result<()> {
        for node in &self.nodes {
            if let Some(link) = node.link {
                self.get(link)?;
            }
        }
        Ok(())
    }

    /// Identity code of a node
    ///
    /// Non-negative, 31 bits wide, and a pure function of the id, so the
    /// same node always yields the same code.
    pub fn identity_hash(&self, id: NodeId) -> Result<i32> {
        self.get(id)?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(b"node");
        hasher.update(&(id.0 as u64).to_le_bytes());
        let digest = hasher.finalize();

        let mut word = [0u8; 4];
        word.copy_from_slice(&digest.as_bytes()[..4]);
        Ok((u32::from_le_bytes(word) & 0x7fff_ffff) as i32)
    }

    /// View the link structure as a petgraph graph
    ///
    /// Node weights are the arena ids; each set link becomes one edge.
    /// Fails with [`FixtureError::DanglingNode`] if a link leaves the arena.
    pub fn to_petgraph(&self) -> Result<DiGraph<NodeId, ()>> {
        self.validate()?;

        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.nodes.len());
        for id in self.ids() {
            graph.add_node(id);
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(link) = node.link {
                graph.add_edge(NodeIndex::new(index), NodeIndex::new(link.0), ());
            }
        }
        Ok(graph)
    }

    /// True if following links from some node returns to it
    pub fn has_cycle(&self) -> Result<bool> {
        Ok(petgraph::algo::is_cyclic_directed(&self.to_petgraph()?))
    }

    /// Render the graph in Graphviz DOT format
    pub fn to_dot(&self) -> Result<String> {
        let graph = self.to_petgraph()?;
        let mut dot = String::from("digraph NodeGraph {\n");
        dot.push_str("  node [shape=record];\n\n");

        for index in graph.node_indices() {
            let node = &self.nodes[index.index()];
            writeln!(
                dot,
                "  \"{}\" [label=\"{{#{} | x = {} | y = {}}}\"];",
                index.index(),
                index.index(),
                node.x,
                node.y
            )
            .ok();
        }

        dot.push('\n');
        for edge in graph.raw_edges() {
            writeln!(
                dot,
                "  \"{}\" -> \"{}\" [label=\"link\"];",
                edge.source().index(),
                edge.target().index()
            )
            .ok();
        }

        dot.push_str("}\n");
        Ok(dot)
    }
}
