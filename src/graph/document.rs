//! Graph document persistence
//!
//! The on-disk form is `{ "nodes": {id: [x, y]}, "adj": {u: {v: w}}, "is_directed": bool }`.
//! Loading replays adjacency entries through `add_edge`, so a loaded store is
//! equivalent to one built interactively.

use super::edge::Weight;
use super::node::{NodeId, Position};
use super::store::GraphStore;
use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialized graph state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: IndexMap<NodeId, Position>,
    #[serde(default)]
    pub adj: IndexMap<NodeId, IndexMap<NodeId, Weight>>,
    #[serde(default)]
    pub is_directed: bool,
}

impl GraphDocument {
    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render the document as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Write the document to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = self.to_json()?;
        fs::write(path, data)?;
        Ok(())
    }
}

impl GraphStore {
    /// Snapshot the store as a document.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes().map(|(id, p)| (id.clone(), *p)).collect(),
            adj: self.adjacency().clone(),
            is_directed: self.is_directed(),
        }
    }

    /// Rebuild a store from a document: clear, set the mode, add nodes, then replay edges.
    pub fn from_document(doc: &GraphDocument) -> Self {
        let mut graph = GraphStore::new(doc.is_directed);
        graph.load_document(doc);
        graph
    }

    /// Replace the current contents with the document's.
    pub fn load_document(&mut self, doc: &GraphDocument) {
        self.clear();
        self.set_mode(doc.is_directed);
        for (id, p) in &doc.nodes {
            self.add_node(id.clone(), p.x, p.y);
        }
        for (u, neighbors) in &doc.adj {
            for (v, &w) in neighbors {
                self.add_edge(u.as_str(), v.as_str(), w);
            }
        }
        info!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            directed = self.is_directed(),
            "图文档已加载"
        );
    }

    /// Load a store straight from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_document(&GraphDocument::load(path)?))
    }

    /// Save the store as a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_document().save(path)
    }
}
