//! Dependency graph export for call-site trees.
//!
//! Flattens a resolved [`CallSite`] into nodes and edges for visualisation
//! tools. With the `graph-export` feature the graph serialises to JSON.

use std::sync::Arc;

use crate::call_site::{CallSite, CallSiteKind, ParameterCallSite};
use crate::internal::Map;

/// A node in the exported graph; one per distinct call site.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    pub id: usize,
    pub service_type: String,
    pub implementation: Option<String>,
    pub kind: NodeKind,
    pub lifetime: Option<String>,
}

/// Call-site kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "graph-export", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    Constructor,
    CreateInstance,
    Enumerable,
    Constant,
    Factory,
}

/// A dependency edge from a consumer to one of its call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    /// Argument or item position
    pub position: usize,
}

/// Nodes and edges of one call-site tree. Node 0 is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
pub struct CallSiteGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl CallSiteGraph {
    /// Builds the graph of `root`. Call sites shared by several consumers
    /// (the same `Arc`) become a single node.
    pub fn from_call_site(root: &Arc<CallSite>) -> Self {
        let mut builder = GraphBuilder::default();
        builder.add(root);
        builder.graph
    }

    /// Root node.
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.first()
    }

    /// Serialises the graph as pretty-printed JSON.
    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Default)]
struct GraphBuilder {
    graph: CallSiteGraph,
    seen: Map<*const CallSite, usize>,
}

impl GraphBuilder {
    fn add(&mut self, site: &Arc<CallSite>) -> usize {
        let ptr = Arc::as_ptr(site);
        if let Some(&id) = self.seen.get(&ptr) {
            return id;
        }

        let id = self.graph.nodes.len();
        self.seen.insert(ptr, id);
        self.graph.nodes.push(GraphNode {
            id,
            service_type: site.service_type().to_string(),
            implementation: site.implementation_type().map(ToString::to_string),
            kind: node_kind(site.kind()),
            lifetime: site.lifetime().map(|l| l.as_str().to_string()),
        });

        let children: Vec<(usize, &Arc<CallSite>)> = match site.kind() {
            CallSiteKind::Constructor { parameters, .. } => parameters
                .iter()
                .enumerate()
                .filter_map(|(position, p)| match p {
                    ParameterCallSite::Service(child) => Some((position, child)),
                    ParameterCallSite::Default(_) => None,
                })
                .collect(),
            CallSiteKind::Enumerable { items, .. } => items.iter().enumerate().collect(),
            _ => Vec::new(),
        };
        for (position, child) in children {
            let to = self.add(child);
            self.graph.edges.push(GraphEdge { from: id, to, position });
        }
        id
    }
}

fn node_kind(kind: &CallSiteKind) -> NodeKind {
    match kind {
        CallSiteKind::Constructor { .. } => NodeKind::Constructor,
        CallSiteKind::CreateInstance { .. } => NodeKind::CreateInstance,
        CallSiteKind::Enumerable { .. } => NodeKind::Enumerable,
        CallSiteKind::Constant { .. } => NodeKind::Constant,
        CallSiteKind::Factory { .. } => NodeKind::Factory,
    }
}
