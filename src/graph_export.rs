//! Resolution plan export for visualization and debugging.
//!
//! A plan is the dependency graph the branch phase would build for one
//! token, captured before anything is constructed. It can be rendered as
//! Graphviz DOT, Mermaid, or (with the `graph-export` feature) JSON.

use std::fmt::Write as _;

#[cfg(feature = "graph-export")]
use serde::Serialize;

use crate::lifetime::Lifetime;
use crate::resolver::{GraphEntry, NodeId, Resolution};

/// A node of a resolution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize))]
pub struct PlanNode {
    /// Unique identifier within the plan
    pub id: String,
    /// Name of the registration token
    pub component: &'static str,
    pub lifetime: Lifetime,
    /// Singleton already present in the store; it will not be rebuilt
    pub cached: bool,
}

/// A dependency edge: `from` receives `to` as argument number `slot`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize))]
pub struct PlanEdge {
    pub from: String,
    pub to: String,
    pub slot: usize,
}

/// Dependency graph discovered for one root token.
///
/// # Examples
///
/// ```
/// use ferrous_wire::{Container, Definition, Lifetime, Token};
///
/// struct Clock;
/// struct Job;
///
/// let mut container = Container::new();
/// container.register(Token::of::<Clock>(), Definition::new(|_| Ok(Clock)), Lifetime::Singleton, false);
/// container.register(
///     Token::of::<Job>(),
///     Definition::new(|_| Ok(Job)).depends_on::<Clock>(),
///     Lifetime::Transient,
///     false,
/// );
///
/// let plan = container.plan(Token::of::<Job>()).unwrap();
/// assert_eq!(plan.nodes.len(), 2);
/// assert_eq!(plan.edges.len(), 1);
/// assert!(plan.to_dot().starts_with("digraph ResolutionPlan {"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize))]
pub struct ResolutionPlan {
    /// Identifier of the root node
    pub root: String,
    /// Nodes in discovery order
    pub nodes: Vec<PlanNode>,
    /// Edges grouped by consumer, in argument order
    pub edges: Vec<PlanEdge>,
}

impl ResolutionPlan {
    pub(crate) fn from_resolution(resolution: &Resolution, root: GraphEntry) -> Self {
        let graph_nodes = resolution.graph.nodes();

        let nodes = graph_nodes
            .iter()
            .map(|node| {
                let entry = node.data();
                PlanNode {
                    id: node_id(entry.id),
                    component: entry.registration.display_name(),
                    lifetime: entry.lifetime,
                    cached: resolution.cached.contains(&entry.id),
                }
            })
            .collect();

        let mut edges = Vec::new();
        for node in &graph_nodes {
            let Some(slots) = resolution.slots.get(node.key()) else {
                continue;
            };
            for (slot, dependency) in slots.iter().enumerate() {
                edges.push(PlanEdge {
                    from: node_id(*node.key()),
                    to: node_id(dependency.node),
                    slot,
                });
            }
        }

        Self {
            root: node_id(root.id),
            nodes,
            edges,
        }
    }

    /// Number of constructor calls a resolution of this plan performs.
    pub fn construction_count(&self) -> usize {
        self.nodes.iter().filter(|node| !node.cached).count()
    }

    /// Renders the plan in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph ResolutionPlan {\n");
        output.push_str("  rankdir=TB;\n");
        output.push_str("  node [shape=box, style=filled];\n\n");

        for node in &self.nodes {
            let color = match node.lifetime {
                Lifetime::Singleton => "lightblue",
                Lifetime::Scoped => "lightgreen",
                Lifetime::Transient => "lightyellow",
            };
            let _ = writeln!(
                output,
                "  \"{}\" [label=\"{}\\n({}{})\", fillcolor={}];",
                escape(&node.id),
                escape(node.component),
                node.lifetime,
                if node.cached { ", cached" } else { "" },
                color
            );
        }
        output.push('\n');
        for edge in &self.edges {
            let _ = writeln!(
                output,
                "  \"{}\" -> \"{}\" [label=\"{}\"];",
                escape(&edge.from),
                escape(&edge.to),
                edge.slot
            );
        }
        output.push_str("}\n");
        output
    }

    /// Renders the plan as a Mermaid flowchart.
    pub fn to_mermaid(&self) -> String {
        let index: Vec<&str> = self.nodes.iter().map(|node| node.id.as_str()).collect();
        let short = |id: &str| {
            index
                .iter()
                .position(|candidate| *candidate == id)
                .map(|i| format!("n{}", i))
                .unwrap_or_else(|| "unknown".to_string())
        };

        let mut output = String::from("graph TD\n");
        for (i, node) in self.nodes.iter().enumerate() {
            let _ = writeln!(output, "  n{}[\"{} ({})\"]", i, node.component.replace('"', "'"), node.lifetime);
        }
        for edge in &self.edges {
            let _ = writeln!(output, "  {} -->|{}| {}", short(&edge.from), edge.slot, short(&edge.to));
        }
        output
    }

    /// Serializes the plan as pretty-printed JSON.
    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> crate::DiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::DiError::ExportFailed(e.to_string()))
    }
}

fn node_id(id: NodeId) -> String {
    id.to_string()
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
